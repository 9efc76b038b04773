//! Synthetic packet builders
//!
//! 用于无模拟器环境的测试：按解码器使用的偏移写出字节。

use bytes::Bytes;

use crate::legacy::{self, FRAME_LEN};
use crate::newer::{self, DISCRIMINATOR_OFFSET, HEADER_LEN};

/// Packet format tag written into the first two header bytes
const PACKET_FORMAT: u16 = 2018;

/// Broadcast sizes of the three consumed newer-format packets
pub const LAP_DATA_LEN: usize = 841;
pub const CAR_TELEMETRY_LEN: usize = 1085;
pub const CAR_STATUS_LEN: usize = 1061;

fn put_f32(buf: &mut [u8], offset: usize, value: f32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

fn put_u16(buf: &mut [u8], offset: usize, value: u16) {
    buf[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

/// Newer-format packet builder
pub struct NewerPacketBuilder;

impl NewerPacketBuilder {
    /// Zeroed packet of `len` bytes (at least a header) with the given discriminator
    pub fn raw(packet_id: u8, len: usize) -> Bytes {
        Bytes::from(Self::with_header(packet_id, len))
    }

    fn with_header(packet_id: u8, len: usize) -> Vec<u8> {
        let mut buf = vec![0u8; len.max(HEADER_LEN)];
        put_u16(&mut buf, 0, PACKET_FORMAT);
        buf[DISCRIMINATOR_OFFSET] = packet_id;
        buf
    }

    pub fn lap_data(last_lap_time: f32, current_lap_time: f32, invalid: bool) -> Bytes {
        let mut buf = Self::with_header(2, LAP_DATA_LEN);
        put_f32(&mut buf, newer::offsets::LAST_LAP_TIME, last_lap_time);
        put_f32(&mut buf, newer::offsets::CURRENT_LAP_TIME, current_lap_time);
        buf[newer::offsets::CURRENT_LAP_INVALID] = u8::from(invalid);
        Bytes::from(buf)
    }

    pub fn car_telemetry(
        speed: u16,
        throttle: f32,
        brake: f32,
        gear: i8,
        rpm: u16,
        drs: bool,
    ) -> Bytes {
        let mut buf = Self::with_header(6, CAR_TELEMETRY_LEN);
        put_u16(&mut buf, newer::offsets::SPEED, speed);
        put_f32(&mut buf, newer::offsets::THROTTLE, throttle);
        put_f32(&mut buf, newer::offsets::BRAKE, brake);
        buf[newer::offsets::GEAR] = gear.to_le_bytes()[0];
        put_u16(&mut buf, newer::offsets::ENGINE_RPM, rpm);
        buf[newer::offsets::DRS] = u8::from(drs);
        Bytes::from(buf)
    }

    pub fn car_status(compound_id: u8, fuel_in_tank: f32) -> Bytes {
        let mut buf = Self::with_header(7, CAR_STATUS_LEN);
        put_f32(&mut buf, newer::offsets::FUEL_IN_TANK, fuel_in_tank);
        buf[newer::offsets::TYRE_COMPOUND] = compound_id;
        Bytes::from(buf)
    }
}

/// Legacy frame builder
#[derive(Debug, Clone)]
pub struct LegacyFrameBuilder {
    buf: Vec<u8>,
}

impl Default for LegacyFrameBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LegacyFrameBuilder {
    pub fn new() -> Self {
        Self {
            buf: vec![0u8; FRAME_LEN],
        }
    }

    fn f32_at(mut self, offset: usize, value: f32) -> Self {
        put_f32(&mut self.buf, offset, value);
        self
    }

    pub fn lap_time(self, seconds: f32) -> Self {
        self.f32_at(legacy::offsets::LAP_TIME, seconds)
    }

    pub fn speed_mps(self, mps: f32) -> Self {
        self.f32_at(legacy::offsets::SPEED, mps)
    }

    pub fn throttle(self, value: f32) -> Self {
        self.f32_at(legacy::offsets::THROTTLE, value)
    }

    pub fn brake(self, value: f32) -> Self {
        self.f32_at(legacy::offsets::BRAKE, value)
    }

    pub fn gear(self, value: f32) -> Self {
        self.f32_at(legacy::offsets::GEAR, value)
    }

    pub fn rpm(self, value: f32) -> Self {
        self.f32_at(legacy::offsets::ENGINE_RATE, value)
    }

    pub fn drs(self, value: f32) -> Self {
        self.f32_at(legacy::offsets::DRS, value)
    }

    pub fn fuel(self, value: f32) -> Self {
        self.f32_at(legacy::offsets::FUEL_IN_TANK, value)
    }

    pub fn compound(mut self, compound_id: u8) -> Self {
        self.buf[legacy::offsets::TYRE_COMPOUND] = compound_id;
        self
    }

    pub fn build(self) -> Bytes {
        Bytes::from(self.buf)
    }
}
