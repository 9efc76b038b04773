//! Newer wire format: 21-byte header, discriminator byte, player car at offset 21

use contracts::{
    CarStatusFrame, LapFrame, PacketHeader, PacketType, TelemetryFrame, TyreCompound, WireFormat,
};

use crate::error::{DecodeError, Result};
use crate::frame_decoder::FrameDecoder;
use crate::reader::{one_decimal, pedal, FieldReader};
use crate::{MAX_GEAR, MAX_RPM, MAX_SPEED_KPH, MIN_GEAR};

/// Header length in bytes
pub const HEADER_LEN: usize = 21;

/// Packet-type discriminator offset
pub const DISCRIMINATOR_OFFSET: usize = 7;

/// Absolute field offsets (player car data starts right after the header)
pub mod offsets {
    use super::HEADER_LEN;

    pub const LAST_LAP_TIME: usize = HEADER_LEN;
    pub const CURRENT_LAP_TIME: usize = HEADER_LEN + 4;
    pub const CURRENT_LAP_INVALID: usize = HEADER_LEN + 29;

    pub const SPEED: usize = HEADER_LEN;
    pub const THROTTLE: usize = HEADER_LEN + 2;
    pub const BRAKE: usize = HEADER_LEN + 10;
    pub const GEAR: usize = HEADER_LEN + 15;
    pub const ENGINE_RPM: usize = HEADER_LEN + 16;
    pub const DRS: usize = HEADER_LEN + 18;

    pub const FUEL_IN_TANK: usize = HEADER_LEN;
    pub const TYRE_COMPOUND: usize = HEADER_LEN + 16;
}

/// Decoder for the discriminated layout
#[derive(Debug, Clone, Copy, Default)]
pub struct NewerFormatDecoder;

impl FrameDecoder for NewerFormatDecoder {
    fn format(&self) -> WireFormat {
        WireFormat::Newer
    }

    fn header_len(&self) -> usize {
        HEADER_LEN
    }

    fn decode_header(&self, buf: &[u8]) -> Result<PacketHeader> {
        if buf.len() < HEADER_LEN {
            return Err(DecodeError::MalformedHeader {
                len: buf.len(),
                expected: HEADER_LEN,
            });
        }

        let id = FieldReader::new(buf).u8(DISCRIMINATOR_OFFSET, "packet_id")?;
        Ok(PacketHeader {
            format: WireFormat::Newer,
            discriminator: Some(id),
            packet_type: PacketType::from_discriminator(id),
        })
    }

    fn decode_lap_frame(&self, buf: &[u8]) -> Result<LapFrame> {
        let r = FieldReader::new(buf);
        let last_lap_time = r.finite_f32(offsets::LAST_LAP_TIME, "last_lap_time")?;
        let current_lap_time = r.finite_f32(offsets::CURRENT_LAP_TIME, "current_lap_time")?;
        let invalid = r.u8(offsets::CURRENT_LAP_INVALID, "current_lap_invalid")? == 1;

        Ok(LapFrame {
            last_lap_time: (last_lap_time > 0.0).then_some(last_lap_time),
            current_lap_time,
            invalid: Some(invalid),
        })
    }

    fn decode_telemetry_frame(&self, buf: &[u8]) -> Result<TelemetryFrame> {
        let r = FieldReader::new(buf);
        let speed = r.u16_le(offsets::SPEED, "speed")?;
        let throttle = r.finite_f32(offsets::THROTTLE, "throttle")?;
        let brake = r.finite_f32(offsets::BRAKE, "brake")?;
        let gear = r.i8(offsets::GEAR, "gear")?;
        let rpm = r.u16_le(offsets::ENGINE_RPM, "engine_rpm")?;
        let drs = r.u8(offsets::DRS, "drs")?;

        Ok(TelemetryFrame {
            speed: Some(speed.min(MAX_SPEED_KPH)),
            throttle: Some(pedal(throttle)),
            brake: Some(pedal(brake)),
            gear: Some(gear.clamp(MIN_GEAR, MAX_GEAR)),
            rpm: Some(rpm.min(MAX_RPM)),
            drs: Some(drs == 1),
        })
    }

    fn decode_car_status_frame(&self, buf: &[u8]) -> Result<CarStatusFrame> {
        let r = FieldReader::new(buf);
        let fuel = r.finite_f32(offsets::FUEL_IN_TANK, "fuel_in_tank")?;
        let compound_id = r.u8(offsets::TYRE_COMPOUND, "tyre_compound")?;

        Ok(CarStatusFrame {
            tyre_compound: TyreCompound::from_id(compound_id),
            compound_id,
            fuel_in_tank: one_decimal(fuel),
        })
    }
}
