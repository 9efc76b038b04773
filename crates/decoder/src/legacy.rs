//! Legacy wire format: one fixed-length frame carrying every field, no discriminator

use contracts::{
    CarStatusFrame, LapFrame, PacketHeader, PacketType, TelemetryFrame, TyreCompound, WireFormat,
};
use tracing::debug;

use crate::error::{DecodeError, Result};
use crate::frame_decoder::FrameDecoder;
use crate::reader::{one_decimal, pedal, FieldReader};
use crate::{MAX_GEAR, MAX_RPM, MAX_SPEED_KPH, MIN_GEAR};

/// Exact length of a legacy frame
pub const FRAME_LEN: usize = 1289;

/// m/s → km/h
const MPS_TO_KPH: f32 = 3.6;

/// Absolute field offsets
pub mod offsets {
    pub const LAP_TIME: usize = 4;
    pub const SPEED: usize = 28;
    pub const THROTTLE: usize = 116;
    pub const BRAKE: usize = 124;
    pub const GEAR: usize = 132;
    pub const ENGINE_RATE: usize = 148;
    pub const DRS: usize = 168;
    pub const FUEL_IN_TANK: usize = 180;
    pub const TYRE_COMPOUND: usize = 312;
}

/// Decoder for the fixed-length legacy frame
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyFormatDecoder;

/// 单字段宽松读取：越界或非有限值记为未解码
fn lenient_f32(r: &FieldReader<'_>, offset: usize, field: &'static str) -> Option<f32> {
    match r.f32_le(offset, field) {
        Ok(value) if value.is_finite() => Some(value),
        Ok(value) => {
            debug!(field, offset, %value, "legacy telemetry field undecoded");
            None
        }
        Err(e) => {
            debug!(field, offset, error = %e, "legacy telemetry field undecoded");
            None
        }
    }
}

impl FrameDecoder for LegacyFormatDecoder {
    fn format(&self) -> WireFormat {
        WireFormat::Legacy
    }

    fn header_len(&self) -> usize {
        FRAME_LEN
    }

    fn decode_header(&self, buf: &[u8]) -> Result<PacketHeader> {
        let packet_type = match buf.len() {
            len if len < FRAME_LEN => {
                return Err(DecodeError::MalformedHeader {
                    len,
                    expected: FRAME_LEN,
                });
            }
            FRAME_LEN => PacketType::Combined,
            _ => PacketType::Unsupported,
        };

        Ok(PacketHeader {
            format: WireFormat::Legacy,
            discriminator: None,
            packet_type,
        })
    }

    fn decode_lap_frame(&self, buf: &[u8]) -> Result<LapFrame> {
        let current_lap_time = FieldReader::new(buf).finite_f32(offsets::LAP_TIME, "lap_time")?;

        Ok(LapFrame {
            last_lap_time: None,
            current_lap_time,
            invalid: None,
        })
    }

    /// Partial extraction; a field that cannot be read stays `None`
    fn decode_telemetry_frame(&self, buf: &[u8]) -> Result<TelemetryFrame> {
        let r = FieldReader::new(buf);

        Ok(TelemetryFrame {
            speed: lenient_f32(&r, offsets::SPEED, "speed")
                .map(|mps| (mps * MPS_TO_KPH).round().clamp(0.0, f32::from(MAX_SPEED_KPH)) as u16),
            throttle: lenient_f32(&r, offsets::THROTTLE, "throttle").map(pedal),
            brake: lenient_f32(&r, offsets::BRAKE, "brake").map(pedal),
            gear: lenient_f32(&r, offsets::GEAR, "gear")
                .map(|g| g.round().clamp(f32::from(MIN_GEAR), f32::from(MAX_GEAR)) as i8),
            rpm: lenient_f32(&r, offsets::ENGINE_RATE, "engine_rate")
                .map(|rpm| rpm.round().clamp(0.0, f32::from(MAX_RPM)) as u16),
            drs: lenient_f32(&r, offsets::DRS, "drs").map(|d| d >= 0.5),
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
