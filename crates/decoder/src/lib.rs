//! # Packet Decoder
//!
//! 赛车模拟器遥测广播解码模块。
//!
//! Responsibilities:
//! - Classify datagrams by header (newer: discriminator byte, legacy: frame length)
//! - Extract lap, telemetry and car status frames at fixed little-endian offsets
//! - Clamp out-of-range values; report read failures with field name and offset
//!
//! Stateless: the same bytes always decode to the same frames.
//!
//! ## Usage Example
//!
//! ```ignore
//! use contracts::WireFormat;
//! use decoder::decoder_for;
//!
//! let decoder = decoder_for(WireFormat::Newer);
//! match decoder.decode(&datagram) {
//!     Ok(frames) => for frame in frames { tracker.observe(frame); },
//!     Err(e) => tracing::debug!(error = %e, "dropping packet"),
//! }
//! ```

mod error;
mod frame_decoder;
pub mod legacy;
pub mod newer;
mod reader;
pub mod synth;

pub use error::{DecodeError, Result};
pub use frame_decoder::{decoder_for, FrameDecoder};
pub use legacy::LegacyFormatDecoder;
pub use newer::NewerFormatDecoder;
pub use reader::FieldReader;

/// Speed ceiling after clamping (km/h)
pub const MAX_SPEED_KPH: u16 = 450;

/// Engine speed ceiling after clamping
pub const MAX_RPM: u16 = 20_000;

/// Reverse
pub const MIN_GEAR: i8 = -1;

/// Highest forward gear
pub const MAX_GEAR: i8 = 8;
