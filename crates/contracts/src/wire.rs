//! Wire format selector and packet header contracts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Largest datagram the simulator broadcasts.
pub const MAX_DATAGRAM_BYTES: usize = 2048;

/// Default simulator broadcast port.
pub const DEFAULT_TELEMETRY_PORT: u16 = 20777;

/// Broadcast layout selected once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireFormat {
    /// Layout with a 21-byte header and a packet-type discriminator
    Newer,
    /// Fixed 1289-byte all-in-one frame without a discriminator
    Legacy,
}

impl WireFormat {
    /// Canonical config name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Newer => "newer",
            Self::Legacy => "legacy",
        }
    }
}

impl fmt::Display for WireFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown format selector text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownWireFormat(pub String);

impl fmt::Display for UnknownWireFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unsupported wire format '{}' (expected one of: newer, f1_2018, legacy, f1_2017)",
            self.0
        )
    }
}

impl std::error::Error for UnknownWireFormat {}

impl FromStr for WireFormat {
    type Err = UnknownWireFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newer" | "f1_2018" | "2018" => Ok(Self::Newer),
            "legacy" | "f1_2017" | "2017" => Ok(Self::Legacy),
            _ => Err(UnknownWireFormat(s.to_string())),
        }
    }
}

/// Classified packet kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PacketType {
    /// Newer format, discriminator 2
    LapData,
    /// Newer format, discriminator 6
    CarTelemetry,
    /// Newer format, discriminator 7
    CarStatus,
    /// Legacy frame carrying lap, telemetry and status fields together
    Combined,
    /// Anything the capture does not consume
    Unsupported,
}

impl PacketType {
    /// Classify a newer-format discriminator byte
    pub fn from_discriminator(id: u8) -> Self {
        match id {
            2 => Self::LapData,
            6 => Self::CarTelemetry,
            7 => Self::CarStatus,
            _ => Self::Unsupported,
        }
    }
}

/// Decoded packet header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketHeader {
    /// Layout the packet was decoded with
    pub format: WireFormat,

    /// Raw discriminator byte (newer format only)
    pub discriminator: Option<u8>,

    /// Classified packet kind
    pub packet_type: PacketType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_aliases() {
        assert_eq!("newer".parse::<WireFormat>(), Ok(WireFormat::Newer));
        assert_eq!("F1_2018".parse::<WireFormat>(), Ok(WireFormat::Newer));
        assert_eq!(" legacy ".parse::<WireFormat>(), Ok(WireFormat::Legacy));
        assert_eq!("2017".parse::<WireFormat>(), Ok(WireFormat::Legacy));
    }

    #[test]
    fn test_unknown_format() {
        let err = "f1_2030".parse::<WireFormat>().unwrap_err();
        assert!(err.to_string().contains("f1_2030"));
    }

    #[test]
    fn test_discriminator_classification() {
        assert_eq!(PacketType::from_discriminator(2), PacketType::LapData);
        assert_eq!(PacketType::from_discriminator(6), PacketType::CarTelemetry);
        assert_eq!(PacketType::from_discriminator(7), PacketType::CarStatus);
        assert_eq!(PacketType::from_discriminator(1), PacketType::Unsupported);
    }
}
