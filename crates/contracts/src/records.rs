//! Records and events - Race State Tracker output
//!
//! Everything here is immutable once produced. Identifiers are assigned by the
//! persistence collaborator, never by the core.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{TelemetryFrame, TyreCompound};

/// Opaque session identifier assigned by a store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

/// Opaque lap identifier assigned by a store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LapId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for LapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Session metadata, established once per run from static configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub track: String,
    pub session_type: String,
    pub weather: String,
    pub date: NaiveDate,
}

/// One completed lap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LapRecord {
    /// Sequential lap number, starting at 1
    pub lap_number: u32,

    /// Lap time in milliseconds
    pub lap_time_ms: u32,

    /// Compound fitted when the lap was sealed
    pub tyre_compound: TyreCompound,

    /// Laps on this compound, including this one
    pub tyre_age: u32,

    /// Most recent fuel reading when the lap was sealed
    pub fuel_load: f32,

    /// Within lap-time bounds and not flagged invalid by the simulator
    pub is_valid: bool,
}

impl LapRecord {
    /// Lap time as `m:ss.mmm`
    pub fn formatted_time(&self) -> String {
        let minutes = self.lap_time_ms / 60_000;
        let seconds = (self.lap_time_ms % 60_000) / 1000;
        let millis = self.lap_time_ms % 1000;
        format!("{minutes}:{seconds:02}.{millis:03}")
    }
}

/// Sampled telemetry row, attached to the most recent lap
///
/// `None` fields mark values the decoder could not extract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    pub lap_id: LapId,
    pub speed: Option<u16>,
    pub throttle: Option<f32>,
    pub brake: Option<f32>,
    pub gear: Option<i8>,
    pub rpm: Option<u16>,
    pub drs: Option<bool>,
}

impl TelemetrySample {
    /// Build a sample row from a decoded frame
    pub fn from_frame(lap_id: LapId, frame: &TelemetryFrame) -> Self {
        Self {
            lap_id,
            speed: frame.speed,
            throttle: frame.throttle,
            brake: frame.brake,
            gear: frame.gear,
            rpm: frame.rpm,
            drs: frame.drs,
        }
    }
}

/// Discrete domain events emitted by the tracker
#[derive(Debug, Clone, PartialEq)]
pub enum RaceEvent {
    /// First classifiable frame of the run
    SessionStarted(SessionState),

    /// Observed compound differs from the remembered one
    TyreChanged {
        from: TyreCompound,
        to: TyreCompound,
    },

    /// A lap boundary was sealed into a record
    LapCompleted(LapRecord),

    /// Telemetry frame selected by the sampler
    TelemetrySampled {
        lap_number: u32,
        frame: TelemetryFrame,
    },
}
