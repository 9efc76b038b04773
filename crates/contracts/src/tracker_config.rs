//! Race state tracker configuration contracts that can be shared across crates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{TyreCompound, WireFormat};

/// Default telemetry sample period (one forwarded frame out of 40)
pub const DEFAULT_SAMPLE_PERIOD: u64 = 40;

/// Race state tracker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Wire format, selects the lap detection strategy
    pub format: WireFormat,

    /// Lap-time validity bounds
    #[serde(default)]
    pub lap_bounds: LapBounds,

    /// Legacy running-maximum detection thresholds
    #[serde(default)]
    pub legacy: LegacyDetectionConfig,

    /// Forward one telemetry frame out of every `sample_period`
    pub sample_period: u64,

    /// Static session labels
    pub session: SessionLabels,

    /// Compound assumed before the first status frame
    #[serde(default)]
    pub starting_compound: TyreCompound,

    /// Fuel assumed before the first status frame
    pub starting_fuel: f32,
}

impl TrackerConfig {
    /// Defaults for the given format
    pub fn new(format: WireFormat) -> Self {
        Self {
            format,
            lap_bounds: LapBounds::default(),
            legacy: LegacyDetectionConfig::default(),
            sample_period: DEFAULT_SAMPLE_PERIOD,
            session: SessionLabels::default(),
            starting_compound: TyreCompound::default(),
            starting_fuel: 100.0,
        }
    }
}

/// Lap-time validity bounds, inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LapBounds {
    pub min_ms: u32,
    pub max_ms: u32,
}

impl LapBounds {
    /// Whether a lap time falls inside the bounds
    pub fn contains(&self, lap_time_ms: u32) -> bool {
        (self.min_ms..=self.max_ms).contains(&lap_time_ms)
    }
}

impl Default for LapBounds {
    fn default() -> Self {
        Self {
            min_ms: 30_000,
            max_ms: 300_000,
        }
    }
}

/// Legacy running-maximum lap detection thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegacyDetectionConfig {
    /// Current-lap-time below this counts as a timer reset (seconds)
    pub epsilon_s: f32,
    /// Running maximum must exceed this before a reset counts (seconds)
    pub min_peak_s: f32,
}

impl Default for LegacyDetectionConfig {
    fn default() -> Self {
        Self {
            epsilon_s: 0.5,
            min_peak_s: 10.0,
        }
    }
}

/// Session labels the protocol does not reliably transmit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionLabels {
    pub track: String,
    pub session_type: String,
    pub weather: String,
    /// Fixed session date; `None` = local date at session start
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl Default for SessionLabels {
    fn default() -> Self {
        Self {
            track: "Unknown Track".to_string(),
            session_type: "Race".to_string(),
            weather: "Clear".to_string(),
            date: None,
        }
    }
}
