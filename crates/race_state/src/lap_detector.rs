//! Lap boundary detection strategies
//!
//! The protocol never says "lap complete"; each wire format needs its own inference.

use contracts::{LapFrame, LegacyDetectionConfig, TrackerConfig, WireFormat};
use tracing::trace;

/// A detected lap boundary, not yet sealed into a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LapBoundary {
    /// Lap time in milliseconds
    pub lap_time_ms: u32,
    /// The simulator flagged the lap invalid
    pub flagged_invalid: bool,
}

/// Lap boundary detector
pub trait LapDetector: Send {
    /// Feed one lap frame; returns a boundary when a lap just ended
    fn observe(&mut self, frame: &LapFrame) -> Option<LapBoundary>;
}

/// Seconds → milliseconds, rounded
pub fn seconds_to_ms(seconds: f32) -> u32 {
    (f64::from(seconds) * 1000.0).round().clamp(0.0, f64::from(u32::MAX)) as u32
}

/// Detector matching the wire format
pub fn detector_for(config: &TrackerConfig) -> Box<dyn LapDetector> {
    match config.format {
        WireFormat::Newer => Box::new(DiscreteLapDetector::default()),
        WireFormat::Legacy => Box::new(RunningMaxLapDetector::new(config.legacy)),
    }
}

/// Newer format: the last-lap-time field advancing marks a new lap
#[derive(Debug, Default)]
pub struct DiscreteLapDetector {
    last_recorded: Option<f32>,
}

impl LapDetector for DiscreteLapDetector {
    fn observe(&mut self, frame: &LapFrame) -> Option<LapBoundary> {
        let last = frame.last_lap_time.filter(|t| *t > 0.0)?;

        if self.last_recorded.is_some_and(|prev| last <= prev) {
            return None;
        }

        trace!(last_lap_time = last, previous = ?self.last_recorded, "last lap time advanced");
        self.last_recorded = Some(last);

        Some(LapBoundary {
            lap_time_ms: seconds_to_ms(last),
            flagged_invalid: frame.invalid.unwrap_or(false),
        })
    }
}

/// Legacy format: the current-lap timer resetting after a peak marks a new lap
#[derive(Debug)]
pub struct RunningMaxLapDetector {
    config: LegacyDetectionConfig,
    running_max: f32,
}

impl RunningMaxLapDetector {
    pub fn new(config: LegacyDetectionConfig) -> Self {
        Self {
            config,
            running_max: 0.0,
        }
    }

    /// Largest current-lap-time seen since the last boundary
    pub fn running_max(&self) -> f32 {
        self.running_max
    }
}

impl LapDetector for RunningMaxLapDetector {
    fn observe(&mut self, frame: &LapFrame) -> Option<LapBoundary> {
        let current = frame.current_lap_time;

        if current < self.config.epsilon_s && self.running_max > self.config.min_peak_s {
            let peak = self.running_max;
            self.running_max = 0.0;
            trace!(peak, current, "lap timer reset");
            return Some(LapBoundary {
                lap_time_ms: seconds_to_ms(peak),
                flagged_invalid: false,
            });
        }

        if current > self.running_max {
            self.running_max = current;
        }
        None
    }
}
