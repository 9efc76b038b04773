//! Capture statistics.

use std::time::Duration;

use observability::CaptureStatsAggregator;

/// Statistics from a capture run
#[derive(Debug, Clone, Default)]
pub struct CaptureStats {
    /// Datagrams received
    pub datagrams: u64,

    /// Frames produced by the decoder
    pub frames_decoded: u64,

    /// Datagrams dropped by the decoder
    pub decode_errors: u64,

    /// Lap records persisted
    pub laps: u64,

    /// Telemetry samples persisted
    pub telemetry_samples: u64,

    /// Total duration of the run
    pub duration: Duration,

    /// Event and error aggregates
    pub aggregate: CaptureStatsAggregator,
}

impl CaptureStats {
    /// Datagrams per second
    pub fn datagram_rate(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.datagrams as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n================================================================");
        println!("                       Capture Statistics");
        println!("================================================================\n");

        println!("Overview");
        println!("   |- Duration: {:.2}s", self.duration.as_secs_f64());
        println!("   |- Datagrams received: {}", self.datagrams);
        println!("   |- Datagram rate: {:.2}/s", self.datagram_rate());
        println!("   |- Frames decoded: {}", self.frames_decoded);
        println!("   |- Laps captured: {}", self.laps);
        println!("   `- Telemetry samples: {}", self.telemetry_samples);

        println!("\n{}", self.aggregate.summary());
    }
}
