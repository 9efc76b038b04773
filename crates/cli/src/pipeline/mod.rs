//! Capture orchestration module.

mod orchestrator;
mod stats;

pub use orchestrator::{Capture, CaptureSettings};
pub use stats::CaptureStats;
