//! # Race State Tracker
//!
//! 赛况状态归约器：从解码帧推断圈结束、轮胎与燃油状态。
//!
//! 负责：
//! - 会话建立 (首个可分类帧)
//! - 圈边界检测 (新格式：上一圈用时递增；旧格式：计时峰值后归零)
//! - 圈记录封存 (配方、胎龄、燃油快照、有效性)
//! - 遥测降采样
//!
//! ## 使用示例
//!
//! ```ignore
//! use race_state::RaceStateTracker;
//!
//! let mut tracker = RaceStateTracker::new(blueprint.to_tracker_config()?);
//!
//! for frame in decoder.decode(&datagram)? {
//!     for event in tracker.observe(frame) {
//!         // Persist event
//!     }
//! }
//! let trailing = tracker.finish();
//! ```

mod lap_detector;
mod sampler;
mod tracker;
mod tyre;

pub use lap_detector::{
    detector_for, seconds_to_ms, DiscreteLapDetector, LapBoundary, LapDetector,
    RunningMaxLapDetector,
};
pub use sampler::TelemetrySampler;
pub use tracker::{RaceStateTracker, TrackerState};
pub use tyre::TyreState;

pub use contracts::{DecodedFrame, LapRecord, RaceEvent, TrackerConfig};
