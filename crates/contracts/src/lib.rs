//! # Contracts
//!
//! Frozen interface contracts shared by every crate of the capture workspace.
//! Business crates depend on this crate only, never on each other's internals.
//!
//! ## Units
//! - Lap times on the wire are seconds (`f32`); records carry milliseconds (`u32`)
//! - Speed is km/h, fuel is whatever the simulator reports (kg in practice)

mod blueprint;
mod error;
mod frames;
mod records;
mod store;
mod tracker_config;
mod tyre;
mod wire;

pub use blueprint::*;
pub use error::*;
pub use frames::*;
pub use records::*;
pub use store::RaceStore;
pub use tracker_config::*;
pub use tyre::TyreCompound;
pub use wire::*;
