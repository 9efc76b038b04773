//! RaceStore implementations

pub mod jsonl;
pub mod log;
pub mod memory;

pub use jsonl::{JsonlStore, JsonlStoreConfig};
pub use log::LogStore;
pub use memory::MemoryStore;
