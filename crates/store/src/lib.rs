//! # Store
//!
//! 持久化模块。
//!
//! 负责：
//! - `RaceStore` 实现：日志、JSON Lines 文件、内存
//! - 按配置构造 store
//! - 将 `RaceEvent` 写入 store 并维护其分配的 id

pub mod error;
pub mod factory;
pub mod recorder;
pub mod stores;

pub use contracts::{RaceEvent, RaceStore};
pub use error::StoreError;
pub use factory::create_store;
pub use recorder::EventRecorder;
pub use stores::{JsonlStore, JsonlStoreConfig, LogStore, MemoryStore};
