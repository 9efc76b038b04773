//! Store construction from configuration

use contracts::{RaceStore, StoreConfig, StoreType};
use tracing::{info, instrument};

use crate::error::StoreError;
use crate::stores::{JsonlStore, LogStore, MemoryStore};

/// Build the configured store
#[instrument(name = "store_create", skip(config), fields(store = %config.name))]
pub fn create_store(config: &StoreConfig) -> Result<Box<dyn RaceStore>, StoreError> {
    let store: Box<dyn RaceStore> = match config.store_type {
        StoreType::Log => Box::new(LogStore::new(&config.name)),
        StoreType::File => Box::new(
            JsonlStore::from_params(&config.name, &config.params)
                .map_err(|e| StoreError::creation(&config.name, e.to_string()))?,
        ),
        StoreType::Memory => Box::new(MemoryStore::new(&config.name)),
    };

    info!(store = %config.name, store_type = ?config.store_type, "store created");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_create_each_type() {
        let dir = tempdir().unwrap();
        for (store_type, params) in [
            (StoreType::Log, HashMap::new()),
            (StoreType::Memory, HashMap::new()),
            (
                StoreType::File,
                HashMap::from([(
                    "base_path".to_string(),
                    dir.path().join("out").to_string_lossy().into_owned(),
                )]),
            ),
        ] {
            let config = StoreConfig {
                name: "laps".into(),
                store_type,
                params,
            };
            let store = create_store(&config).unwrap();
            assert_eq!(store.name(), "laps");
        }
        assert!(dir.path().join("out").join("laps.jsonl").exists());
    }

    #[test]
    fn test_file_store_creation_failure() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let config = StoreConfig {
            name: "laps".into(),
            store_type: StoreType::File,
            params: HashMap::from([(
                "base_path".to_string(),
                blocker.join("nested").to_string_lossy().into_owned(),
            )]),
        };
        let err = create_store(&config).err().unwrap();
        assert!(matches!(err, StoreError::Creation { .. }));
    }
}
