//! services/api/src/adapters/store.rs
//!
//! This module contains the persistent-store adapter, the concrete
//! implementation of the `StateStore` port from the `core` crate. Each
//! store slot is one JSON file under the configured data directory;
//! writes are whole-file replacements, last write wins.

use async_trait::async_trait;
use readflow_core::ports::{PortError, PortResult, StateStore, StoreSlot};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::warn;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A filesystem adapter that implements the `StateStore` port.
#[derive(Clone)]
pub struct JsonStoreAdapter {
    data_dir: PathBuf,
}

impl JsonStoreAdapter {
    /// Creates the adapter, making sure the data directory exists.
    pub async fn new(data_dir: impl Into<PathBuf>) -> PortResult<Self> {
        let data_dir = data_dir.into();
        tokio::fs::create_dir_all(&data_dir)
            .await
            .map_err(|e| PortError::Unexpected(format!("cannot create data dir: {e}")))?;
        Ok(Self { data_dir })
    }

    fn slot_path(&self, slot: StoreSlot) -> PathBuf {
        self.data_dir.join(format!("{}.json", slot.key()))
    }
}

//=========================================================================================
// `StateStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl StateStore for JsonStoreAdapter {
    /// Reads a slot. An absent file means the slot was never written; a
    /// file that cannot be read or parsed is treated the same way (the
    /// caller falls back to its built-in defaults) rather than failing.
    async fn read(&self, slot: StoreSlot) -> PortResult<Option<Value>> {
        let path = self.slot_path(slot);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                warn!(slot = slot.key(), error = %e, "could not read slot file");
                return Ok(None);
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(slot = slot.key(), error = %e, "slot file is not valid JSON");
                Ok(None)
            }
        }
    }

    async fn write(&self, slot: StoreSlot, value: &Value) -> PortResult<()> {
        let path = self.slot_path(slot);
        let bytes = serde_json::to_vec_pretty(value)
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| PortError::Unexpected(format!("cannot write {}: {e}", path.display())))
    }
}

impl JsonStoreAdapter {
    /// The directory this adapter writes into.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    async fn scratch_adapter() -> JsonStoreAdapter {
        let dir = std::env::temp_dir().join(format!("readflow-store-{}", Uuid::new_v4()));
        JsonStoreAdapter::new(dir).await.unwrap()
    }

    #[tokio::test]
    async fn absent_slot_reads_as_none() {
        let store = scratch_adapter().await;
        assert!(store.read(StoreSlot::Stats).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn slots_round_trip() {
        let store = scratch_adapter().await;
        let doc = json!({"xp": 150, "coins": 30});
        store.write(StoreSlot::Stats, &doc).await.unwrap();
        assert_eq!(store.read(StoreSlot::Stats).await.unwrap(), Some(doc));
    }

    #[tokio::test]
    async fn slots_are_independent() {
        let store = scratch_adapter().await;
        store.write(StoreSlot::Goals, &json!([1, 2, 3])).await.unwrap();
        assert!(store.read(StoreSlot::Sessions).await.unwrap().is_none());
        assert!(store.read(StoreSlot::Goals).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn corrupt_slot_reads_as_none() {
        let store = scratch_adapter().await;
        let path = store.slot_path(StoreSlot::Syllabus);
        tokio::fs::write(&path, b"{ this is not json").await.unwrap();
        assert!(store.read(StoreSlot::Syllabus).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn last_write_wins() {
        let store = scratch_adapter().await;
        store.write(StoreSlot::Stats, &json!({"xp": 1})).await.unwrap();
        store.write(StoreSlot::Stats, &json!({"xp": 2})).await.unwrap();
        assert_eq!(
            store.read(StoreSlot::Stats).await.unwrap(),
            Some(json!({"xp": 2}))
        );
    }
}
