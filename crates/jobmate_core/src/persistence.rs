//! crates/jobmate_core/src/persistence.rs
//!
//! Single-key JSON slots layered over a `KeyValueStore`.
//!
//! A slot holds at most one document. Reads never fail: a missing, unreadable
//! or corrupt entry comes back as `None` so callers can start from scratch.

use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

use crate::domain::CvData;
use crate::ports::{KeyValueStore, PortError, PortResult};

pub const CV_STORAGE_KEY: &str = "jobmate_current_cv";
pub const SETTINGS_STORAGE_KEY: &str = "userSettings";
pub const SESSION_STORAGE_KEY: &str = "jobmate-auth-storage";

/// A typed view over one key in a `KeyValueStore`.
pub struct SingleSlot<T> {
    store: Arc<dyn KeyValueStore>,
    key: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for SingleSlot<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            key: self.key,
            _marker: PhantomData,
        }
    }
}

impl<T> SingleSlot<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(store: Arc<dyn KeyValueStore>, key: &'static str) -> Self {
        Self {
            store,
            key,
            _marker: PhantomData,
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Serializes `value` into the slot, replacing whatever was there.
    pub fn save(&self, value: &T) -> PortResult<()> {
        let json =
            serde_json::to_string(value).map_err(|e| PortError::Storage(e.to_string()))?;
        self.store.set(self.key, &json)?;
        debug!("saved slot '{}'", self.key);
        Ok(())
    }

    /// Loads the slot's document, treating anything unusable as empty.
    pub fn load(&self) -> Option<T> {
        let raw = match self.store.get(self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("failed to read slot '{}': {}", self.key, e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("discarding corrupt entry in slot '{}': {}", self.key, e);
                None
            }
        }
    }

    pub fn clear(&self) -> PortResult<()> {
        self.store.remove(self.key)?;
        debug!("cleared slot '{}'", self.key);
        Ok(())
    }
}

/// The "current CV" slot.
pub type CvSlot = SingleSlot<CvData>;

pub fn cv_slot(store: Arc<dyn KeyValueStore>) -> CvSlot {
    SingleSlot::new(store, CV_STORAGE_KEY)
}

//=========================================================================================
// In-memory store
//=========================================================================================

/// A process-local `KeyValueStore`, used when nothing should touch disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A panic while holding the lock leaves the map itself intact.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> PortResult<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> PortResult<()> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> PortResult<()> {
        self.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_cv;

    fn slot() -> (Arc<MemoryStore>, CvSlot) {
        let store = Arc::new(MemoryStore::new());
        let slot = cv_slot(store.clone());
        (store, slot)
    }

    #[test]
    fn save_then_load_returns_equal_document() {
        let (_, slot) = slot();
        let cv = sample_cv("Grace Hopper", "modern");
        slot.save(&cv).unwrap();
        assert_eq!(slot.load(), Some(cv));
    }

    #[test]
    fn clear_then_load_returns_none() {
        let (_, slot) = slot();
        slot.save(&sample_cv("Grace Hopper", "modern")).unwrap();
        slot.clear().unwrap();
        assert_eq!(slot.load(), None);
    }

    #[test]
    fn missing_entry_loads_as_none() {
        let (_, slot) = slot();
        assert_eq!(slot.load(), None);
    }

    #[test]
    fn corrupt_entry_loads_as_none() {
        let (store, slot) = slot();
        store.set(CV_STORAGE_KEY, "{ not json").unwrap();
        assert_eq!(slot.load(), None);
        store.set(CV_STORAGE_KEY, r#"{"template": 42}"#).unwrap();
        assert_eq!(slot.load(), None);
    }

    #[test]
    fn saving_overwrites_the_previous_document() {
        let (_, slot) = slot();
        slot.save(&sample_cv("First Person", "modern")).unwrap();
        slot.save(&sample_cv("Second Person", "creative")).unwrap();
        let loaded = slot.load().unwrap();
        assert_eq!(loaded.personal_info.full_name, "Second Person");
        assert_eq!(loaded.template, "creative");
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> PortResult<Option<String>> {
            Err(PortError::Storage("disk unplugged".into()))
        }
        fn set(&self, _key: &str, _value: &str) -> PortResult<()> {
            Err(PortError::Storage("disk unplugged".into()))
        }
        fn remove(&self, _key: &str) -> PortResult<()> {
            Err(PortError::Storage("disk unplugged".into()))
        }
    }

    #[test]
    fn unreadable_store_loads_as_none() {
        let slot = cv_slot(Arc::new(FailingStore));
        assert_eq!(slot.load(), None);
        assert!(slot.save(&sample_cv("A", "modern")).is_err());
    }
}
