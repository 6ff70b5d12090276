use gloo::storage::{SessionStorage, Storage};
use nisbot_core::{SnapshotStore, StoreError};
use serde::{Serialize, de::DeserializeOwned};

pub(crate) trait StorageKey {
    const KEY: &'static str;
}

/// Values kept in `sessionStorage` for the lifetime of the browser tab.
pub(crate) trait SessionSaved: StorageKey + Serialize + DeserializeOwned {
    fn session_load() -> Option<Self> {
        SessionStorage::get(Self::KEY).ok()
    }

    fn session_save(&self) {
        if let Err(err) = SessionStorage::set(Self::KEY, self) {
            log::error!("Could not save {} to session storage: {:?}", Self::KEY, err);
        }
    }

    fn session_clear() {
        SessionStorage::delete(Self::KEY);
    }
}

impl<T: StorageKey + Serialize + DeserializeOwned> SessionSaved for T {}

/// Snapshot store backed by `sessionStorage`, documents are kept as raw strings.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct SessionStore;

impl SnapshotStore for SessionStore {
    fn save(&mut self, key: &str, document: &str) -> Result<(), StoreError> {
        SessionStorage::raw()
            .set_item(key, document)
            .map_err(|err| StoreError(format!("{:?}", err)))
    }

    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        SessionStorage::raw()
            .get_item(key)
            .map_err(|err| StoreError(format!("{:?}", err)))
    }

    fn delete(&mut self, key: &str) {
        SessionStorage::delete(key);
    }
}

/// Helper function to use JavaScript's Math.random
pub(crate) fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    u64::from_be_bytes([
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
    ])
}
