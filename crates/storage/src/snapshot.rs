//! JSON documents wrapped in a versioned envelope: `{"state": ..., "version": 0}`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::repository::{KeyValueStore, StorageError, StoreKey};

pub const SNAPSHOT_VERSION: u32 = 0;

#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    state: T,
    #[serde(default)]
    version: u32,
}

/// Serialize `state` into its stored form.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if `state` cannot be encoded.
pub fn encode<T: Serialize>(state: &T) -> Result<String, StorageError> {
    serde_json::to_string(&Envelope {
        state,
        version: SNAPSHOT_VERSION,
    })
    .map_err(|err| StorageError::Serialization(err.to_string()))
}

/// Decode a stored document.
///
/// # Errors
///
/// Returns `StorageError::Serialization` for malformed JSON, a missing
/// `state`, or a version newer than this build understands.
pub fn decode<T: DeserializeOwned>(raw: &str) -> Result<T, StorageError> {
    let envelope: Envelope<T> =
        serde_json::from_str(raw).map_err(|err| StorageError::Serialization(err.to_string()))?;
    if envelope.version > SNAPSHOT_VERSION {
        return Err(StorageError::Serialization(format!(
            "unsupported snapshot version {}",
            envelope.version
        )));
    }
    Ok(envelope.state)
}

/// Load and decode the document under `key`; `Ok(None)` if nothing is stored.
///
/// # Errors
///
/// Returns `StorageError` if the store fails or the document is corrupt.
pub async fn load<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: StoreKey,
) -> Result<Option<T>, StorageError> {
    match store.get(key).await? {
        Some(raw) => decode(&raw).map(Some),
        None => Ok(None),
    }
}

/// Encode and store `state` under `key`.
///
/// # Errors
///
/// Returns `StorageError` if encoding or the write fails.
pub async fn save<T: Serialize + Sync>(
    store: &dyn KeyValueStore,
    key: StoreKey,
    state: &T,
) -> Result<(), StorageError> {
    let raw = encode(state)?;
    store.set(key, &raw).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryStore;
    use learn_core::model::{AppSettings, UserProgress};

    #[test]
    fn encodes_with_envelope() {
        let raw = encode(&AppSettings::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["version"], 0);
        assert_eq!(value["state"]["codeEditorFontSize"], 16);
    }

    #[test]
    fn rejects_future_versions() {
        let raw = r#"{"state": {}, "version": 7}"#;
        assert!(matches!(
            decode::<UserProgress>(raw),
            Err(StorageError::Serialization(_))
        ));
    }

    #[test]
    fn rejects_bare_documents() {
        assert!(decode::<UserProgress>(r#"{"xp": 10}"#).is_err());
        assert!(decode::<UserProgress>("not json").is_err());
    }

    #[tokio::test]
    async fn load_returns_none_when_absent() {
        let store = InMemoryStore::new();
        let loaded: Option<UserProgress> = load(&store, StoreKey::UserProgress).await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn save_then_load() {
        let store = InMemoryStore::new();
        let mut progress = UserProgress::default();
        progress.increment_xp(30);
        save(&store, StoreKey::UserProgress, &progress).await.unwrap();

        let loaded: UserProgress = load(&store, StoreKey::UserProgress).await.unwrap().unwrap();
        assert_eq!(loaded, progress);
    }
}
