//! Persisted key-value state (auth token, client identifier).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::DashboardError;

/// Key holding the bearer token.
pub const AUTH_TOKEN_KEY: &str = "auth_token";
/// Key holding the generated client identifier.
pub const CLIENT_ID_KEY: &str = "client_id";

/// Small string key-value persistence used by the API client.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), DashboardError>;
    fn remove(&self, key: &str) -> Result<(), DashboardError>;
}

/// Process-local store. Contents are lost when the process exits.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DashboardError> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), DashboardError> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key);
        Ok(())
    }
}

/// Store backed by a JSON object file, rewritten on every change.
///
/// A missing file reads as empty. A corrupt file is reported on open
/// rather than silently discarded.
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStore {
    pub fn open(path: &Path) -> Result<Self, DashboardError> {
        let entries = match std::fs::read_to_string(path) {
            Ok(raw) if raw.trim().is_empty() => HashMap::new(),
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                return Err(DashboardError::Storage(format!(
                    "failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };
        Ok(Self {
            path: path.to_path_buf(),
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<(), DashboardError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                DashboardError::Storage(format!("failed to create {}: {}", parent.display(), e))
            })?;
        }
        let json = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, json).map_err(|e| {
            DashboardError::Storage(format!("failed to write {}: {}", self.path.display(), e))
        })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DashboardError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), DashboardError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "dashboard-store-{}-{}.json",
            name,
            std::process::id()
        ))
    }

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get(AUTH_TOKEN_KEY), None);
        store.set(AUTH_TOKEN_KEY, "abc").unwrap();
        assert_eq!(store.get(AUTH_TOKEN_KEY).as_deref(), Some("abc"));
        store.remove(AUTH_TOKEN_KEY).unwrap();
        assert_eq!(store.get(AUTH_TOKEN_KEY), None);
    }

    #[test]
    fn file_store_persists_across_opens() {
        let path = temp_path("persist");
        let _ = std::fs::remove_file(&path);

        let store = FileStore::open(&path).unwrap();
        store.set(CLIENT_ID_KEY, "k3x9").unwrap();
        store.set(AUTH_TOKEN_KEY, "tok").unwrap();
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get(CLIENT_ID_KEY).as_deref(), Some("k3x9"));
        reopened.remove(AUTH_TOKEN_KEY).unwrap();
        drop(reopened);

        let again = FileStore::open(&path).unwrap();
        assert_eq!(again.get(AUTH_TOKEN_KEY), None);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn failed_write_leaves_entries_unchanged() {
        let dir = std::env::temp_dir().join(format!("dashboard-store-ro-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let _ = std::fs::remove_file(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("state.json");

        let store = FileStore::open(&path).unwrap();
        store.set(AUTH_TOKEN_KEY, "old").unwrap();

        // Replace the parent directory with a plain file so writes fail.
        std::fs::remove_dir_all(&dir).unwrap();
        std::fs::write(&dir, "").unwrap();

        assert!(store.set(AUTH_TOKEN_KEY, "new").is_err());
        assert_eq!(store.get(AUTH_TOKEN_KEY).as_deref(), Some("old"));
        assert!(store.set(CLIENT_ID_KEY, "k3x9").is_err());
        assert_eq!(store.get(CLIENT_ID_KEY), None);
        assert!(store.remove(AUTH_TOKEN_KEY).is_err());
        assert_eq!(store.get(AUTH_TOKEN_KEY).as_deref(), Some("old"));

        let _ = std::fs::remove_file(&dir);
    }

    #[test]
    fn file_store_rejects_corrupt_file() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "{not json").unwrap();
        assert!(FileStore::open(&path).is_err());
        let _ = std::fs::remove_file(&path);
    }
}
