//! Persistent key-value store for user preferences.
//!
//! The page only ever persists one flag (the dark-mode choice), but the store
//! is a plain string map so the key stays a configuration detail.

use crate::error::{PageKitError, Result};
use log::debug;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const STORE_DIR: &str = "pagekit";
const STORE_FILE: &str = "preferences.toml";

/// String key-value persistence consumed by the theme toggle.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Store that lives for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `pairs`
    pub fn with_values<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store persisted as a flat TOML table of strings.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Store under the platform data directory (`<data dir>/pagekit/preferences.toml`)
    pub fn default_location() -> Result<Self> {
        let base = dirs::data_dir()
            .ok_or_else(|| PageKitError::config("no data directory on this platform"))?;
        Ok(Self::new(base.join(STORE_DIR).join(STORE_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every stored pair, sorted by key
    pub fn entries(&self) -> Result<BTreeMap<String, String>> {
        self.read()
    }

    fn read(&self) -> Result<BTreeMap<String, String>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => {
                return Err(PageKitError::storage(
                    format!("Failed to read {}", self.path.display()),
                    err,
                ))
            }
        };
        toml::from_str(&contents).map_err(|_| PageKitError::CorruptStore {
            path: self.path.clone(),
        })
    }

    fn write(&self, values: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                PageKitError::storage(format!("Failed to create {}", parent.display()), e)
            })?;
        }
        let contents = toml::to_string(values)
            .map_err(|e| PageKitError::other(format!("Failed to encode preferences: {}", e)))?;
        fs::write(&self.path, contents).map_err(|e| {
            PageKitError::storage(format!("Failed to write {}", self.path.display()), e)
        })
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut values = self.read()?;
        values.insert(key.to_string(), value.to_string());
        self.write(&values)?;
        debug!("stored {}={} in {}", key, value, self.path.display());
        Ok(())
    }
}

/// Either store, picked at runtime by the CLI.
#[derive(Debug, Clone)]
pub enum AnyStore {
    Memory(MemoryStore),
    File(FileStore),
}

impl PreferenceStore for AnyStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self {
            AnyStore::Memory(store) => store.get(key),
            AnyStore::File(store) => store.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match self {
            AnyStore::Memory(store) => store.set(key, value),
            AnyStore::File(store) => store.set(key, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("darkMode").unwrap(), None);
        store.set("darkMode", "true").unwrap();
        assert_eq!(store.get("darkMode").unwrap().as_deref(), Some("true"));

        let seeded = MemoryStore::with_values([("darkMode", "false")]);
        assert_eq!(seeded.get("darkMode").unwrap().as_deref(), Some("false"));
    }

    #[test]
    fn test_file_store_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("prefs.toml"));
        assert_eq!(store.get("darkMode").unwrap(), None);
        assert!(store.entries().unwrap().is_empty());
    }

    #[test]
    fn test_file_store_persists_between_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.toml");

        let mut store = FileStore::new(&path);
        store.set("darkMode", "true").unwrap();
        store.set("darkMode", "false").unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("darkMode").unwrap().as_deref(), Some("false"));
        assert_eq!(reopened.entries().unwrap().len(), 1);
    }

    #[test]
    fn test_file_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.toml");
        fs::write(&path, "darkMode = [not valid").unwrap();

        let store = FileStore::new(&path);
        assert!(matches!(
            store.get("darkMode"),
            Err(PageKitError::CorruptStore { .. })
        ));
    }
}
