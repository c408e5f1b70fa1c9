//! # Looper Accounts
//!
//! A looper is the person whose glucose is being followed. The account store
//! owns them; the timeline only ever reads by id or lists them for widget
//! configuration.
//!
//! ## Stores
//! - `InMemoryLooperStore`: fixed list, used by tests and embedding hosts
//! - `FileLooperStore`: TOML file with `[[loopers]]` tables, re-read on every call
//!   so edits made by the companion app show up on the next cycle

use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Looper {
    pub id: String,
    pub name: String,
    /// Base URL of the looper's Nightscout site.
    ///
    /// Carried for `GlucoseDataSource` implementations that talk to the
    /// site; the timeline itself never reads it.
    #[serde(default)]
    pub nightscout_url: String,
    /// Nightscout API secret, for the same data sources
    #[serde(default)]
    pub api_secret: Option<String>,
}

impl Looper {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            nightscout_url: String::new(),
            api_secret: None,
        }
    }
}

/// Read access to the looper account store
pub trait LooperStore: Send + Sync {
    fn list_all(&self) -> Result<Vec<Looper>, StoreError>;

    fn lookup(&self, id: &str) -> Result<Option<Looper>, StoreError> {
        Ok(self.list_all()?.into_iter().find(|looper| looper.id == id))
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryLooperStore {
    loopers: Vec<Looper>,
}

impl InMemoryLooperStore {
    pub fn new(loopers: Vec<Looper>) -> Self {
        Self { loopers }
    }
}

impl LooperStore for InMemoryLooperStore {
    fn list_all(&self) -> Result<Vec<Looper>, StoreError> {
        Ok(self.loopers.clone())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct LooperFile {
    #[serde(default)]
    loopers: Vec<Looper>,
}

#[derive(Debug, Clone)]
pub struct FileLooperStore {
    path: PathBuf,
}

impl FileLooperStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LooperStore for FileLooperStore {
    fn list_all(&self) -> Result<Vec<Looper>, StoreError> {
        let contents = fs::read_to_string(&self.path).map_err(StoreError::Read)?;
        let file: LooperFile = toml::from_str(&contents).map_err(StoreError::Parse)?;
        log::debug!("Loaded {} loopers from {}", file.loopers.len(), self.path.display());
        Ok(file.loopers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_in_memory_lookup() {
        let store = InMemoryLooperStore::new(vec![
            Looper::new("1", "Alice"),
            Looper::new("2", "Bob"),
        ]);

        assert_eq!(store.lookup("2").unwrap().map(|l| l.name), Some("Bob".to_string()));
        assert_eq!(store.lookup("3").unwrap(), None);
    }

    #[test]
    fn test_file_store_reads_loopers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("loopers.toml");
        fs::write(
            &path,
            r#"
                [[loopers]]
                id = "kid-1"
                name = "Sam"
                nightscout_url = "https://sam.example.com"
                api_secret = "s3cret"

                [[loopers]]
                id = "kid-2"
                name = "Jo"
            "#,
        )
        .unwrap();

        let store = FileLooperStore::new(&path);
        let loopers = store.list_all().unwrap();
        assert_eq!(loopers.len(), 2);
        assert_eq!(loopers[0].nightscout_url, "https://sam.example.com");
        assert_eq!(loopers[0].api_secret.as_deref(), Some("s3cret"));
        assert_eq!(loopers[1].nightscout_url, "");
        assert_eq!(loopers[1].api_secret, None);
        assert_eq!(store.lookup("kid-2").unwrap().unwrap().name, "Jo");
    }

    #[test]
    fn test_file_store_missing_file_is_error() {
        let dir = tempdir().unwrap();
        let store = FileLooperStore::new(dir.path().join("missing.toml"));
        assert!(matches!(store.list_all(), Err(StoreError::Read(_))));
    }

    #[test]
    fn test_file_store_bad_toml_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("loopers.toml");
        fs::write(&path, "loopers = 12").unwrap();

        let store = FileLooperStore::new(&path);
        assert!(matches!(store.lookup("x"), Err(StoreError::Parse(_))));
    }
}
