//! User preferences
//!
//! Durable key-value storage scoped to the embedding origin. The store
//! reads the remembered subtitle language once per auto-selection decision;
//! it never writes it. Writing is the job of whichever widget handles an
//! explicit user track choice.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Key under which the last explicitly chosen subtitle language is kept.
pub const SUBTITLES_LANG_KEY: &str = "media-chrome-pref-subtitles-lang";

pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory store, the default. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    map: RefCell<HashMap<String, String>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.map.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.map.borrow_mut().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.map.borrow_mut().remove(key);
    }
}

#[derive(Debug, Error)]
enum PrefError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse: {0}")]
    Parse(#[from] serde_json::Error),
}

/// JSON-file-backed store. A missing or unreadable file degrades to an
/// empty map; write failures are logged and the in-memory view stays
/// authoritative for the session.
#[derive(Debug)]
pub struct JsonFilePreferences {
    path: PathBuf,
    map: RefCell<HashMap<String, String>>,
}

impl JsonFilePreferences {
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let map = match Self::load(&path) {
            Ok(map) => map,
            Err(err) => {
                tracing::debug!("preference file {} not loaded: {}", path.display(), err);
                HashMap::new()
            }
        };
        Self {
            path,
            map: RefCell::new(map),
        }
    }

    fn load(path: &Path) -> Result<HashMap<String, String>, PrefError> {
        let bytes = std::fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn persist(&self) {
        let result: Result<(), PrefError> = (|| {
            let json = serde_json::to_vec_pretty(&*self.map.borrow())?;
            std::fs::write(&self.path, json)?;
            Ok(())
        })();
        if let Err(err) = result {
            tracing::warn!("failed to persist preferences to {}: {}", self.path.display(), err);
        }
    }
}

impl PreferenceStore for JsonFilePreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.map.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.map.borrow_mut().insert(key.to_string(), value.to_string());
        self.persist();
    }

    fn remove(&self, key: &str) {
        self.map.borrow_mut().remove(key);
        self.persist();
    }
}
