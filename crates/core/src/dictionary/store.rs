//! File-backed storage for the brand dictionary.

use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use super::{BrandDictionary, DictionaryError};

/// Reads and writes the brand dictionary JSON document.
#[derive(Debug, Clone)]
pub struct DictionaryStore {
    path: PathBuf,
}

impl DictionaryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the dictionary.
    ///
    /// A missing or malformed file yields an empty dictionary; the run
    /// continues with whatever brands discovery finds.
    pub fn load(&self) -> BrandDictionary {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %self.path.display(), "Brand dictionary not found, starting empty");
                return BrandDictionary::default();
            }
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "Failed to read brand dictionary");
                return BrandDictionary::default();
            }
        };

        match serde_json::from_str::<BrandDictionary>(&contents) {
            Ok(dictionary) => {
                info!(
                    path = %self.path.display(),
                    brands = dictionary.total_brands(),
                    "Loaded brand dictionary"
                );
                dictionary
            }
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "Malformed brand dictionary, starting empty");
                BrandDictionary::default()
            }
        }
    }

    /// Rewrite the whole dictionary file.
    pub fn save(&self, dictionary: &BrandDictionary) -> Result<(), DictionaryError> {
        let json = serde_json::to_string_pretty(dictionary)
            .map_err(|e| DictionaryError::Serialize(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| DictionaryError::Io(e.to_string()))?;
            }
        }

        std::fs::write(&self.path, json).map_err(|e| DictionaryError::Io(e.to_string()))?;
        info!(path = %self.path.display(), "Brand dictionary saved");
        Ok(())
    }
}
