//! File-backed cache of query results, one `<SYMBOL>.json` per query protein

use crate::StoreError;
use propaths_domain::traits::PayloadCache;
use propaths_domain::PayloadDocument;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// A directory of cached payload documents
#[derive(Debug, Clone)]
pub struct CacheDirectory {
    root: PathBuf,
}

impl CacheDirectory {
    /// Use `root` as the cache directory; it does not have to exist yet
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The cache directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the entry for a query protein
    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.root.join(self.entry_name(symbol))
    }

    /// Symbols with a cache entry, sorted
    ///
    /// A missing directory is an empty cache.
    pub fn symbols(&self) -> Result<Vec<String>, StoreError> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let mut symbols = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                symbols.push(stem.to_string());
            }
        }
        symbols.sort();
        Ok(symbols)
    }

    /// Write a document as the entry for its query protein
    pub fn save(&self, document: &PayloadDocument) -> Result<PathBuf, StoreError> {
        fs::create_dir_all(&self.root)?;
        let path = self.path_for(document.main());
        fs::write(&path, serde_json::to_string_pretty(document)?)?;
        Ok(path)
    }
}

impl PayloadCache for CacheDirectory {
    type Error = StoreError;

    fn load(&self, symbol: &str) -> Result<Option<PayloadDocument>, Self::Error> {
        let path = self.path_for(symbol);
        if !path.is_file() {
            return Ok(None);
        }

        let text = fs::read_to_string(&path)?;
        let value: Value = serde_json::from_str(&text)?;
        let document = PayloadDocument::from_value(value)?;
        tracing::debug!(
            "Loaded {} ({} interactors)",
            path.display(),
            document.interactors().len()
        );
        Ok(Some(document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use propaths_domain::Interactor;
    use tempfile::TempDir;

    #[test]
    fn test_missing_entry_is_none() {
        let dir = TempDir::new().unwrap();
        let cache = CacheDirectory::new(dir.path());
        assert!(cache.load("ATXN3").unwrap().is_none());
        assert!(cache.symbols().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_list() {
        let dir = TempDir::new().unwrap();
        let cache = CacheDirectory::new(dir.path().join("cache"));
        let document = PayloadDocument::with_interactors("ATXN3", vec![Interactor::new("VCP")]);

        let path = cache.save(&document).unwrap();
        assert!(path.ends_with("ATXN3.json"));
        fs::write(dir.path().join("cache").join("notes.txt"), "ignored").unwrap();

        assert_eq!(cache.symbols().unwrap(), vec!["ATXN3"]);
        let loaded = cache.load("ATXN3").unwrap().unwrap();
        assert_eq!(loaded.interactor("VCP").map(|i| i.primary.as_str()), Some("VCP"));
    }

    #[test]
    fn test_bare_context_entry() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("VCP.json"),
            r#"{"main": "VCP", "interactors": [{"primary": "ATXN3"}]}"#,
        )
        .unwrap();

        let document = CacheDirectory::new(dir.path()).load("VCP").unwrap().unwrap();
        assert_eq!(document.main(), "VCP");
        assert!(document.snapshot_in_sync());
    }

    #[test]
    fn test_malformed_entry_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("BAD.json"), "{not json").unwrap();
        let result = CacheDirectory::new(dir.path()).load("BAD");
        assert!(matches!(result, Err(StoreError::Serialization(_))));
    }
}
