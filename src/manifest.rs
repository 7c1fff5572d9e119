//! The lookup table mapping original asset paths to fingerprinted ones.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};

/// Immutable mapping from an original asset path to its fingerprinted
/// counterpart.
///
/// Entries keep the order in which they were inserted; Literal Mode scans the
/// table in that order, so a manifest loaded from JSON behaves exactly like
/// the document it came from. Inserting an existing key keeps its position
/// and overwrites its value.
#[derive(Debug, Clone, Default)]
pub struct AssetManifest {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl AssetManifest {
    /// Create an empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a mapping, replacing the value of an existing key in place.
    pub fn insert(&mut self, original: impl Into<String>, fingerprinted: impl Into<String>) {
        let original = original.into();
        let fingerprinted = fingerprinted.into();
        match self.index.get(&original) {
            Some(&slot) => self.entries[slot].1 = fingerprinted,
            None => {
                self.index.insert(original.clone(), self.entries.len());
                self.entries.push((original, fingerprinted));
            }
        }
    }

    /// Look up the fingerprinted path for an original path.
    pub fn get(&self, original: &str) -> Option<&str> {
        self.index
            .get(original)
            .map(|&slot| self.entries[slot].1.as_str())
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries in the manifest.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the manifest holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load a manifest from a JSON file of `{"original": "fingerprinted"}`
    /// pairs, as produced by asset revisioning tools.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AssetManifest {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut manifest = Self::new();
        for (original, fingerprinted) in iter {
            manifest.insert(original, fingerprinted);
        }
        manifest
    }
}

impl<'de> Deserialize<'de> for AssetManifest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ManifestVisitor;

        impl<'de> Visitor<'de> for ManifestVisitor {
            type Value = AssetManifest;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of original paths to fingerprinted paths")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut manifest = AssetManifest::new();
                while let Some((original, fingerprinted)) =
                    access.next_entry::<String, String>()?
                {
                    manifest.insert(original, fingerprinted);
                }
                Ok(manifest)
            }
        }

        deserializer.deserialize_map(ManifestVisitor)
    }
}

/// Errors that can occur while loading a manifest file.
#[derive(Debug)]
pub enum ManifestError {
    /// Failed to read the manifest file from disk.
    Io {
        /// Path that caused the error.
        path: PathBuf,
        /// Source I/O error.
        source: std::io::Error,
    },
    /// Failed to parse the JSON manifest file.
    Parse {
        /// Path that caused the error.
        path: PathBuf,
        /// Source parse error.
        source: serde_json::Error,
    },
}

impl fmt::Display for ManifestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ManifestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn preserves_insertion_order() {
        let manifest: AssetManifest =
            serde_json::from_str(r#"{"z.css": "z.1.css", "a.js": "a.2.js", "m.png": "m.3.png"}"#)
                .expect("manifest should parse");

        let keys: Vec<&str> = manifest.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["z.css", "a.js", "m.png"]);
    }

    #[test]
    fn last_value_wins_for_duplicate_keys() {
        let manifest: AssetManifest =
            serde_json::from_str(r#"{"a.js": "a.old.js", "b.js": "b.1.js", "a.js": "a.new.js"}"#)
                .expect("manifest should parse");

        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest.get("a.js"), Some("a.new.js"));
        let keys: Vec<&str> = manifest.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a.js", "b.js"]);
    }

    #[test]
    fn looks_up_inserted_entries() {
        let mut manifest = AssetManifest::new();
        assert!(manifest.is_empty());

        manifest.insert("img/logo.png", "img/logo.a1b2c3.png");
        assert_eq!(manifest.get("img/logo.png"), Some("img/logo.a1b2c3.png"));
        assert_eq!(manifest.get("missing.png"), None);
        assert_eq!(manifest.len(), 1);
    }

    #[test]
    fn loads_manifest_files() {
        let temp = tempdir().expect("failed to create temp dir");
        let path = temp.path().join("rev-manifest.json");
        fs::write(&path, r#"{"css/app.css": "css/app.d41d8c.css"}"#)
            .expect("failed to write manifest");

        let manifest = AssetManifest::load_from_path(&path).expect("manifest should load");
        assert_eq!(manifest.get("css/app.css"), Some("css/app.d41d8c.css"));
    }

    #[test]
    fn load_reports_missing_files() {
        let temp = tempdir().expect("failed to create temp dir");
        let result = AssetManifest::load_from_path(temp.path().join("absent.json"));
        assert!(matches!(result, Err(ManifestError::Io { .. })));
    }

    #[test]
    fn load_reports_invalid_json() {
        let temp = tempdir().expect("failed to create temp dir");
        let path = temp.path().join("rev-manifest.json");
        fs::write(&path, "not json").expect("failed to write manifest");

        let result = AssetManifest::load_from_path(&path);
        assert!(matches!(result, Err(ManifestError::Parse { .. })));
    }
}
