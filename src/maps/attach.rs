//! Discovery and loading of positional metadata attached to a text file.

use std::fs;
use std::path::{Path, PathBuf};

use base64::{Engine as _, engine::general_purpose};
use sourcemap::SourceMap;

use crate::error::RewriteError;

const SOURCE_MAP_MARKER: &str = "sourceMappingURL=";

/// Reference to the positional metadata attached to a text file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceMapRef {
    /// Inline `data:` URI carrying a base64-encoded JSON map.
    Inline(String),
    /// Relative path to an external map file.
    External(String),
}

/// Locate a trailing `sourceMappingURL` comment in the file text.
///
/// Both the `//#` line comment form and the CSS `/*# ... */` block form are
/// recognised; the last reference in the file wins.
pub fn find_source_map_ref(text: &str) -> Option<SourceMapRef> {
    for line in text.lines().rev() {
        let trimmed = line.trim();
        let Some(comment) = trimmed
            .strip_prefix("//#")
            .or_else(|| trimmed.strip_prefix("/*#"))
        else {
            continue;
        };
        let Some(url) = comment.trim_start().strip_prefix(SOURCE_MAP_MARKER) else {
            continue;
        };
        let url = url.trim_end_matches("*/").trim();
        if url.is_empty() {
            continue;
        }
        return Some(match url.strip_prefix("data:") {
            Some(data) => SourceMapRef::Inline(data.to_string()),
            None => SourceMapRef::External(url.to_string()),
        });
    }
    None
}

/// Load and parse the map referenced from `text`, resolving external
/// references relative to `dir`.
///
/// Returns `Ok(None)` when the text carries no reference.
pub fn load_referenced_map(text: &str, dir: &Path) -> Result<Option<SourceMap>, RewriteError> {
    match find_source_map_ref(text) {
        Some(SourceMapRef::Inline(data)) => parse_inline(&data).map(Some),
        Some(SourceMapRef::External(relative)) => load_map_file(&dir.join(&relative)).map(Some),
        None => Ok(None),
    }
}

/// Parse an inline `data:` URI payload into a source map.
pub fn parse_inline(data: &str) -> Result<SourceMap, RewriteError> {
    let payload = match data.split_once(',') {
        Some((_, payload)) => payload,
        None => data,
    };
    let bytes = general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|source| RewriteError::MalformedDataUri { source })?;
    SourceMap::from_slice(&bytes).map_err(|source| RewriteError::MalformedSourceMap {
        file: "<inline>".to_string(),
        source,
    })
}

/// Load and parse a source map file from disk.
pub fn load_map_file(path: &Path) -> Result<SourceMap, RewriteError> {
    let bytes = fs::read(path).map_err(|source| RewriteError::ContentUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    SourceMap::from_slice(&bytes).map_err(|source| RewriteError::MalformedSourceMap {
        file: path.display().to_string(),
        source,
    })
}

/// Serialise a map to the standard JSON exchange format.
pub fn to_json_string(map: &SourceMap) -> Result<String, RewriteError> {
    let mut buffer = Vec::new();
    map.to_writer(&mut buffer)
        .map_err(|source| RewriteError::MalformedSourceMap {
            file: map.get_file().unwrap_or("<unnamed>").to_string(),
            source,
        })?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Conventional sibling map path for a file (`name.ext` becomes
/// `name.ext.map`).
pub fn sibling_map_path(file: &Path) -> PathBuf {
    let mut name = file
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".map");
    file.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sourcemap::SourceMapBuilder;
    use tempfile::tempdir;

    fn sample_map_json() -> String {
        let mut builder = SourceMapBuilder::new(Some("app.css"));
        builder.add(0, 10, 0, 4, Some("app.scss"), None, false);
        to_json_string(&builder.into_sourcemap()).expect("map should serialise")
    }

    #[test]
    fn finds_external_references() {
        let js = "code();\n//# sourceMappingURL=bundle.js.map\n";
        assert_eq!(
            find_source_map_ref(js),
            Some(SourceMapRef::External("bundle.js.map".to_string()))
        );

        let css = "body {}\n/*# sourceMappingURL=app.css.map */\n";
        assert_eq!(
            find_source_map_ref(css),
            Some(SourceMapRef::External("app.css.map".to_string()))
        );
    }

    #[test]
    fn finds_inline_references_and_parses_them() {
        let encoded = general_purpose::STANDARD.encode(sample_map_json());
        let text = format!(
            "code();\n//# sourceMappingURL=data:application/json;base64,{encoded}\n"
        );

        let reference = find_source_map_ref(&text).expect("reference should be found");
        assert!(matches!(reference, SourceMapRef::Inline(_)));

        let map = load_referenced_map(&text, Path::new("."))
            .expect("map should load")
            .expect("map should be present");
        assert_eq!(map.get_file(), Some("app.css"));
        assert_eq!(map.get_source(0), Some("app.scss"));
    }

    #[test]
    fn returns_none_without_reference() {
        assert_eq!(find_source_map_ref("plain text\nno comments\n"), None);
    }

    #[test]
    fn rejects_invalid_inline_payloads() {
        let result = parse_inline("application/json;base64,@@@not-base64@@@");
        assert!(matches!(result, Err(RewriteError::MalformedDataUri { .. })));
    }

    #[test]
    fn loads_external_map_files() {
        let temp = tempdir().expect("failed to create temp dir");
        let path = temp.path().join("app.css.map");
        fs::write(&path, sample_map_json()).expect("failed to write map");

        let map = load_map_file(&path).expect("map should load");
        assert_eq!(map.get_file(), Some("app.css"));

        let missing = load_map_file(&temp.path().join("absent.map"));
        assert!(matches!(
            missing,
            Err(RewriteError::ContentUnavailable { .. })
        ));
    }

    #[test]
    fn rejects_malformed_map_files() {
        let temp = tempdir().expect("failed to create temp dir");
        let path = temp.path().join("broken.map");
        fs::write(&path, "{\"version\": \"not a map\"").expect("failed to write map");

        let result = load_map_file(&path);
        assert!(matches!(
            result,
            Err(RewriteError::MalformedSourceMap { .. })
        ));
    }

    #[test]
    fn sibling_map_path_appends_extension() {
        assert_eq!(
            sibling_map_path(Path::new("dist/app.css")),
            PathBuf::from("dist/app.css.map")
        );
    }
}
