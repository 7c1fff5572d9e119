//! Whole-file rewriting: line accumulation and map finalisation.

use std::fs;
use std::io::{self, ErrorKind};
use std::path::Path;

use sourcemap::SourceMap;

use crate::config::RewriteConfig;
use crate::error::RewriteError;
use crate::manifest::AssetManifest;
use crate::maps::build_rewrite_map;
use crate::models::{LineResult, RewrittenFile};
use crate::rewrite::rewrite_line;

/// Rewrites whole files against a fixed configuration and manifest.
///
/// The rewriter holds no per-file state; every [`rewrite`](Self::rewrite)
/// call is an independent computation, so one rewriter may serve many files,
/// including concurrently from multiple threads.
#[derive(Debug, Clone, Copy)]
pub struct FileRewriter<'a> {
    config: &'a RewriteConfig,
    manifest: &'a AssetManifest,
}

impl<'a> FileRewriter<'a> {
    /// Create a rewriter over the given configuration and manifest.
    pub fn new(config: &'a RewriteConfig, manifest: &'a AssetManifest) -> Self {
        Self { config, manifest }
    }

    /// Rewrite a file's full text, producing the new text and, when the input
    /// carried positional metadata, an updated map.
    ///
    /// `upstream` mirrors the three input shapes: `None` for files without
    /// positional metadata (none is produced), an empty map for files
    /// entering the toolchain here (a fresh self-contained map is produced),
    /// and a populated map from an earlier stage (the produced map composes
    /// both stages).
    pub fn rewrite(
        &self,
        file_name: &str,
        source: &str,
        upstream: Option<&SourceMap>,
    ) -> RewrittenFile {
        let lines = self.rewrite_lines(source);
        let text = join_lines(&lines);
        let map = upstream
            .is_some()
            .then(|| build_rewrite_map(file_name, source, &lines, upstream));

        RewrittenFile { text, map }
    }

    /// Rewrite each line of `source`, accumulating per-line results in input
    /// order. Lines must stay in order: the recorded offsets are only
    /// meaningful against their own line number.
    pub fn rewrite_lines(&self, source: &str) -> Vec<LineResult> {
        source
            .split('\n')
            .map(|line| rewrite_line(line, self.config, self.manifest))
            .collect()
    }
}

/// Join rewritten lines back into full text.
fn join_lines(lines: &[LineResult]) -> String {
    lines
        .iter()
        .map(|line| line.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Materialise a file as text.
///
/// Inputs that cannot be read or are not valid UTF-8 are rejected with
/// [`RewriteError::ContentUnavailable`]; the rewriter only operates on
/// materialised text.
pub fn read_file_text(path: &Path) -> Result<String, RewriteError> {
    let bytes = fs::read(path).map_err(|source| RewriteError::ContentUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|err| RewriteError::ContentUnavailable {
        path: path.to_path_buf(),
        source: io::Error::new(ErrorKind::InvalidData, err),
    })
}
