//! Error types surfaced by the rewriting pipeline.

use std::path::PathBuf;

/// Errors that can occur while preparing or rewriting a file.
#[derive(Debug)]
pub enum RewriteError {
    /// Input bytes could not be materialised as text.
    ContentUnavailable {
        /// Path of the offending input.
        path: PathBuf,
        /// Source I/O error.
        source: std::io::Error,
    },
    /// An attached positional map lacks the structure required for rewriting.
    MalformedSourceMap {
        /// File the map belongs to.
        file: String,
        /// Source parse error.
        source: sourcemap::Error,
    },
    /// An inline source map payload could not be decoded.
    MalformedDataUri {
        /// Source decode error.
        source: base64::DecodeError,
    },
    /// A custom reference pattern failed to compile.
    InvalidPattern {
        /// Source regex error.
        source: regex::Error,
    },
}

impl std::fmt::Display for RewriteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ContentUnavailable { path, source } => {
                write!(f, "cannot rewrite {}: {}", path.display(), source)
            }
            Self::MalformedSourceMap { file, source } => {
                write!(f, "malformed source map for {}: {}", file, source)
            }
            Self::MalformedDataUri { source } => {
                write!(f, "failed to decode inline source map: {}", source)
            }
            Self::InvalidPattern { source } => {
                write!(f, "invalid reference pattern: {}", source)
            }
        }
    }
}

impl std::error::Error for RewriteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ContentUnavailable { source, .. } => Some(source),
            Self::MalformedSourceMap { source, .. } => Some(source),
            Self::MalformedDataUri { source } => Some(source),
            Self::InvalidPattern { source } => Some(source),
        }
    }
}
