//! Configuration describing how references are matched and rewritten.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use crate::error::RewriteError;

const DEFAULT_CONFIG_FILE: &str = "fingerprint.config.json";

/// Matching strategy used when scanning a line for asset references.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewriteMode {
    /// Regex-driven matching: one candidate per pattern match.
    #[default]
    Pattern,
    /// Table-driven scanning: every manifest key is searched for literally.
    Literal,
}

/// Raw options as supplied by an options file or CLI flags.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RewriteOptions {
    /// Path to the manifest JSON file.
    pub manifest: Option<PathBuf>,
    /// Custom reference-matching pattern overriding the default (Pattern Mode
    /// only).
    pub pattern: Option<String>,
    /// String prepended to every accepted replacement value.
    pub prefix: String,
    /// Path prefix stripped from candidates before a final lookup attempt, or
    /// prepended when building Literal Mode search variants.
    pub base: String,
    /// Path prefix removed from replacement values before they are emitted.
    pub strip: String,
    /// Matching strategy to use.
    pub mode: RewriteMode,
    /// Enables diagnostic reporting of found and replaced references.
    pub verbose: bool,
}

impl RewriteOptions {
    /// Attempt to load options from the provided directory.
    ///
    /// When the options file does not exist or fails to parse we fall back to
    /// default values so flag-only invocations keep working.
    pub fn discover(dir: &Path) -> Self {
        Self::from_path(&dir.join(DEFAULT_CONFIG_FILE)).unwrap_or_default()
    }

    /// Read options from a specific JSON file.
    pub fn from_path(path: &Path) -> Option<Self> {
        let contents = fs::read_to_string(path).ok()?;
        serde_json::from_str(&contents).ok()
    }

    /// Compile the options into an immutable run configuration.
    pub fn into_config(self) -> Result<RewriteConfig, RewriteError> {
        let pattern = match self.pattern {
            Some(raw) => {
                Regex::new(&raw).map_err(|source| RewriteError::InvalidPattern { source })?
            }
            None => default_reference_pattern().clone(),
        };

        Ok(RewriteConfig {
            prefix: self.prefix,
            base: normalise_prefix(self.base),
            strip: normalise_prefix(self.strip),
            mode: self.mode,
            pattern,
            verbose: self.verbose,
        })
    }
}

/// Immutable configuration for one rewriting run.
#[derive(Debug, Clone)]
pub struct RewriteConfig {
    /// String prepended to every accepted replacement value.
    pub prefix: String,
    /// Path prefix for candidate lookups and Literal Mode search variants,
    /// without its leading separator.
    pub base: String,
    /// Path prefix removed from replacement values, without its leading
    /// separator.
    pub strip: String,
    /// Matching strategy.
    pub mode: RewriteMode,
    /// Compiled reference-matching pattern (Pattern Mode).
    pub pattern: Regex,
    /// Enables diagnostic reporting of found and replaced references.
    pub verbose: bool,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            base: String::new(),
            strip: String::new(),
            mode: RewriteMode::default(),
            pattern: default_reference_pattern().clone(),
            verbose: false,
        }
    }
}

/// Remove a single leading path separator from a configured prefix.
fn normalise_prefix(value: String) -> String {
    match value.strip_prefix('/') {
        Some(trimmed) => trimmed.to_string(),
        None => value,
    }
}

/// The default reference pattern, covering `url(...)` values and `src`/`href`
/// attributes with double, single or no quoting.
pub fn default_reference_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r#"(?:url\(["']?(.*?)['"]?\)|src=["'](.*?)['"]|src=([^\s>]+)(?:>|\s)|href=["'](.*?)['"]|href=([^\s>]+)(?:>|\s))"#,
        )
        .expect("invalid reference regex")
    })
}
