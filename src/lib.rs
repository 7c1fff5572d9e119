#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod manifest;
pub mod maps;
pub mod models;
pub mod pipeline;
pub mod rewrite;

pub use config::{RewriteConfig, RewriteMode, RewriteOptions, default_reference_pattern};
pub use error::RewriteError;
pub use manifest::{AssetManifest, ManifestError};
pub use models::{LineResult, Replacement, RewrittenFile};
pub use pipeline::{FileRewriter, read_file_text};
