//! The substitution engine: two interchangeable line-rewriting strategies.
//!
//! Pattern Mode finds candidates with a reference regex and resolves each
//! against the manifest; Literal Mode instead scans the line for every
//! manifest key. Both record the byte offsets of every substitution they
//! perform so positional metadata can be remapped afterwards.

mod literal;
mod pattern;
mod resolver;

pub use resolver::PathResolver;

use crate::config::{RewriteConfig, RewriteMode};
use crate::manifest::AssetManifest;
use crate::models::LineResult;

/// Rewrite a single line using the strategy selected by the configuration.
pub fn rewrite_line(line: &str, config: &RewriteConfig, manifest: &AssetManifest) -> LineResult {
    let resolver = PathResolver::new(config, manifest);
    match config.mode {
        RewriteMode::Pattern => {
            pattern::rewrite_line(line, &config.pattern, &resolver, config.verbose)
        }
        RewriteMode::Literal => literal::rewrite_line(line, config, manifest, &resolver),
    }
}
