//! Literal Mode: manifest-driven scanning for known asset paths.

use log::info;

use crate::config::RewriteConfig;
use crate::manifest::AssetManifest;
use crate::models::{LineResult, Replacement};
use crate::rewrite::resolver::PathResolver;

/// Rewrite one line by searching for every manifest key literally.
///
/// For each entry, search variants are tried in priority order:
/// `/{base}/{key}` and `{base}/{key}` when a base is configured, then
/// `/{key}` and `{key}`. The first variant occurring anywhere in the line
/// wins: every occurrence of it is replaced and the remaining variants for
/// that entry are skipped.
///
/// Entries are processed in manifest insertion order and each observes the
/// line as rewritten by the entries before it, so a later entry may rewrite
/// text introduced by an earlier replacement. Recorded offsets are likewise
/// relative to the line state their entry observed.
pub fn rewrite_line(
    line: &str,
    config: &RewriteConfig,
    manifest: &AssetManifest,
    resolver: &PathResolver<'_>,
) -> LineResult {
    let mut text = line.to_string();
    let mut replacements = Vec::new();

    for (key, value) in manifest.iter() {
        let replaced = resolver.replacement_text(value);
        for variant in search_variants(&config.base, key) {
            if !text.contains(&variant) {
                continue;
            }
            if config.verbose {
                info!("found {}", key.trim_start_matches('/'));
                info!("replaced with {replaced}");
            }
            let (rewritten, found) = replace_occurrences(&text, &variant, &replaced);
            text = rewritten;
            replacements.extend(found);
            break;
        }
    }

    LineResult { text, replacements }
}

/// Build the ordered list of literal variants to search for a manifest key.
fn search_variants(base: &str, key: &str) -> Vec<String> {
    let mut variants = Vec::with_capacity(4);
    if !base.is_empty() {
        let base = base.trim_end_matches('/');
        variants.push(format!("/{base}/{key}"));
        variants.push(format!("{base}/{key}"));
    }
    variants.push(format!("/{key}"));
    variants.push(key.to_string());
    variants
}

/// Replace every occurrence of `variant`, recording boundary offsets.
fn replace_occurrences(
    line: &str,
    variant: &str,
    replacement: &str,
) -> (String, Vec<Replacement>) {
    let mut text = String::with_capacity(line.len());
    let mut replacements = Vec::new();
    let mut cursor = 0;

    for (start, _) in line.match_indices(variant) {
        text.push_str(&line[cursor..start]);
        let generated_start = text.len();
        text.push_str(replacement);
        replacements.push(Replacement {
            original_start: start,
            original_end: start + variant.len(),
            generated_start,
            generated_end: text.len(),
        });
        cursor = start + variant.len();
    }

    text.push_str(&line[cursor..]);
    (text, replacements)
}
