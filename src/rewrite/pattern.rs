//! Pattern Mode: regex-driven matching of asset references within a line.

use log::info;
use regex::{Captures, Match, Regex};

use crate::models::{LineResult, Replacement};
use crate::rewrite::resolver::PathResolver;

/// A pattern match carrying the captured candidate reference.
#[derive(Debug, Clone, Copy)]
struct MatchCandidate<'t> {
    /// Full matched text including surrounding syntax such as `url(...)`.
    full: Match<'t>,
    /// The captured reference inside the match.
    candidate: &'t str,
}

/// Rewrite one line by applying the reference pattern globally.
///
/// Each match contributes at most one candidate, taken from its first
/// non-empty capture group. Resolved candidates are replaced inside the
/// matched text so the surrounding syntax is preserved; unresolved matches
/// pass through unchanged. Matches are processed left to right and every
/// substitution records its boundary offsets.
pub fn rewrite_line(
    line: &str,
    pattern: &Regex,
    resolver: &PathResolver<'_>,
    verbose: bool,
) -> LineResult {
    let mut text = String::with_capacity(line.len());
    let mut replacements = Vec::new();
    let mut cursor = 0;

    for captures in pattern.captures_iter(line) {
        let Some(found) = match_candidate(&captures) else {
            continue;
        };
        if verbose {
            info!("found {}", found.candidate.trim_start_matches('/'));
        }
        let Some(resolved) = resolver.resolve(found.candidate) else {
            continue;
        };
        let rewritten = found.full.as_str().replacen(found.candidate, &resolved, 1);
        if verbose {
            info!("replaced with {resolved}");
        }

        text.push_str(&line[cursor..found.full.start()]);
        let generated_start = text.len();
        text.push_str(&rewritten);
        replacements.push(Replacement {
            original_start: found.full.start(),
            original_end: found.full.end(),
            generated_start,
            generated_end: text.len(),
        });
        cursor = found.full.end();
    }

    text.push_str(&line[cursor..]);
    LineResult { text, replacements }
}

/// Extract the first non-empty capture group of a match, if any.
fn match_candidate<'t>(captures: &Captures<'t>) -> Option<MatchCandidate<'t>> {
    let full = captures.get(0)?;
    let candidate = captures
        .iter()
        .skip(1)
        .flatten()
        .map(|group| group.as_str())
        .find(|text| !text.is_empty())?;
    Some(MatchCandidate { full, candidate })
}
