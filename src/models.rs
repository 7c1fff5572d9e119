//! Data structures produced while rewriting a file.

/// Byte offsets describing one substitution performed within a line.
///
/// The `original_*` offsets index into the line as it stood when the
/// substitution was found; the `generated_*` offsets index into the rewritten
/// line. The two boundaries act as paired position markers, one at the start
/// of the replaced span and one at its end, so `generated_end -
/// generated_start` always equals the length of the inserted text and
/// `original_end - original_start` the length of the text it replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Replacement {
    /// Start of the replaced span in the original line.
    pub original_start: usize,
    /// End of the replaced span in the original line.
    pub original_end: usize,
    /// Start of the inserted text in the rewritten line.
    pub generated_start: usize,
    /// End of the inserted text in the rewritten line.
    pub generated_end: usize,
}

/// Outcome of rewriting a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineResult {
    /// The rewritten line text.
    pub text: String,
    /// Substitutions performed on the line, in the order they were applied.
    pub replacements: Vec<Replacement>,
}

/// Full result of rewriting one file.
pub struct RewrittenFile {
    /// Rewritten file content.
    pub text: String,
    /// Updated positional map, present when the input carried one.
    pub map: Option<sourcemap::SourceMap>,
}
