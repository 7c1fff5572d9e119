//! Builds the positional map describing performed substitutions and layers it
//! onto any pre-existing map.

use sourcemap::{SourceMap, SourceMapBuilder};

use crate::models::LineResult;

/// Build the positional map for a rewritten file.
///
/// Without an upstream map, or with one carrying no mappings, the result is a
/// fresh self-contained map whose single source is `file_name` with
/// `original_text` embedded as its content. With a populated upstream map the
/// result starts as a structural copy of it, gains one mapping per recorded
/// replacement boundary, and is then composed with the upstream map exactly
/// once, so positions in the output resolve through both transformations back
/// to the true original source.
///
/// When `lines` records no replacements the output is behaviourally
/// equivalent to the upstream map.
pub fn build_rewrite_map(
    file_name: &str,
    original_text: &str,
    lines: &[LineResult],
    upstream: Option<&SourceMap>,
) -> SourceMap {
    match upstream {
        Some(upstream) if upstream.get_token_count() > 0 => {
            let declared_file = upstream.get_file().unwrap_or(file_name).to_string();
            let mut builder = SourceMapBuilder::new(Some(declared_file.as_str()));
            copy_sources(&mut builder, upstream);
            for token in upstream.tokens() {
                builder.add(
                    token.get_dst_line(),
                    token.get_dst_col(),
                    token.get_src_line(),
                    token.get_src_col(),
                    token.get_source(),
                    token.get_name(),
                    false,
                );
            }
            add_line_mappings(&mut builder, lines, &declared_file);
            apply_upstream(builder.into_sourcemap(), upstream, &declared_file)
        }
        _ => {
            let mut builder = SourceMapBuilder::new(Some(file_name));
            let src_id = builder.add_source(file_name);
            builder.set_source_contents(src_id, Some(original_text));
            add_line_mappings(&mut builder, lines, file_name);
            builder.into_sourcemap()
        }
    }
}

/// Add one mapping per replacement boundary: span start and span end.
fn add_line_mappings(builder: &mut SourceMapBuilder, lines: &[LineResult], source: &str) {
    for (line_no, line) in lines.iter().enumerate() {
        let line_no = line_no as u32;
        for replacement in &line.replacements {
            builder.add(
                line_no,
                replacement.generated_start as u32,
                line_no,
                replacement.original_start as u32,
                Some(source),
                None,
                false,
            );
            builder.add(
                line_no,
                replacement.generated_end as u32,
                line_no,
                replacement.original_end as u32,
                Some(source),
                None,
                false,
            );
        }
    }
}

/// Compose the upstream map underneath mappings that point at `declared_file`.
///
/// A mapping whose original position refers to `declared_file` describes a
/// generated position of the upstream stage; resolving it through the
/// upstream map yields the true original position. Mappings referring to
/// other sources are carried over unchanged, as are mappings the upstream map
/// cannot resolve.
fn apply_upstream(current: SourceMap, upstream: &SourceMap, declared_file: &str) -> SourceMap {
    let mut builder = SourceMapBuilder::new(current.get_file());

    for token in current.tokens() {
        let composed = if token.get_source() == Some(declared_file) {
            upstream
                .lookup_token(token.get_src_line(), token.get_src_col())
                .filter(|found| found.get_dst_line() == token.get_src_line())
                .filter(|found| found.get_source().is_some())
        } else {
            None
        };

        match composed {
            Some(found) => builder.add(
                token.get_dst_line(),
                token.get_dst_col(),
                found.get_src_line(),
                found.get_src_col(),
                found.get_source(),
                found.get_name().or(token.get_name()),
                false,
            ),
            None => builder.add(
                token.get_dst_line(),
                token.get_dst_col(),
                token.get_src_line(),
                token.get_src_col(),
                token.get_source(),
                token.get_name(),
                false,
            ),
        };
    }

    copy_sources(&mut builder, &current);
    copy_sources(&mut builder, upstream);
    builder.into_sourcemap()
}

/// Register a map's sources and their embedded contents on the builder.
fn copy_sources(builder: &mut SourceMapBuilder, map: &SourceMap) {
    for index in 0..map.get_source_count() {
        if let Some(source) = map.get_source(index) {
            let src_id = builder.add_source(source);
            if let Some(contents) = map.get_source_contents(index) {
                builder.set_source_contents(src_id, Some(contents));
            }
        }
    }
}
