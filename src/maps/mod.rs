//! Positional-map handling: building, composing and attaching source maps.
//!
//! The submodules split the work so that the offset-to-mapping translation
//! and the attachment plumbing can be tested independently: `remap` turns
//! recorded replacement offsets into a composed map, `attach` discovers,
//! loads and serialises the maps that travel with files.

mod attach;
mod remap;

pub use attach::{
    SourceMapRef, find_source_map_ref, load_map_file, load_referenced_map, parse_inline,
    sibling_map_path, to_json_string,
};
pub use remap::build_rewrite_map;
