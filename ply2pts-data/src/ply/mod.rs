//! ASCII PLY header parsing and vertex remapping

mod header;
mod vertex;

pub use header::{HeaderLine, PlyHeader, parse_header};
pub use vertex::remap_vertex;
