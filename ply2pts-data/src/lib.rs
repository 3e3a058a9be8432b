//! ply2pts Data Crate
//!
//! Conversion of ASCII PLY point clouds into PTS point lists.
//! The header parser builds a column map from the PLY property declarations and
//! the remapper rewrites each vertex line into the fixed `x y z intensity r g b`
//! order. This crate only emits `tracing` events; installing a subscriber is up
//! to the application.

pub mod convert;
pub mod error;
pub mod ply;
pub mod types;

pub use convert::{ConversionSummary, ConvertOptions, DataLoop, convert, convert_file};
pub use error::ConvertError;
pub use ply::{HeaderLine, PlyHeader, parse_header, remap_vertex};
pub use types::{
    DEFAULT_VALUE, MAX_HEADER_LINES, Property, SourceOrderMap, TARGET_ORDER, TargetProperty,
};
