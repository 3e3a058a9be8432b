//! PLY header parsing
//!
//! The header is scanned line by line. Each line is classified into one of a
//! few categories, tried in a fixed priority order, and only scalar vertex
//! properties contribute to the source column map.

use crate::error::ConvertError;
use crate::types::{Property, SourceOrderMap};
use std::collections::BTreeSet;
use std::io::BufRead;
use tracing::{debug, info, warn};

const END_HEADER: &str = "end_header";

/// One classified header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderLine<'a> {
    /// Header terminator.
    End,
    /// `element vertex <N>`
    VertexCount(usize),
    /// `property list <count-type> <elem-type> <name>`
    ListProperty { name: &'a str },
    /// `property <type> <name>`
    ScalarProperty { kind: &'a str, name: &'a str },
    /// `format <encoding> <version>`
    Format { encoding: &'a str },
    /// Magic line, comments, other elements and anything unrecognised.
    Other,
}

impl<'a> HeaderLine<'a> {
    /// Classify a single header line (without its line terminator).
    pub fn classify(line: &'a str) -> Self {
        if line.contains(END_HEADER) {
            return HeaderLine::End;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.as_slice() {
            ["element", "vertex", count] => match count.parse() {
                Ok(n) => HeaderLine::VertexCount(n),
                Err(_) => HeaderLine::Other,
            },
            ["property", "list", _count_kind, _elem_kind, name] => {
                HeaderLine::ListProperty { name: *name }
            }
            ["property", kind, name] if *kind != "list" => HeaderLine::ScalarProperty {
                kind: *kind,
                name: *name,
            },
            ["format", encoding, _version] => HeaderLine::Format {
                encoding: *encoding,
            },
            _ => HeaderLine::Other,
        }
    }
}

/// Everything the remapper needs from a parsed header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlyHeader {
    /// Declared number of vertices.
    pub vertex_count: usize,
    /// Source column of each PTS column.
    pub source_order: SourceOrderMap,
    /// Recognised scalar properties found in the header.
    pub detected: BTreeSet<Property>,
    /// Scalar property names outside the recognised set.
    pub unsupported: BTreeSet<String>,
    /// Header lines consumed, terminator included.
    pub header_lines: usize,
}

impl PlyHeader {
    /// Detected properties that have a PTS column.
    pub fn pts_properties(&self) -> impl Iterator<Item = Property> + '_ {
        self.detected.iter().copied().filter(|p| p.target().is_some())
    }
}

#[derive(Default)]
struct HeaderState {
    vertex_count: Option<usize>,
    source_order: SourceOrderMap,
    next_column: usize,
    detected: BTreeSet<Property>,
    unsupported: BTreeSet<String>,
}

impl HeaderState {
    fn vertex_count(&mut self, count: usize) {
        match self.vertex_count {
            None => {
                info!(vertex_count = count, "Found vertex count");
                self.vertex_count = Some(count);
            }
            Some(first) => {
                warn!(first, ignored = count, "Duplicate vertex count declaration");
            }
        }
    }

    fn scalar_property(&mut self, kind: &str, name: &str) {
        let Some(property) = Property::from_name(name) else {
            warn!(name, kind, "Unsupported property");
            self.unsupported.insert(name.to_string());
            return;
        };

        self.detected.insert(property);

        if let Some(target) = property.target() {
            if !self.source_order.contains(target) {
                debug!(property = %property, column = self.next_column, "Assigned source column");
                self.source_order.assign(target, self.next_column);
                self.next_column += 1;
            }
        }
    }

    fn finish(self, header_lines: usize) -> Result<PlyHeader, ConvertError> {
        let vertex_count = self.vertex_count.ok_or(ConvertError::MissingVertexCount)?;

        let header = PlyHeader {
            vertex_count,
            source_order: self.source_order,
            detected: self.detected,
            unsupported: self.unsupported,
            header_lines,
        };

        let ply_names: Vec<_> = header.detected.iter().map(|p| p.name()).collect();
        let pts_names: Vec<_> = header.pts_properties().map(|p| p.name()).collect();
        info!(properties = ?ply_names, "Detected PLY properties");
        info!(properties = ?pts_names, "Detected PTS properties");
        if !header.unsupported.is_empty() {
            info!(properties = ?header.unsupported, "Skipped unsupported properties");
        }

        Ok(header)
    }
}

/// Parse a PLY header, leaving `reader` positioned on the first data line.
///
/// Fails with [`ConvertError::MalformedHeader`] when `end_header` does not
/// appear within `max_lines` lines and with [`ConvertError::MissingVertexCount`]
/// when the header never declares `element vertex <N>`.
#[tracing::instrument(skip_all, fields(max_lines = max_lines))]
pub fn parse_header<R: BufRead>(reader: &mut R, max_lines: usize) -> Result<PlyHeader, ConvertError> {
    let mut state = HeaderState::default();
    let mut buf = Vec::new();

    for line_number in 1..=max_lines {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Err(ConvertError::MalformedHeader {
                scanned: line_number - 1,
            });
        }

        // Lossy so that binary garbage runs into the line bound instead of a decode error.
        let text = String::from_utf8_lossy(&buf);
        let line = text.trim_end_matches(['\r', '\n']);
        debug!(line_number, line, "Header line");

        match HeaderLine::classify(line) {
            HeaderLine::End => return state.finish(line_number),
            HeaderLine::VertexCount(count) => state.vertex_count(count),
            HeaderLine::ListProperty { name } => {
                debug!(name, "Ignoring list property");
            }
            HeaderLine::ScalarProperty { kind, name } => state.scalar_property(kind, name),
            HeaderLine::Format { encoding } => {
                if encoding != "ascii" {
                    return Err(ConvertError::UnsupportedFormat(encoding.to_string()));
                }
            }
            HeaderLine::Other => {}
        }
    }

    Err(ConvertError::MalformedHeader { scanned: max_lines })
}
