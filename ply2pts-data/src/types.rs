//! Core property types shared by the header parser and the vertex remapper.
//!
//! A PLY header names per-vertex properties in whatever order the writer chose.
//! A PTS line always has the same seven columns. These types describe both
//! sides and the column mapping between them.

use std::fmt;

/// Token written for every target property the source does not provide.
pub const DEFAULT_VALUE: &str = "255";

/// Number of header lines scanned before the header is considered malformed.
pub const MAX_HEADER_LINES: usize = 32;

/// A per-vertex scalar property recognised in a PLY header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Property {
    X,
    Y,
    Z,
    R,
    G,
    B,
    Nx,
    Ny,
    Nz,
}

impl Property {
    /// Every recognised property, in canonical order.
    pub const ALL: [Property; 9] = [
        Property::X,
        Property::Y,
        Property::Z,
        Property::R,
        Property::G,
        Property::B,
        Property::Nx,
        Property::Ny,
        Property::Nz,
    ];

    /// Look up a property by its header name. Names are case sensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Header name of the property.
    pub fn name(self) -> &'static str {
        match self {
            Property::X => "x",
            Property::Y => "y",
            Property::Z => "z",
            Property::R => "r",
            Property::G => "g",
            Property::B => "b",
            Property::Nx => "nx",
            Property::Ny => "ny",
            Property::Nz => "nz",
        }
    }

    /// The PTS column this property feeds, if any. Normals have no PTS column.
    pub fn target(self) -> Option<TargetProperty> {
        match self {
            Property::X => Some(TargetProperty::X),
            Property::Y => Some(TargetProperty::Y),
            Property::Z => Some(TargetProperty::Z),
            Property::R => Some(TargetProperty::R),
            Property::G => Some(TargetProperty::G),
            Property::B => Some(TargetProperty::B),
            Property::Nx | Property::Ny | Property::Nz => None,
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A column of a PTS output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TargetProperty {
    X,
    Y,
    Z,
    Intensity,
    R,
    G,
    B,
}

/// Column order of every PTS line. Part of the output format, never reorder.
pub const TARGET_ORDER: [TargetProperty; 7] = [
    TargetProperty::X,
    TargetProperty::Y,
    TargetProperty::Z,
    TargetProperty::Intensity,
    TargetProperty::R,
    TargetProperty::G,
    TargetProperty::B,
];

impl TargetProperty {
    pub fn name(self) -> &'static str {
        match self {
            TargetProperty::X => "x",
            TargetProperty::Y => "y",
            TargetProperty::Z => "z",
            TargetProperty::Intensity => "intensity",
            TargetProperty::R => "r",
            TargetProperty::G => "g",
            TargetProperty::B => "b",
        }
    }

    /// Position of this property in [`TARGET_ORDER`].
    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for TargetProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Source column index for each PTS column.
///
/// Built once by the header parser. `intensity` is never read from a PLY file,
/// so it is always absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceOrderMap {
    columns: [Option<usize>; 7],
}

impl SourceOrderMap {
    /// Source column of `target`, or `None` when the source lacks it.
    pub fn get(&self, target: TargetProperty) -> Option<usize> {
        self.columns[target.slot()]
    }

    /// Whether `target` already has a column.
    pub fn contains(&self, target: TargetProperty) -> bool {
        self.get(target).is_some()
    }

    /// Number of target properties backed by a source column.
    pub fn assigned_count(&self) -> usize {
        self.columns.iter().flatten().count()
    }

    /// Assigned `(target, column)` pairs in target order.
    pub fn iter(&self) -> impl Iterator<Item = (TargetProperty, usize)> + '_ {
        TARGET_ORDER
            .iter()
            .filter_map(|&t| self.get(t).map(|column| (t, column)))
    }

    /// Record `column` for `target`. Only the header parser builds maps, and
    /// it never assigns `intensity` or assigns the same target twice.
    pub(crate) fn assign(&mut self, target: TargetProperty, column: usize) {
        debug_assert!(target != TargetProperty::Intensity);
        debug_assert!(!self.contains(target));
        self.columns[target.slot()] = Some(column);
    }
}
