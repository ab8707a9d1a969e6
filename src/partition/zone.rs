//! Zones of the local cell catalogue.
//!
//! A rank's visible cells are laid out as consecutive segments:
//! inner zones from the outermost depth down to depth 1, the edge zone, halo
//! zones from depth 1 outward, and finally a single ghost zone. [`Zone`] names
//! one of those segments; [`ZoneIter`] walks them in layout order.

use std::fmt;

/// One named segment of a rank's cell catalogue.
///
/// Depths are 1-based, matching the accessor convention of
/// [`PartitionIndex`](super::PartitionIndex).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Zone {
    /// Owned interior cells at the given insulation depth from the boundary.
    Inner(usize),
    /// Owned cells that may share degrees of freedom with a neighbour.
    Edge,
    /// Cells owned elsewhere, needed for stencils at the given depth.
    Halo(usize),
    /// The extra layer describing the stencil footprint of the outermost halo.
    Ghost,
}

impl Zone {
    /// Whether cells in this zone are owned by the local rank.
    #[inline]
    pub fn is_owned(self) -> bool {
        matches!(self, Zone::Inner(_) | Zone::Edge)
    }

    /// Depth of an inner or halo zone; `None` for edge and ghost.
    #[inline]
    pub fn depth(self) -> Option<usize> {
        match self {
            Zone::Inner(d) | Zone::Halo(d) => Some(d),
            Zone::Edge | Zone::Ghost => None,
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Inner(d) => write!(f, "inner[{d}]"),
            Zone::Edge => f.write_str("edge"),
            Zone::Halo(d) => write!(f, "halo[{d}]"),
            Zone::Ghost => f.write_str("ghost"),
        }
    }
}

/// Iterator over the zones of a catalogue in layout order.
#[derive(Clone, Debug)]
pub struct ZoneIter {
    next: Option<Zone>,
    halo_depth: usize,
}

impl ZoneIter {
    pub(crate) fn new(inner_depth: usize, halo_depth: usize) -> Self {
        let next = if inner_depth > 0 {
            Zone::Inner(inner_depth)
        } else {
            Zone::Edge
        };
        Self {
            next: Some(next),
            halo_depth,
        }
    }
}

impl Iterator for ZoneIter {
    type Item = Zone;

    fn next(&mut self) -> Option<Zone> {
        let current = self.next?;
        self.next = match current {
            Zone::Inner(d) if d > 1 => Some(Zone::Inner(d - 1)),
            Zone::Inner(_) => Some(Zone::Edge),
            Zone::Edge if self.halo_depth > 0 => Some(Zone::Halo(1)),
            Zone::Edge => Some(Zone::Ghost),
            Zone::Halo(d) if d < self.halo_depth => Some(Zone::Halo(d + 1)),
            Zone::Halo(_) => Some(Zone::Ghost),
            Zone::Ghost => None,
        };
        Some(current)
    }
}

impl std::iter::FusedIterator for ZoneIter {}
