//! PartitionIndex: per-rank catalogue of locally visible cells.
//!
//! The index stores one horizontal slice of the decomposition: the global id
//! and owner of every cell visible on this rank, grouped into zones (see
//! [`Zone`]). Meshes with vertical layers reuse the same slice, and the
//! translation routines map flat local indices to and from global ids as
//! `layer * stride + slice_index`.
//!
//! Local indices are **1-based** throughout.
//!
//! # Layer strides
//!
//! [`global_from_local`](PartitionIndex::global_from_local) steps layers by
//! `total_cells_in_layer() + ghost_count()`, whereas
//! [`local_from_global`](PartitionIndex::local_from_global) steps them by
//! `total_cells_in_layer()` alone. Both search and emit through the ghost
//! segment. The two translations are therefore inverse on layer 0 for every
//! catalogue, and on all layers only when `ghost_count() == 0`. Downstream
//! halo exchange relies on the current numbering, so the difference is kept.
//!
//! # Mutation
//!
//! An index is immutable after construction apart from
//! [`copy_from`](PartitionIndex::copy_from), which requires `&mut self` and so
//! cannot overlap with readers. For an index shared across threads use
//! [`SharedPartitionIndex`](super::SharedPartitionIndex).

use super::layout::{PartitionLayout, ValidationOptions};
use super::lookup::ordered_lookup;
use super::zone::{Zone, ZoneIter};
use crate::debug_invariants::DebugInvariants;
use crate::index_error::PartitionIndexError;

/// Per-rank partition index.
///
/// # Invariants
///
/// - `cell_owner` is index-aligned with `cell_ids`.
/// - Zone counts sum to the length of `cell_ids`.
/// - Each zone segment of `cell_ids` is strictly ascending.
/// - `last_*` offsets equal the cumulative zone counts in layout order.
///
/// The first two are enforced on every construction; the rest according to
/// [`ValidationOptions`]. All can be re-checked with
/// [`validate_invariants`](DebugInvariants::validate_invariants).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartitionIndex {
    layout: PartitionLayout,
}

impl PartitionIndex {
    /// Bulk-load an index using [`ValidationOptions::default`].
    ///
    /// # Errors
    /// Returns `MalformedInput` if the layout fails validation.
    pub fn new(layout: PartitionLayout) -> Result<Self, PartitionIndexError> {
        Self::with_options(layout, ValidationOptions::default())
    }

    /// Bulk-load an index with explicit validation options.
    ///
    /// # Errors
    /// Returns `MalformedInput` if the layout fails a shape check, or a
    /// selected deep check with [`ViolationHandling::Error`](super::ViolationHandling::Error).
    pub fn with_options(
        layout: PartitionLayout,
        options: ValidationOptions,
    ) -> Result<Self, PartitionIndexError> {
        layout.validate(&options)?;
        let index = Self { layout };
        log::debug!(
            "rank {}/{}: partition index with {} inner depth(s), {} halo depth(s), {} cells in layer, {} ghosts",
            index.local_rank(),
            index.total_ranks(),
            index.inner_depth(),
            index.halo_depth(),
            index.total_cells_in_layer(),
            index.ghost_count(),
        );
        Ok(index)
    }

    /// Wrap a layout already known to be well formed.
    pub(crate) fn from_layout_unchecked(layout: PartitionLayout) -> Self {
        let index = Self { layout };
        crate::debug_invariants!(index.validate_invariants(), "PartitionIndex invalid");
        index
    }

    // -------------------------------------------------------------------------
    // Zone metadata
    // -------------------------------------------------------------------------

    /// Cells in one layer: edge, all inner and all halo zones. Ghosts excluded.
    pub fn total_cells_in_layer(&self) -> usize {
        let l = &self.layout;
        l.num_edge + l.num_inner.iter().sum::<usize>() + l.num_halo.iter().sum::<usize>()
    }

    /// Number of inner zones.
    #[inline]
    pub fn inner_depth(&self) -> usize {
        self.layout.inner_depth()
    }

    /// Number of halo zones.
    #[inline]
    pub fn halo_depth(&self) -> usize {
        self.layout.halo_depth()
    }

    /// Cell count of inner zone `depth`; 0 for a depth that is not stored.
    #[inline]
    pub fn inner_count(&self, depth: usize) -> usize {
        at_depth(&self.layout.num_inner, depth)
    }

    /// Cumulative end offset of inner zone `depth`; 0 for a depth that is not stored.
    #[inline]
    pub fn inner_last(&self, depth: usize) -> usize {
        at_depth(&self.layout.last_inner, depth)
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.layout.num_edge
    }

    #[inline]
    pub fn edge_last(&self) -> usize {
        self.layout.last_edge
    }

    /// Cell count of halo zone `depth`; 0 for a depth that is not stored.
    #[inline]
    pub fn halo_count(&self, depth: usize) -> usize {
        at_depth(&self.layout.num_halo, depth)
    }

    /// Cumulative end offset of halo zone `depth`; 0 for a depth that is not stored.
    #[inline]
    pub fn halo_last(&self, depth: usize) -> usize {
        at_depth(&self.layout.last_halo, depth)
    }

    #[inline]
    pub fn ghost_count(&self) -> usize {
        self.layout.num_ghost
    }

    #[inline]
    pub fn local_rank(&self) -> usize {
        self.layout.local_rank
    }

    #[inline]
    pub fn total_ranks(&self) -> usize {
        self.layout.total_ranks
    }

    /// Cells in one horizontal layer of the global mesh.
    #[inline]
    pub fn global_num_cells(&self) -> u64 {
        self.layout.global_num_cells
    }

    /// Cells owned by this rank (inner and edge zones).
    pub fn owned_count(&self) -> usize {
        self.layout.num_edge + self.layout.num_inner.iter().sum::<usize>()
    }

    /// Number of cells in the stored slice, ghosts included.
    #[inline]
    pub fn len(&self) -> usize {
        self.layout.cell_ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layout.cell_ids.is_empty()
    }

    /// Global ids of the stored slice in layout order.
    #[inline]
    pub fn cell_ids(&self) -> &[u64] {
        &self.layout.cell_ids
    }

    /// Owners of the stored slice, aligned with [`cell_ids`](Self::cell_ids).
    #[inline]
    pub fn cell_owners(&self) -> &[usize] {
        &self.layout.cell_owner
    }

    /// Zones in layout order.
    pub fn zones(&self) -> ZoneIter {
        self.layout.zones()
    }

    /// 0-based range of [`cell_ids`](Self::cell_ids) covered by `zone`.
    pub fn segment_range(&self, zone: Zone) -> Option<std::ops::Range<usize>> {
        self.layout.segment_range(zone)
    }

    /// Global ids of one zone, ascending.
    pub fn segment(&self, zone: Zone) -> Option<&[u64]> {
        self.segment_range(zone).map(|r| &self.layout.cell_ids[r])
    }

    // -------------------------------------------------------------------------
    // Cell queries
    // -------------------------------------------------------------------------

    /// Owning rank of the cell at `local_index` in the stored slice.
    ///
    /// # Errors
    /// `IndexOutOfRange` unless `1 <= local_index <= len()`.
    pub fn owner_of(&self, local_index: usize) -> Result<usize, PartitionIndexError> {
        local_index
            .checked_sub(1)
            .and_then(|i| self.layout.cell_owner.get(i))
            .copied()
            .ok_or_else(|| self.out_of_range(local_index))
    }

    /// Zone holding the slice position of `local_index`, layers wrapping with
    /// the same stride as [`global_from_local`](Self::global_from_local).
    ///
    /// # Errors
    /// `IndexOutOfRange` for index 0 or an empty catalogue.
    pub fn zone_of(&self, local_index: usize) -> Result<Zone, PartitionIndexError> {
        let (_, slice) = self.split_local(local_index)?;
        let mut end = 0usize;
        for zone in self.zones() {
            end += self.layout.zone_len(zone);
            if slice < end {
                return Ok(zone);
            }
        }
        Err(self.out_of_range(local_index))
    }

    /// Global id of the cell at `local_index`.
    ///
    /// `local_index` may address any vertical layer: with
    /// `stride = total_cells_in_layer() + ghost_count()` the result is
    /// `cell_ids[(i - 1) % stride] + ((i - 1) / stride) * global_num_cells`.
    ///
    /// # Errors
    /// `IndexOutOfRange` for index 0, an empty catalogue, or a result that
    /// does not fit in `u64`.
    pub fn global_from_local(&self, local_index: usize) -> Result<u64, PartitionIndexError> {
        let (layer, slice) = self.split_local(local_index)?;
        let id = self.layout.cell_ids[slice];
        u64::try_from(layer)
            .ok()
            .and_then(|layer| layer.checked_mul(self.layout.global_num_cells))
            .and_then(|base| base.checked_add(id))
            .ok_or_else(|| self.out_of_range(local_index))
    }

    /// Local index of global cell `global_index`, or `None` if the cell is
    /// not visible on this rank.
    ///
    /// Zones are searched in layout order and the first match wins. Layers
    /// are stepped by `total_cells_in_layer()`, ghosts excluded.
    pub fn local_from_global(&self, global_index: u64) -> Option<usize> {
        let per_layer = self.layout.global_num_cells;
        if global_index == 0 || per_layer == 0 {
            return None;
        }
        let layer = usize::try_from((global_index - 1) / per_layer).ok()?;
        let slice_global = (global_index - 1) % per_layer + 1;

        let mut searched = 0usize;
        for zone in self.zones() {
            let len = self.layout.zone_len(zone);
            let segment = &self.layout.cell_ids[searched..searched + len];
            if let Some(pos) = ordered_lookup(segment, slice_global) {
                return layer
                    .checked_mul(self.total_cells_in_layer())?
                    .checked_add(searched + pos);
            }
            searched += len;
        }
        None
    }

    /// Translate a batch of global ids.
    pub fn locals_from_globals(&self, globals: &[u64]) -> Vec<Option<usize>> {
        globals.iter().map(|&g| self.local_from_global(g)).collect()
    }

    /// Translate a batch of global ids on the rayon pool.
    #[cfg(feature = "rayon")]
    pub fn par_locals_from_globals(&self, globals: &[u64]) -> Vec<Option<usize>> {
        use rayon::prelude::*;
        globals
            .par_iter()
            .map(|&g| self.local_from_global(g))
            .collect()
    }

    // -------------------------------------------------------------------------
    // Value semantics
    // -------------------------------------------------------------------------

    /// Replace every field of `self` with an independent copy of `source`.
    ///
    /// Existing allocations of `self` may be reused but never shared with
    /// `source`. Nothing is recomputed.
    pub fn copy_from(&mut self, source: &PartitionIndex) {
        let PartitionLayout {
            local_rank,
            total_ranks,
            global_num_cells,
            cell_ids,
            cell_owner,
            num_inner,
            last_inner,
            num_edge,
            last_edge,
            num_halo,
            last_halo,
            num_ghost,
        } = &source.layout;
        let dst = &mut self.layout;
        dst.local_rank = *local_rank;
        dst.total_ranks = *total_ranks;
        dst.global_num_cells = *global_num_cells;
        dst.cell_ids.clone_from(cell_ids);
        dst.cell_owner.clone_from(cell_owner);
        dst.num_inner.clone_from(num_inner);
        dst.last_inner.clone_from(last_inner);
        dst.num_edge = *num_edge;
        dst.last_edge = *last_edge;
        dst.num_halo.clone_from(num_halo);
        dst.last_halo.clone_from(last_halo);
        dst.num_ghost = *num_ghost;
        log::debug!(
            "rank {}: copied partition index ({} cells)",
            dst.local_rank,
            dst.cell_ids.len()
        );
    }

    /// The bulk-load record this index was built from.
    pub fn to_layout(&self) -> PartitionLayout {
        self.layout.clone()
    }

    pub fn into_layout(self) -> PartitionLayout {
        self.layout
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    /// Split a 1-based local index into `(layer, 0-based slice position)`.
    fn split_local(&self, local_index: usize) -> Result<(usize, usize), PartitionIndexError> {
        let stride = self.total_cells_in_layer() + self.ghost_count();
        match local_index.checked_sub(1) {
            Some(i) if stride > 0 => Ok((i / stride, i % stride)),
            _ => Err(self.out_of_range(local_index)),
        }
    }

    #[inline]
    fn out_of_range(&self, index: usize) -> PartitionIndexError {
        PartitionIndexError::IndexOutOfRange {
            index,
            len: self.len(),
        }
    }
}

#[inline]
fn at_depth(values: &[usize], depth: usize) -> usize {
    depth
        .checked_sub(1)
        .and_then(|i| values.get(i))
        .copied()
        .unwrap_or(0)
}

impl TryFrom<PartitionLayout> for PartitionIndex {
    type Error = PartitionIndexError;

    fn try_from(layout: PartitionLayout) -> Result<Self, Self::Error> {
        Self::new(layout)
    }
}

impl From<PartitionIndex> for PartitionLayout {
    fn from(index: PartitionIndex) -> Self {
        index.into_layout()
    }
}

impl DebugInvariants for PartitionIndex {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "PartitionIndex invalid");
    }

    fn validate_invariants(&self) -> Result<(), PartitionIndexError> {
        let l = &self.layout;
        l.check_shape()?;
        l.check_sorted()?;
        l.check_offsets()?;
        l.check_owners()?;
        Ok(())
    }
}
