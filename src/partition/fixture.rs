//! Deterministic fixtures for test suites.
//!
//! These indices do not depend on any partitioner: every field is fixed by
//! the requested mesh extent.

use super::index::PartitionIndex;
use super::layout::PartitionLayout;

/// Builds small, fully specified single-rank indices.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureBuilder;

impl FixtureBuilder {
    /// Rank 0 of 1 owning a 3×3 mesh.
    ///
    /// All nine cells sit in inner depth 1; the edge, halo depth 1 and ghost
    /// zones are empty. `cell_ids = [1..=9]`, every owner is 0.
    pub fn three_by_three() -> PartitionIndex {
        Self::single_rank(3, 3)
    }

    /// Rank 0 of 1 owning an `nx`×`ny` mesh with the same zone shape as
    /// [`three_by_three`](Self::three_by_three).
    ///
    /// # Panics
    ///
    /// Panics if `nx * ny` overflows `usize`.
    pub fn single_rank(nx: usize, ny: usize) -> PartitionIndex {
        let n = nx
            .checked_mul(ny)
            .expect("fixture extent nx * ny overflows usize");
        PartitionIndex::from_layout_unchecked(PartitionLayout {
            local_rank: 0,
            total_ranks: 1,
            global_num_cells: n as u64,
            cell_ids: (1..=n as u64).collect(),
            cell_owner: vec![0; n],
            num_inner: vec![n],
            last_inner: vec![n],
            num_edge: 0,
            last_edge: n,
            num_halo: vec![0],
            last_halo: vec![n],
            num_ghost: 0,
        })
    }
}
