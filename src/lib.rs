#![cfg_attr(docsrs, feature(doc_cfg))]
//! # mesh-partition-index
//!
//! mesh-partition-index is the per-rank bookkeeping layer for a statically
//! computed domain decomposition. An external partitioner decides which rank
//! owns each global mesh cell and which foreign cells each rank must see to
//! evaluate stencils; this crate stores the result for one rank and answers
//! the structural queries halo-exchange and DOF-map code issue for the rest of
//! a run.
//!
//! ## Features
//! - [`PartitionIndex`](partition::PartitionIndex): zone-ordered catalogue of
//!   inner, edge, halo and ghost cells with owner lookup
//! - Local ↔ global cell translation across stacked vertical layers
//! - O(log n) ordered lookup per zone segment
//! - Validated bulk loading from a serializable [`PartitionLayout`](partition::PartitionLayout)
//! - [`SharedPartitionIndex`](partition::SharedPartitionIndex) for
//!   single-writer, multiple-reader sharing
//! - Deterministic fixtures for downstream test suites
//!
//! ## Cargo features
//! - `check-invariants` / `strict-invariants`: validate layouts fully in
//!   release builds and enable invariant assertions.
//! - `rayon`: parallel batch translation.
//!
//! ## Example
//! ```rust
//! use mesh_partition_index::prelude::*;
//!
//! let index = FixtureBuilder::three_by_three();
//! assert_eq!(index.total_cells_in_layer(), 9);
//! assert_eq!(index.local_from_global(5), Some(5));
//! // nine cells per layer: global 10 is the first cell of layer 1
//! assert_eq!(index.local_from_global(10), Some(10));
//! assert_eq!(index.local_from_global(0), None);
//! assert_eq!(index.global_from_local(10), Ok(10));
//! ```

pub mod debug_invariants;
pub mod index_error;
pub mod partition;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::index_error::{LayoutError, PartitionIndexError};
    pub use crate::partition::{
        FixtureBuilder, PartitionIndex, PartitionLayout, SharedPartitionIndex, ValidationOptions,
        ViolationHandling, Zone,
    };
}
