//! PartitionIndexError: unified error type for partition index APIs
//!
//! Lookups that simply miss (a global cell not visible on this rank) are not
//! errors and are reported as `None`; this type covers out-of-range local
//! indices and malformed bulk-load input.

use crate::partition::Zone;
use thiserror::Error;

/// Unified error type for partition index operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PartitionIndexError {
    /// A local index fell outside `[1, len]` of the local catalogue.
    #[error("local index {index} out of range (catalogue holds {len} cells)")]
    IndexOutOfRange { index: usize, len: usize },
    /// The bulk-load arrays violate the zone layout.
    #[error("malformed partition input: {0}")]
    MalformedInput(#[from] LayoutError),
}

/// Specific ways a [`PartitionLayout`](crate::partition::PartitionLayout) can be malformed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// Two arrays that must be index-aligned have different lengths.
    #[error("`{field}` has length {found}, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        found: usize,
    },
    /// Zone counts do not add up to the number of stored cells.
    #[error("zone counts sum to {expected} cells but {found} cell ids were supplied")]
    SegmentOverflow { expected: usize, found: usize },
    /// `total_ranks` was zero.
    #[error("rank set is empty")]
    NoRanks,
    /// `local_rank` is not a member of the rank set.
    #[error("local rank {rank} outside rank set of size {total_ranks}")]
    RankOutOfRange { rank: usize, total_ranks: usize },
    /// A zone segment is not strictly ascending.
    #[error("zone {zone} is not strictly ascending at position {position}")]
    UnsortedSegment { zone: Zone, position: usize },
    /// A stored cumulative end offset disagrees with the zone counts.
    #[error("zone {zone} ends at {found}, counts imply {expected}")]
    OffsetMismatch {
        zone: Zone,
        expected: usize,
        found: usize,
    },
    /// A cell owner is not a member of the rank set.
    #[error("cell at position {position} owned by rank {owner}, rank set has {total_ranks}")]
    OwnerOutOfRange {
        position: usize,
        owner: usize,
        total_ranks: usize,
    },
}
