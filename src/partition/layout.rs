//! Bulk-load input for a [`PartitionIndex`](super::PartitionIndex) and its validation.
//!
//! A [`PartitionLayout`] is the raw record an external decomposition step
//! hands over for one rank: the zone-ordered cell catalogue, the owner of each
//! cell, and the per-zone counts and cumulative end offsets. It is plain data
//! and serializable, so a loader may persist or ship it in whatever serde
//! format it prefers.
//!
//! # Preconditions
//!
//! `cell_ids` must be laid out zone by zone (inner depth `inner_depth` .. 1,
//! edge, halo 1 .. `halo_depth`, ghost) and every zone segment must be
//! strictly ascending. Shape errors are always rejected; ordering, offset and
//! owner checks run according to [`ValidationOptions`]. Input that violates
//! the ordering precondition without being checked produces wrong lookups,
//! never a panic.

use std::ops::Range;

use itertools::Itertools;

use super::zone::{Zone, ZoneIter};
use crate::index_error::LayoutError;

/// Raw per-rank decomposition record.
///
/// The inner and halo depths are implied by the lengths of `num_inner` and
/// `num_halo`.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PartitionLayout {
    /// Rank owning this catalogue.
    pub local_rank: usize,
    /// Size of the rank set.
    pub total_ranks: usize,
    /// Number of cells in one horizontal layer of the global mesh.
    pub global_num_cells: u64,
    /// Global id of every locally visible cell, zone by zone.
    pub cell_ids: Vec<u64>,
    /// Owning rank of each entry of `cell_ids`.
    pub cell_owner: Vec<usize>,
    /// Cell count per inner depth, index 0 holding depth 1.
    pub num_inner: Vec<usize>,
    /// Cumulative 1-based end offset per inner depth.
    pub last_inner: Vec<usize>,
    /// Edge cell count.
    pub num_edge: usize,
    /// Cumulative 1-based end offset of the edge zone.
    pub last_edge: usize,
    /// Cell count per halo depth, index 0 holding depth 1.
    pub num_halo: Vec<usize>,
    /// Cumulative 1-based end offset per halo depth.
    pub last_halo: Vec<usize>,
    /// Ghost cell count.
    pub num_ghost: usize,
}

impl PartitionLayout {
    #[inline]
    pub(crate) fn inner_depth(&self) -> usize {
        self.num_inner.len()
    }

    #[inline]
    pub(crate) fn halo_depth(&self) -> usize {
        self.num_halo.len()
    }

    pub(crate) fn zones(&self) -> ZoneIter {
        ZoneIter::new(self.inner_depth(), self.halo_depth())
    }

    /// Cell count of a zone yielded by [`zones`](Self::zones).
    pub(crate) fn zone_len(&self, zone: Zone) -> usize {
        match zone {
            Zone::Inner(d) => self.num_inner.get(d.wrapping_sub(1)).copied().unwrap_or(0),
            Zone::Edge => self.num_edge,
            Zone::Halo(d) => self.num_halo.get(d.wrapping_sub(1)).copied().unwrap_or(0),
            Zone::Ghost => self.num_ghost,
        }
    }

    /// 0-based range of `cell_ids` covered by `zone`, or `None` when the zone
    /// does not exist in this layout.
    pub(crate) fn segment_range(&self, zone: Zone) -> Option<Range<usize>> {
        let mut start = 0usize;
        for z in self.zones() {
            let end = start + self.zone_len(z);
            if z == zone {
                return Some(start..end);
            }
            start = end;
        }
        None
    }

    /// Checks that must hold for queries to stay in bounds.
    pub(crate) fn check_shape(&self) -> Result<(), LayoutError> {
        if self.total_ranks == 0 {
            return Err(LayoutError::NoRanks);
        }
        if self.local_rank >= self.total_ranks {
            return Err(LayoutError::RankOutOfRange {
                rank: self.local_rank,
                total_ranks: self.total_ranks,
            });
        }
        check_len("last_inner", self.num_inner.len(), self.last_inner.len())?;
        check_len("last_halo", self.num_halo.len(), self.last_halo.len())?;
        check_len("cell_owner", self.cell_ids.len(), self.cell_owner.len())?;

        let counted = self
            .zones()
            .try_fold(0usize, |acc, z| acc.checked_add(self.zone_len(z)))
            .unwrap_or(usize::MAX);
        if counted != self.cell_ids.len() {
            return Err(LayoutError::SegmentOverflow {
                expected: counted,
                found: self.cell_ids.len(),
            });
        }
        Ok(())
    }

    /// Every zone segment strictly ascending.
    pub(crate) fn check_sorted(&self) -> Result<(), LayoutError> {
        let mut start = 0usize;
        for zone in self.zones() {
            let end = start + self.zone_len(zone);
            let segment = &self.cell_ids[start..end];
            if let Some((pos, _)) = segment
                .iter()
                .tuple_windows()
                .find_position(|(a, b)| a >= b)
            {
                return Err(LayoutError::UnsortedSegment {
                    zone,
                    // 1-based local index of the offending (second) entry
                    position: start + pos + 2,
                });
            }
            start = end;
        }
        Ok(())
    }

    /// Stored `last_*` offsets agree with the cumulative counts.
    pub(crate) fn check_offsets(&self) -> Result<(), LayoutError> {
        let mut end = 0usize;
        for zone in self.zones() {
            end += self.zone_len(zone);
            let stored = match zone {
                Zone::Inner(d) => self.last_inner[d - 1],
                Zone::Edge => self.last_edge,
                Zone::Halo(d) => self.last_halo[d - 1],
                Zone::Ghost => continue,
            };
            if stored != end {
                return Err(LayoutError::OffsetMismatch {
                    zone,
                    expected: end,
                    found: stored,
                });
            }
        }
        Ok(())
    }

    /// Every owner is a member of the rank set.
    pub(crate) fn check_owners(&self) -> Result<(), LayoutError> {
        match self
            .cell_owner
            .iter()
            .find_position(|&&owner| owner >= self.total_ranks)
        {
            Some((pos, &owner)) => Err(LayoutError::OwnerOutOfRange {
                position: pos + 1,
                owner,
                total_ranks: self.total_ranks,
            }),
            None => Ok(()),
        }
    }

    /// Run the checks selected by `options`.
    ///
    /// Shape is always checked. Deep-check violations are returned, logged or
    /// ignored according to [`ValidationOptions::on_violation`].
    pub fn validate(&self, options: &ValidationOptions) -> Result<(), LayoutError> {
        self.check_shape()?;
        if options.on_violation == ViolationHandling::Ignore {
            return Ok(());
        }
        let checks: [(bool, fn(&Self) -> Result<(), LayoutError>); 3] = [
            (options.check_sorted, Self::check_sorted),
            (options.check_offsets, Self::check_offsets),
            (options.check_owners, Self::check_owners),
        ];
        for (enabled, check) in checks {
            if !enabled {
                continue;
            }
            if let Err(e) = check(self) {
                match options.on_violation {
                    ViolationHandling::Error => return Err(e),
                    ViolationHandling::Warn => {
                        log::warn!("rank {}: partition layout violation: {e}", self.local_rank);
                    }
                    ViolationHandling::Ignore => {}
                }
            }
        }
        Ok(())
    }
}

fn check_len(field: &'static str, expected: usize, found: usize) -> Result<(), LayoutError> {
    if expected == found {
        Ok(())
    } else {
        Err(LayoutError::LengthMismatch {
            field,
            expected,
            found,
        })
    }
}

/// Behavior for layout invariant violations found at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationHandling {
    /// Skip the deep checks.
    Ignore,
    /// Log a warning and accept the layout.
    Warn,
    /// Reject the layout.
    Error,
}

/// Construction-time validation toggles.
#[derive(Debug, Clone, Copy)]
pub struct ValidationOptions {
    /// Ensure every zone segment is strictly ascending.
    pub check_sorted: bool,
    /// Ensure `last_*` offsets agree with cumulative zone counts.
    pub check_offsets: bool,
    /// Ensure every owner lies in `[0, total_ranks)`.
    pub check_owners: bool,
    /// How to handle a violation.
    pub on_violation: ViolationHandling,
}

impl ValidationOptions {
    /// Enable all checks and reject violations.
    pub fn all() -> Self {
        Self {
            check_sorted: true,
            check_offsets: true,
            check_owners: true,
            on_violation: ViolationHandling::Error,
        }
    }

    /// Shape checks only.
    pub fn none() -> Self {
        Self {
            check_sorted: false,
            check_offsets: false,
            check_owners: false,
            on_violation: ViolationHandling::Ignore,
        }
    }
}

impl Default for ValidationOptions {
    /// Full validation in debug builds or with `check-invariants`/`strict-invariants`,
    /// shape checks only otherwise.
    fn default() -> Self {
        if cfg!(any(
            debug_assertions,
            feature = "check-invariants",
            feature = "strict-invariants"
        )) {
            Self::all()
        } else {
            Self::none()
        }
    }
}
