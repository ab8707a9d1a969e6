//! Ordered lookup over a sorted zone segment.
//!
//! Every zone segment of a [`PartitionIndex`](super::PartitionIndex) stores
//! global cell ids in strictly ascending order, so membership queries are a
//! plain bisection. The result is reported 1-based to match the local
//! numbering used throughout the crate.

/// Find `target` in the ascending slice `sorted`.
///
/// Returns the 1-based position of the exact match, or `None` when `target`
/// is absent. Runs in **O(log n)** and makes no assumption about sentinel
/// values. If `sorted` is not ascending the result is unspecified but the
/// call never panics.
///
/// # Example
/// ```rust
/// use mesh_partition_index::partition::ordered_lookup;
/// assert_eq!(ordered_lookup(&[2, 4, 8, 16], 8), Some(3));
/// assert_eq!(ordered_lookup(&[2, 4, 8, 16], 5), None);
/// ```
#[inline]
pub fn ordered_lookup(sorted: &[u64], target: u64) -> Option<usize> {
    let (first, last) = match (sorted.first(), sorted.last()) {
        (Some(&f), Some(&l)) => (f, l),
        _ => return None,
    };
    // cheap range rejection; most global ids are not in a given segment
    if target < first || target > last {
        return None;
    }
    sorted.binary_search(&target).ok().map(|pos| pos + 1)
}
