//! Single-writer, multiple-reader access to a [`PartitionIndex`].
//!
//! Queries on a partition index are read-only and may run concurrently from
//! any number of threads. Copying into an index or rebuilding it must not
//! overlap with readers. [`SharedPartitionIndex`] makes that discipline
//! explicit with a `parking_lot::RwLock`: readers hold a shared guard for the
//! duration of their queries, while [`copy_from`](SharedPartitionIndex::copy_from)
//! and [`rebuild`](SharedPartitionIndex::rebuild) take the exclusive one.

use parking_lot::{RwLock, RwLockReadGuard};
use static_assertions::assert_impl_all;

use super::index::PartitionIndex;
use super::layout::{PartitionLayout, ValidationOptions};
use crate::index_error::PartitionIndexError;

assert_impl_all!(PartitionIndex: Send, Sync);
assert_impl_all!(SharedPartitionIndex: Send, Sync);

/// A [`PartitionIndex`] behind an exclusive-write guard.
#[derive(Debug)]
pub struct SharedPartitionIndex {
    inner: RwLock<PartitionIndex>,
}

impl SharedPartitionIndex {
    pub fn new(index: PartitionIndex) -> Self {
        Self {
            inner: RwLock::new(index),
        }
    }

    /// Shared access for queries. Blocks while a copy or rebuild is in flight.
    pub fn read(&self) -> RwLockReadGuard<'_, PartitionIndex> {
        self.inner.read()
    }

    /// Independent copy of the current value.
    pub fn snapshot(&self) -> PartitionIndex {
        self.inner.read().clone()
    }

    /// Deep-copy `source` into the guarded index.
    pub fn copy_from(&self, source: &PartitionIndex) {
        self.inner.write().copy_from(source);
    }

    /// Replace the guarded index with one built from `layout`.
    ///
    /// The new index is constructed before the write lock is taken; on error
    /// the current value is left untouched.
    pub fn rebuild(
        &self,
        layout: PartitionLayout,
        options: ValidationOptions,
    ) -> Result<(), PartitionIndexError> {
        let fresh = PartitionIndex::with_options(layout, options)?;
        let rank = fresh.local_rank();
        *self.inner.write() = fresh;
        log::debug!("rank {rank}: partition index rebuilt");
        Ok(())
    }

    pub fn into_inner(self) -> PartitionIndex {
        self.inner.into_inner()
    }
}

impl From<PartitionIndex> for SharedPartitionIndex {
    fn from(index: PartitionIndex) -> Self {
        Self::new(index)
    }
}
