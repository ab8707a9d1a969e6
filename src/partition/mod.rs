//! Per-rank partition index: zone-ordered cell catalogue and local/global translation.

pub mod fixture;
pub mod index;
pub mod layout;
pub mod lookup;
pub mod shared;
pub mod zone;

pub use fixture::FixtureBuilder;
pub use index::PartitionIndex;
pub use layout::{PartitionLayout, ValidationOptions, ViolationHandling};
pub use lookup::ordered_lookup;
pub use shared::SharedPartitionIndex;
pub use zone::{Zone, ZoneIter};
