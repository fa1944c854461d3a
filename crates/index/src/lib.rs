//! Name indices and fuzzy resolution for static catalogs.
//!
//! Every catalog (characters, places, items, recipes) shares the same machinery: a
//! [`NameIndex`] built once per generation from [`CatalogRecord`]s, and a stateless
//! [`FuzzyResolver`] that runs the staged match cascade against it.

/// Staged fuzzy matching over a [`NameIndex`].
pub mod fuzzy;
/// Exact, prefix and alias lookup tables.
pub mod index;
/// Name normalization shared by index build and queries.
pub mod normalize;
/// Catalog record contract and identifier types.
pub mod record;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use fuzzy::{FuzzyConfig, FuzzyResolver, Match, MatchStage, Suggestion};
pub use index::{
	BuildStats, ConflictKind, DuplicatePolicy, Entry, EntryRef, IndexConfig, NameConflict, NameIndex,
};
pub use normalize::{normalize, prefix_key};
pub use record::{CatalogRecord, Category, RecordId};
