//! Exact, prefix and alias tables over one generation of catalog records.
//!
//! # Mental model
//!
//! A [`NameIndex`] is immutable once built. Rebuilding produces a new value; owners publish
//! it by swapping an `Arc`, so a reader holding an [`EntryRef`] keeps its whole generation
//! alive and never sees a half-built table.
//!
//! # Invariants
//!
//! - Every slot stored in `by_name`, `by_prefix` or reachable through `aliases` is a valid
//!   offset into `entries` of the same generation.
//! - `Entry::normalized` is derived from `Entry::raw_name` by [`normalize`] and never changes.
//! - Primary-name conflicts are settled by [`DuplicatePolicy`]; losers stay in `entries`.

mod build;
mod collision;

use std::ops::Deref;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

pub use collision::{ConflictKind, DuplicatePolicy, NameConflict};

use crate::fuzzy::Match;
use crate::normalize::normalize;
use crate::record::{Category, RecordId};


/// One indexed record plus its normalized name.
#[derive(Debug, Clone)]
pub struct Entry<T> {
	pub raw_name: Box<str>,
	pub normalized: Box<str>,
	pub identifier: RecordId,
	pub category: Category,
	pub primary: bool,
	pub record: T,
}

/// Index build tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct IndexConfig {
	/// Names shorter than this (in characters, after normalization) are skipped.
	pub min_name_len: usize,
	pub duplicate_policy: DuplicatePolicy,
}

impl Default for IndexConfig {
	fn default() -> Self {
		Self {
			min_name_len: 2,
			duplicate_policy: DuplicatePolicy::default(),
		}
	}
}

/// Counters collected while building a generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
	pub indexed: usize,
	/// Empty or too-short names.
	pub skipped: usize,
	/// Non-primary records whose name was already bound.
	pub shadowed: usize,
	pub conflicts: usize,
	pub aliases: usize,
}

pub(crate) type Bucket = SmallVec<[usize; 4]>;

/// Name lookup tables for one catalog generation.
pub struct NameIndex<T> {
	label: &'static str,
	entries: Vec<Entry<T>>,
	by_name: FxHashMap<Box<str>, usize>,
	by_prefix: FxHashMap<Box<str>, Bucket>,
	aliases: FxHashMap<Box<str>, Box<str>>,
	conflicts: Vec<NameConflict>,
	stats: BuildStats,
}

impl<T> NameIndex<T> {
	/// An index with no entries. Every lookup misses.
	pub fn empty(label: &'static str) -> Self {
		Self {
			label,
			entries: Vec::new(),
			by_name: FxHashMap::default(),
			by_prefix: FxHashMap::default(),
			aliases: FxHashMap::default(),
			conflicts: Vec::new(),
			stats: BuildStats::default(),
		}
	}

	#[inline]
	pub fn label(&self) -> &'static str {
		self.label
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	#[inline]
	pub fn entry(&self, slot: usize) -> Option<&Entry<T>> {
		self.entries.get(slot)
	}

	/// All entries in insertion order, including duplicate-policy losers.
	#[inline]
	pub fn entries(&self) -> &[Entry<T>] {
		&self.entries
	}

	/// Exact-map lookup of an already normalized name. Aliases are not consulted.
	#[inline]
	pub fn lookup_normalized(&self, normalized: &str) -> Option<usize> {
		self.by_name.get(normalized).copied()
	}

	/// Exact lookup by raw name.
	pub fn lookup(&self, name: &str) -> Option<usize> {
		self.lookup_normalized(&normalize(name))
	}

	/// Resolves a normalized alias to the slot bound to its canonical name.
	pub fn lookup_alias(&self, normalized: &str) -> Option<usize> {
		let canonical = self.aliases.get(normalized)?;
		self.lookup_normalized(canonical)
	}

	/// Slots whose normalized name begins with the given bucket key.
	///
	/// `key` must already be a [`crate::prefix_key`] of a normalized string.
	#[inline]
	pub fn prefix_candidates(&self, key: &str) -> &[usize] {
		self.by_prefix.get(key).map_or(&[], |b| b.as_slice())
	}

	/// Identifier bound to a normalized name, if any.
	pub fn identifier_of(&self, normalized: &str) -> Option<RecordId> {
		self.lookup_normalized(normalized)
			.map(|slot| self.entries[slot].identifier)
	}

	#[inline]
	pub fn conflicts(&self) -> &[NameConflict] {
		&self.conflicts
	}

	#[inline]
	pub fn stats(&self) -> BuildStats {
		self.stats
	}

	/// Finds the first entry carrying `id`, scanning in insertion order.
	pub fn find_by_id(&self, id: RecordId) -> Option<usize> {
		self.entries.iter().position(|e| e.identifier == id)
	}
}

impl<T> std::fmt::Debug for NameIndex<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("NameIndex")
			.field("label", &self.label)
			.field("entries", &self.entries.len())
			.field("names", &self.by_name.len())
			.field("aliases", &self.aliases.len())
			.field("conflicts", &self.conflicts.len())
			.finish()
	}
}

/// A resolved entry pinned to the generation it came from.
///
/// Holding an `EntryRef` keeps that generation alive across rebuilds.
pub struct EntryRef<T> {
	index: Arc<NameIndex<T>>,
	matched: Match,
}

impl<T> EntryRef<T> {
	/// Pins `matched` to `index`. Returns `None` when the slot is out of range.
	pub fn new(index: Arc<NameIndex<T>>, matched: Match) -> Option<Self> {
		index.entry(matched.slot)?;
		Some(Self { index, matched })
	}

	#[inline]
	pub fn matched(&self) -> Match {
		self.matched
	}

	/// The generation this entry belongs to.
	#[inline]
	pub fn index(&self) -> &Arc<NameIndex<T>> {
		&self.index
	}
}

impl<T> Clone for EntryRef<T> {
	fn clone(&self) -> Self {
		Self {
			index: self.index.clone(),
			matched: self.matched,
		}
	}
}

impl<T> Deref for EntryRef<T> {
	type Target = Entry<T>;

	fn deref(&self) -> &Entry<T> {
		&self.index.entries[self.matched.slot]
	}
}

impl<T> std::fmt::Debug for EntryRef<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EntryRef")
			.field("name", &self.raw_name)
			.field("identifier", &self.identifier)
			.field("stage", &self.matched.stage)
			.finish()
	}
}
