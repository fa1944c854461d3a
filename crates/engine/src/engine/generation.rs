use std::sync::Arc;

use rustc_hash::FxHashMap;
use waymark_index::{CatalogRecord, NameIndex, RecordId};
use waymark_locate::{
	CandidateScorer, ContainerDirectory, MappingResolver, MappingTable, Placed,
	PlacementSupplement, Subject, WorldView,
};

/// One consistent view of a catalog: names, containers and mappings built together.
///
/// Published whole behind the engine's lock and never mutated afterwards. Pin one with
/// [`super::Engine::generation`] to answer several questions against the same data.
pub struct Generation<T> {
	pub(crate) number: u64,
	pub(crate) names: Arc<NameIndex<T>>,
	pub(crate) directory: ContainerDirectory,
	pub(crate) mapping: MappingTable,
	/// First slot of each physical record, for rescan subject lookup.
	physical: Arc<FxHashMap<RecordId, usize>>,
}

impl<T> Generation<T> {
	pub(crate) fn empty(label: &'static str, number: u64) -> Self {
		Self {
			number,
			names: Arc::new(NameIndex::empty(label)),
			directory: ContainerDirectory::default(),
			mapping: MappingTable::default(),
			physical: Arc::default(),
		}
	}

	/// Monotonic publish counter. Zero is the empty generation an engine starts with.
	#[inline]
	pub fn number(&self) -> u64 {
		self.number
	}

	#[inline]
	pub fn names(&self) -> &Arc<NameIndex<T>> {
		&self.names
	}

	#[inline]
	pub fn directory(&self) -> &ContainerDirectory {
		&self.directory
	}

	#[inline]
	pub fn mapping(&self) -> &MappingTable {
		&self.mapping
	}
}

impl<T: CatalogRecord + Placed> Generation<T> {
	/// Builds the directory and mapping table for `names`.
	pub(crate) fn assemble(
		number: u64,
		names: Arc<NameIndex<T>>,
		world: &dyn WorldView,
		supplement: Option<&dyn PlacementSupplement>,
		scorer: &CandidateScorer,
	) -> Self {
		let directory = ContainerDirectory::from_world(world);
		let mut physical = FxHashMap::default();
		for (slot, entry) in names.entries().iter().enumerate() {
			if entry.record.is_physical() {
				physical.entry(entry.identifier).or_insert(slot);
			}
		}

		let subjects = names
			.entries()
			.iter()
			.filter(|e| e.record.is_physical())
			.map(|e| Subject {
				logical_id: e.identifier,
				hints: e.record.placement(),
			});
		let mapping = MappingResolver::new(world, &directory, scorer)
			.with_supplement(supplement)
			.build(subjects);

		Self {
			number,
			names,
			directory,
			mapping,
			physical: Arc::new(physical),
		}
	}

	/// Same names with a refreshed directory and mapping table.
	pub(crate) fn successor(
		&self,
		number: u64,
		directory: ContainerDirectory,
		mapping: MappingTable,
	) -> Self {
		Self {
			number,
			names: self.names.clone(),
			directory,
			mapping,
			physical: self.physical.clone(),
		}
	}

	pub(crate) fn subject(&self, logical: RecordId) -> Option<Subject<'_>> {
		let slot = *self.physical.get(&logical)?;
		let entry = self.names.entry(slot)?;
		Some(Subject {
			logical_id: logical,
			hints: entry.record.placement(),
		})
	}
}

impl<T> std::fmt::Debug for Generation<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Generation")
			.field("number", &self.number)
			.field("names", &self.names)
			.field("containers", &self.directory.len())
			.field("mapped", &self.mapping.mapped_len())
			.field("unresolved", &self.mapping.unresolved_len())
			.finish()
	}
}
