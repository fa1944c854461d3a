//! Strategy chain from logical record to physical location.
//!
//! # Mental model
//!
//! Each [`Provenance`] is one data source. [`MappingResolver::attempt`] walks them in
//! [`Provenance::CHAIN`] order and keeps the first that yields a [`Target`]:
//!
//! | # | Provenance | Source |
//! |---|---|---|
//! | 1 | `OriginPlacement` | record hint: durable authoring-time placement |
//! | 2 | `CurrentContainer` | selected live instance, when materialized |
//! | 3 | `PersistedContainer` | selected live instance, once host state is loaded |
//! | 4 | `AlternateContainer` | record hint: declared alternate start |
//! | 5 | `CurrentRegion` | selected live instance |
//! | 6 | `DeclaredRegion` | record hint |
//! | 7 | `ScheduleDerived` | record hint: most frequent schedule region |
//!
//! Records nothing resolves land in the unresolved set. A rescan retries strategies 2-4,
//! the ones that depend on host state becoming available later, and promotes whatever now
//! resolves. Remaining unresolved records are a normal terminal state.
//!
//! # Invariants
//!
//! - At most one [`MappingRecord`] per logical id per table.
//! - A logical id is either mapped or unresolved, never both.
//! - Provenance is diagnostic only; lookups never branch on it.

mod strategy;

use std::collections::{BTreeMap, BTreeSet};

use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::{debug, info};
use waymark_index::RecordId;

use crate::directory::ContainerDirectory;
use crate::ids::{ContainerId, EntryPointId, RegionId};
use crate::scorer::CandidateScorer;
use crate::world::{PlacementHints, PlacementSupplement, WorldView};


/// Which strategy produced a mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provenance {
	OriginPlacement,
	CurrentContainer,
	PersistedContainer,
	AlternateContainer,
	CurrentRegion,
	DeclaredRegion,
	ScheduleDerived,
}

impl Provenance {
	/// Full build-time chain, most authoritative first.
	pub const CHAIN: [Provenance; 7] = [
		Provenance::OriginPlacement,
		Provenance::CurrentContainer,
		Provenance::PersistedContainer,
		Provenance::AlternateContainer,
		Provenance::CurrentRegion,
		Provenance::DeclaredRegion,
		Provenance::ScheduleDerived,
	];

	/// Strategies that only become available once host state is loaded.
	pub const RESCAN: [Provenance; 3] = [
		Provenance::CurrentContainer,
		Provenance::PersistedContainer,
		Provenance::AlternateContainer,
	];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Target {
	Container(ContainerId),
	Region(RegionId),
}

impl Target {
	pub fn container(self) -> Option<ContainerId> {
		match self {
			Target::Container(id) => Some(id),
			Target::Region(_) => None,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingRecord {
	pub logical_id: RecordId,
	pub target: Target,
	pub display_name: String,
	pub provenance: Provenance,
	/// Reverse-index entry point captured at mapping time.
	pub entry_point: Option<EntryPointId>,
}

/// Answer to "where is it" for a mapped record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhysicalRef {
	pub logical_id: RecordId,
	pub target: Target,
	pub display_name: String,
	pub entry_point: Option<EntryPointId>,
	pub provenance: Provenance,
}

/// A record to map, with whatever placement hints it carries.
#[derive(Debug, Clone, Copy)]
pub struct Subject<'r> {
	pub logical_id: RecordId,
	pub hints: Option<&'r PlacementHints>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RescanReport {
	pub attempted: usize,
	pub promoted: usize,
	pub remaining: usize,
}

/// Mappings and the unresolved set for one generation.
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
	records: FxHashMap<RecordId, MappingRecord>,
	unresolved: BTreeSet<RecordId>,
}

impl MappingTable {
	pub fn get(&self, logical: RecordId) -> Option<&MappingRecord> {
		self.records.get(&logical)
	}

	pub fn is_unresolved(&self, logical: RecordId) -> bool {
		self.unresolved.contains(&logical)
	}

	/// Unresolved ids in ascending order.
	pub fn unresolved(&self) -> impl Iterator<Item = RecordId> + '_ {
		self.unresolved.iter().copied()
	}

	pub fn records(&self) -> impl Iterator<Item = &MappingRecord> {
		self.records.values()
	}

	pub fn mapped_len(&self) -> usize {
		self.records.len()
	}

	pub fn unresolved_len(&self) -> usize {
		self.unresolved.len()
	}

	/// Mapped records per strategy.
	pub fn provenance_counts(&self) -> BTreeMap<Provenance, usize> {
		let mut counts = BTreeMap::new();
		for record in self.records.values() {
			*counts.entry(record.provenance).or_insert(0) += 1;
		}
		counts
	}

	fn insert(&mut self, record: MappingRecord) {
		self.unresolved.remove(&record.logical_id);
		self.records.insert(record.logical_id, record);
	}
}

/// Borrowed view over everything the strategy chain consults.
///
/// Cheap to construct; build one per build, rescan or lookup.
pub struct MappingResolver<'a> {
	world: &'a dyn WorldView,
	directory: &'a ContainerDirectory,
	scorer: &'a CandidateScorer,
	supplement: Option<&'a dyn PlacementSupplement>,
}

impl<'a> MappingResolver<'a> {
	pub fn new(
		world: &'a dyn WorldView,
		directory: &'a ContainerDirectory,
		scorer: &'a CandidateScorer,
	) -> Self {
		Self {
			world,
			directory,
			scorer,
			supplement: None,
		}
	}

	pub fn with_supplement(mut self, supplement: Option<&'a dyn PlacementSupplement>) -> Self {
		self.supplement = supplement;
		self
	}

	/// Maps every subject with the full chain.
	pub fn build<'r, I>(&self, subjects: I) -> MappingTable
	where
		I: IntoIterator<Item = Subject<'r>>,
	{
		let mut table = MappingTable::default();
		for subject in subjects {
			let id = subject.logical_id;
			if table.records.contains_key(&id) || table.unresolved.contains(&id) {
				continue;
			}
			match self.attempt(&subject, &Provenance::CHAIN) {
				Some(record) => table.insert(record),
				None => {
					debug!(logical = %id, "no placement source; deferring to rescan");
					table.unresolved.insert(id);
				}
			}
		}
		info!(
			mapped = table.mapped_len(),
			unresolved = table.unresolved_len(),
			"mapping table built"
		);
		table
	}

	/// Retries the late-binding strategies for every unresolved record.
	///
	/// `lookup` supplies the subject for an id; ids it no longer knows stay unresolved.
	pub fn rescan<'r, F>(&self, previous: &MappingTable, lookup: F) -> (MappingTable, RescanReport)
	where
		F: Fn(RecordId) -> Option<Subject<'r>>,
	{
		let mut table = previous.clone();
		let mut report = RescanReport::default();
		for id in previous.unresolved() {
			report.attempted += 1;
			let Some(subject) = lookup(id) else {
				continue;
			};
			if let Some(record) = self.attempt(&subject, &Provenance::RESCAN) {
				debug!(logical = %id, provenance = ?record.provenance, "rescan promoted record");
				table.insert(record);
				report.promoted += 1;
			}
		}
		report.remaining = table.unresolved_len();
		info!(
			attempted = report.attempted,
			promoted = report.promoted,
			remaining = report.remaining,
			"mapping rescan finished"
		);
		(table, report)
	}

	/// Walks `chain` in order and maps `subject` with the first strategy that succeeds.
	pub fn attempt(&self, subject: &Subject<'_>, chain: &[Provenance]) -> Option<MappingRecord> {
		let supplemented;
		let hints = match subject.hints {
			Some(hints) => Some(hints),
			None => {
				supplemented = self.supplement.and_then(|s| s.hints(subject.logical_id));
				supplemented.as_ref()
			}
		};

		let mut live = strategy::LiveLookup::default();
		chain.iter().find_map(|&provenance| {
			let target = self.run(provenance, subject.logical_id, hints, &mut live)?;
			Some(self.record(subject.logical_id, target, provenance))
		})
	}

	/// Resolves a mapped record to a [`PhysicalRef`], filling the entry point from the
	/// world when the reverse index missed at mapping time.
	pub fn locate(&self, table: &MappingTable, logical: RecordId) -> Option<PhysicalRef> {
		let record = table.get(logical)?;
		let entry_point = record.entry_point.or_else(|| {
			record
				.target
				.container()
				.and_then(|c| self.directory.entry_point_for(c, self.world))
		});
		Some(PhysicalRef {
			logical_id: record.logical_id,
			target: record.target,
			display_name: record.display_name.clone(),
			entry_point,
			provenance: record.provenance,
		})
	}

	fn record(&self, logical: RecordId, target: Target, provenance: Provenance) -> MappingRecord {
		let (display_name, entry_point) = match target {
			Target::Container(id) => (
				self.directory
					.display_name(id)
					.map_or_else(|| id.to_string(), str::to_owned),
				self.directory.indexed_entry_point(id),
			),
			Target::Region(id) => (
				self.directory
					.region_name(id)
					.map_or_else(|| id.to_string(), str::to_owned),
				None,
			),
		};
		MappingRecord {
			logical_id: logical,
			target,
			display_name,
			provenance,
			entry_point,
		}
	}
}
