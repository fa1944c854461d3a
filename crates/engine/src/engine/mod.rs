//! Composition root for one catalog.
//!
//! # Mental model
//!
//! The engine keeps three independently locked pieces of state:
//!
//! | State | Lock | Replaced by |
//! |---|---|---|
//! | [`Generation`] (names, containers, mappings) | `RwLock<Arc<_>>` | [`Engine::build`], [`Engine::rescan`] |
//! | known-good instance cache | scorer mutex | cleared per build |
//! | position cache | cache mutex | [`Engine::on_observed`], cleared by shutdown |
//!
//! Builds and rescans compute the next generation without the write lock and only take
//! it to swap the `Arc`. Readers clone the `Arc` under the read lock and release it at
//! once, so a query never observes a half-built generation and never blocks a build for
//! longer than the swap.
//!
//! Rescans hold an upgradable read for their whole computation so two rescans never
//! interleave, while ordinary readers keep going.

mod generation;

use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;

pub use generation::Generation;
use parking_lot::{Mutex, RwLock, RwLockUpgradableReadGuard};
use serde::Serialize;
use tracing::{debug, info, warn};
use waymark_index::{
	BuildStats, CatalogRecord, Category, EntryRef, FuzzyResolver, Match, NameIndex, RecordId,
};
use waymark_locate::{
	Access, CandidateScorer, ContainerDirectory, ContainerId, InstanceId, MappingResolver,
	NoWorld, PhysicalRef, Placed, PlacementSupplement, Position, PositionCache, PositionSnapshot,
	RegionId, RescanReport, ScoreContext, Selection, WorldView,
};

use crate::config::EngineConfig;
use crate::diagnostics::Diagnostics;
use crate::events::{ContainerChanged, EventHub, Observed};


/// Summary of one published generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
	pub generation: u64,
	pub stats: BuildStats,
	pub containers: usize,
	pub mapped: usize,
	pub unresolved: usize,
}

impl BuildReport {
	fn of<T>(generation: &Generation<T>) -> Self {
		Self {
			generation: generation.number,
			stats: generation.names.stats(),
			containers: generation.directory.len(),
			mapped: generation.mapping.mapped_len(),
			unresolved: generation.mapping.unresolved_len(),
		}
	}
}

/// Best available answer to "where is it right now".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Whereabouts {
	/// A live instance is materialized and was just observed.
	Live {
		instance: InstanceId,
		position: Position,
		container: Option<ContainerId>,
		region: Option<RegionId>,
	},
	/// Not observable now; this is where it was last seen.
	LastKnown(PositionSnapshot),
	/// Never observed; the mapping table's answer.
	Mapped(PhysicalRef),
	Unknown,
}

/// Configures and creates an [`Engine`].
pub struct EngineBuilder<T> {
	label: &'static str,
	config: EngineConfig,
	world: Arc<dyn WorldView>,
	supplement: Option<Arc<dyn PlacementSupplement>>,
	_record: PhantomData<fn() -> T>,
}

impl<T: CatalogRecord + Placed> EngineBuilder<T> {
	pub fn config(mut self, config: EngineConfig) -> Self {
		self.config = config;
		self
	}

	/// Host world to resolve locations against. Defaults to [`NoWorld`].
	pub fn world(mut self, world: Arc<dyn WorldView>) -> Self {
		self.world = world;
		self
	}

	/// Companion source of placement hints, when the host has one.
	pub fn supplement(mut self, supplement: Arc<dyn PlacementSupplement>) -> Self {
		self.supplement = Some(supplement);
		self
	}

	/// Creates the engine with an empty generation. Call [`Engine::build`] next.
	pub fn finish(self) -> Engine<T> {
		debug!(
			catalog = self.label,
			supplement = self.supplement.is_some(),
			"engine created"
		);
		Engine {
			label: self.label,
			resolver: FuzzyResolver::new(self.config.fuzzy),
			config: self.config,
			world: self.world,
			supplement: self.supplement,
			current: RwLock::new(Arc::new(Generation::empty(self.label, 0))),
			scorer: CandidateScorer::new(),
			positions: PositionCache::new(),
			last_refresh: Mutex::new(None),
			published: AtomicU64::new(0),
			closed: AtomicBool::new(false),
		}
	}
}

/// Name resolution and location mapping for one catalog of `T` records.
pub struct Engine<T> {
	label: &'static str,
	config: EngineConfig,
	resolver: FuzzyResolver,
	world: Arc<dyn WorldView>,
	supplement: Option<Arc<dyn PlacementSupplement>>,
	current: RwLock<Arc<Generation<T>>>,
	scorer: CandidateScorer,
	positions: PositionCache,
	last_refresh: Mutex<Option<Instant>>,
	published: AtomicU64,
	closed: AtomicBool,
}

impl<T: CatalogRecord + Placed> Engine<T> {
	pub fn builder(label: &'static str) -> EngineBuilder<T> {
		EngineBuilder {
			label,
			config: EngineConfig::default(),
			world: Arc::new(NoWorld),
			supplement: None,
			_record: PhantomData,
		}
	}

	#[inline]
	pub fn label(&self) -> &'static str {
		self.label
	}

	#[inline]
	pub fn config(&self) -> &EngineConfig {
		&self.config
	}

	/// Builds and publishes a new generation from `records`.
	pub fn build<I>(&self, records: I) -> BuildReport
	where
		I: IntoIterator<Item = T>,
	{
		self.build_with_aliases(records, std::iter::empty())
	}

	/// [`Self::build`] with an extra `alias -> canonical name` table.
	///
	/// A shutdown that lands while the build runs wins: the result is discarded and the
	/// report describes the generation still being served.
	pub fn build_with_aliases<I, A>(&self, records: I, aliases: A) -> BuildReport
	where
		I: IntoIterator<Item = T>,
		A: IntoIterator<Item = (String, String)>,
	{
		if self.is_shut_down() {
			warn!(catalog = self.label, "build after shutdown ignored");
			return BuildReport::of(&*self.generation());
		}

		let names = Arc::new(NameIndex::build_with_aliases(
			self.label,
			records,
			aliases,
			&self.config.index,
		));
		if names.is_empty() {
			warn!(
				catalog = self.label,
				"catalog source produced no records; serving an empty generation"
			);
		}

		let mut generation = Generation::assemble(
			0,
			names,
			&*self.world,
			self.supplement.as_deref(),
			&self.scorer,
		);
		if generation.directory.is_empty() && generation.mapping.unresolved_len() > 0 {
			warn!(
				catalog = self.label,
				"world reports no containers; physical records stay unresolved until a rescan"
			);
		}

		let mut current = self.current.write();
		if self.is_shut_down() {
			warn!(catalog = self.label, "engine shut down during build; result discarded");
			return BuildReport::of(&**current);
		}
		generation.number = self.published.fetch_add(1, Ordering::AcqRel) + 1;
		let report = BuildReport::of(&generation);
		self.scorer.clear();
		*current = Arc::new(generation);
		drop(current);

		*self.last_refresh.lock() = Some(Instant::now());
		info!(
			catalog = self.label,
			generation = report.generation,
			indexed = report.stats.indexed,
			conflicts = report.stats.conflicts,
			mapped = report.mapped,
			unresolved = report.unresolved,
			"generation published"
		);
		report
	}

	/// Retries unresolved mappings against the world's current state.
	///
	/// Publishes a successor generation only when something was promoted.
	pub fn rescan(&self) -> RescanReport {
		if self.is_shut_down() {
			return RescanReport::default();
		}

		let current = self.current.upgradable_read();
		if current.mapping.unresolved_len() == 0 {
			drop(current);
			*self.last_refresh.lock() = Some(Instant::now());
			return RescanReport::default();
		}

		let directory = ContainerDirectory::from_world(&*self.world);
		let (mapping, report) = {
			let generation = &**current;
			self.mapping_resolver(&directory)
				.rescan(&generation.mapping, |id| generation.subject(id))
		};

		if report.promoted > 0 {
			let number = self.published.fetch_add(1, Ordering::AcqRel) + 1;
			let next = current.successor(number, directory, mapping);
			let mut current = RwLockUpgradableReadGuard::upgrade(current);
			*current = Arc::new(next);
			debug!(catalog = self.label, generation = number, "rescan published");
		} else {
			drop(current);
		}
		*self.last_refresh.lock() = Some(Instant::now());
		report
	}

	/// Whether the periodic rescan interval has elapsed with mappings still unresolved.
	pub fn rescan_due(&self, now: Instant) -> bool {
		let Some(interval) = self.config.rescan.interval() else {
			return false;
		};
		if self.is_shut_down() || self.current.read().mapping.unresolved_len() == 0 {
			return false;
		}
		self.last_refresh
			.lock()
			.is_none_or(|last| now.saturating_duration_since(last) >= interval)
	}

	/// Host hook for "saved state restored". Rescans when configured to.
	pub fn notify_state_loaded(&self) -> Option<RescanReport> {
		self.config.rescan.on_state_loaded.then(|| self.rescan())
	}

	/// The generation currently published. Holding it pins that view.
	pub fn generation(&self) -> Arc<Generation<T>> {
		self.current.read().clone()
	}

	/// Resolves free text to a catalog entry with the fuzzy cascade.
	pub fn resolve(&self, query: &str, filter: Option<Category>) -> Option<EntryRef<T>> {
		let names = self.generation().names.clone();
		let matched = self.resolver.resolve(&names, query, filter)?;
		EntryRef::new(names, matched)
	}

	/// Ranked candidates for a query, best first.
	pub fn suggest(&self, query: &str, filter: Option<Category>, limit: usize) -> Vec<EntryRef<T>> {
		let names = self.generation().names.clone();
		self.resolver
			.suggest(&names, query, filter, limit)
			.into_iter()
			.filter_map(|s| {
				let matched = Match {
					slot: s.slot,
					stage: s.stage,
					score: s.score,
				};
				EntryRef::new(names.clone(), matched)
			})
			.collect()
	}

	pub fn resolve_location(&self, logical: RecordId) -> Option<PhysicalRef> {
		self.resolve_location_with(logical, Access::Acquire)
	}

	/// [`Self::resolve_location`] for callers that already pinned a generation.
	pub fn resolve_location_with(
		&self,
		logical: RecordId,
		access: Access<'_, Generation<T>>,
	) -> Option<PhysicalRef> {
		access.with(&self.current, |generation| {
			self.mapping_resolver(&generation.directory)
				.locate(&generation.mapping, logical)
		})
	}

	/// Container name, qualified when it collides with another container's name.
	pub fn disambiguated_name(&self, container: ContainerId) -> Option<String> {
		self.current
			.read()
			.directory
			.display_name(container)
			.map(str::to_owned)
	}

	/// Container for a bare or qualified display name.
	pub fn lookup_container(&self, name: &str) -> Option<ContainerId> {
		self.current.read().directory.lookup_name(name)
	}

	pub fn last_known_position(&self, logical: RecordId) -> Option<PositionSnapshot> {
		self.positions.last_known(logical)
	}

	/// Picks the live instance that best realizes `logical`.
	pub fn select_instance(&self, logical: RecordId) -> Option<Selection> {
		self.select_instance_with(logical, Access::Acquire)
	}

	pub fn select_instance_with(
		&self,
		logical: RecordId,
		access: Access<'_, Generation<T>>,
	) -> Option<Selection> {
		if self.is_shut_down() {
			return None;
		}
		let candidates = self.world.instances(logical);
		if candidates.is_empty() {
			return None;
		}
		access.with(&self.current, |generation| {
			let ctx = ScoreContext {
				expected_container: generation
					.mapping
					.get(logical)
					.and_then(|r| r.target.container()),
				directory: &generation.directory,
			};
			self.scorer.select(logical, &candidates, &ctx)
		})
	}

	/// Live observation first, then the last snapshot, then the mapping.
	///
	/// A live answer also refreshes the position cache.
	pub fn whereabouts(&self, logical: RecordId) -> Whereabouts {
		let generation = self.generation();
		if let Some(selection) = self.select_instance_with(logical, Access::Held(&*generation))
			&& selection.instance.active
			&& !selection.instance.position.is_origin()
		{
			let instance = selection.instance;
			self.positions.observe(
				logical,
				instance.position,
				instance.container,
				instance.current_region,
				self.world.now(),
			);
			return Whereabouts::Live {
				instance: instance.id,
				position: instance.position,
				container: instance.container,
				region: instance.current_region,
			};
		}
		if let Some(snapshot) = self.positions.last_known(logical) {
			return Whereabouts::LastKnown(snapshot);
		}
		match self.resolve_location_with(logical, Access::Held(&*generation)) {
			Some(found) => Whereabouts::Mapped(found),
			None => Whereabouts::Unknown,
		}
	}

	/// Records a live observation. Returns true when the stored snapshot changed.
	pub fn on_observed(&self, event: &Observed) -> bool {
		!self.is_shut_down()
			&& self.positions.observe(
				event.logical_id,
				event.position,
				event.container,
				event.region,
				event.timestamp,
			)
	}

	pub fn on_container_changed(&self, event: &ContainerChanged) -> bool {
		!self.is_shut_down()
			&& self
				.positions
				.note_container_change(event.logical_id, event.container, event.timestamp)
	}

	/// The host reports every instance of `logical` gone.
	pub fn on_removed(&self, logical: RecordId) {
		self.positions.invalidate(logical);
		self.scorer.forget(logical);
	}

	/// Routes `hub` events into this engine for as long as it is alive.
	pub fn connect(self: &Arc<Self>, hub: &EventHub) {
		let engine = Arc::downgrade(self);
		hub.observed.subscribe(move |event| {
			if let Some(engine) = engine.upgrade() {
				engine.on_observed(event);
			}
		});
		let engine = Arc::downgrade(self);
		hub.container_changed.subscribe(move |event| {
			if let Some(engine) = engine.upgrade() {
				engine.on_container_changed(event);
			}
		});
	}

	pub fn diagnostics(&self) -> Diagnostics {
		Diagnostics::collect(
			self.label,
			&*self.generation(),
			&self.scorer,
			&self.positions,
			self.is_shut_down(),
		)
	}

	/// Publishes an empty generation and drops every cache. Later queries answer empty.
	pub fn shutdown(&self) {
		if self.closed.swap(true, Ordering::AcqRel) {
			return;
		}
		let mut current = self.current.write();
		let number = self.published.fetch_add(1, Ordering::AcqRel) + 1;
		*current = Arc::new(Generation::empty(self.label, number));
		self.scorer.clear();
		drop(current);
		self.positions.clear();
		*self.last_refresh.lock() = None;
		info!(catalog = self.label, "engine shut down");
	}

	pub fn is_shut_down(&self) -> bool {
		self.closed.load(Ordering::Acquire)
	}

	fn mapping_resolver<'a>(&'a self, directory: &'a ContainerDirectory) -> MappingResolver<'a> {
		MappingResolver::new(&*self.world, directory, &self.scorer)
			.with_supplement(self.supplement.as_deref())
	}
}

impl<T> std::fmt::Debug for Engine<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Engine")
			.field("label", &self.label)
			.field("generation", &*self.current.read())
			.field("positions", &self.positions.len())
			.field("closed", &self.closed.load(Ordering::Relaxed))
			.finish()
	}
}
