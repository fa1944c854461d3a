//! Named-entity resolution and spatial mapping for one catalog.
//!
//! An [`Engine`] owns one catalog's current [`Generation`] (name index, container
//! directory, mapping table) behind a reader/writer lock, plus a separately locked
//! position cache and known-good instance cache. The host composes it once and passes it
//! to every consumer; there is no global state.
//!
//! Lifecycle: [`Engine::build`] → queries → [`Engine::rescan`] as host state becomes
//! available → [`Engine::shutdown`].

/// Engine tunables and TOML loading.
pub mod config;
/// Read-only operational counters.
pub mod diagnostics;
mod engine;
/// Per-kind notification dispatchers.
pub mod events;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use config::{ConfigError, EngineConfig, RescanConfig};
pub use diagnostics::Diagnostics;
pub use engine::{BuildReport, Engine, EngineBuilder, Generation, Whereabouts};
pub use events::{ContainerChanged, Dispatcher, EventHub, Observed};
pub use waymark_index::{
	CatalogRecord, Category, ConflictKind, DuplicatePolicy, EntryRef, FuzzyConfig, IndexConfig,
	MatchStage, NameConflict, RecordId,
};
pub use waymark_locate::{
	Access, ContainerId, ContainerInfo, EntryPoint, EntryPointId, InstanceId, InstanceInfo, NoWorld,
	PhysicalRef, Placed, PlacementHints, PlacementSupplement, Position, PositionSnapshot,
	Provenance, RegionId, RegionInfo, RescanReport, Selection, Target, Timestamp, WorldView,
};
