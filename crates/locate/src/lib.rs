//! Where-is-it resolution for physical catalog records.
//!
//! A logical record (one catalog identifier) may be realized by zero or more live
//! instances in the host world. This crate answers "where is it" three ways:
//!
//! - [`MappingTable`]: a per-generation mapping built by the [`MappingResolver`] strategy
//!   chain, with an unresolved set that later rescans may shrink.
//! - [`CandidateScorer`]: picks one live instance when several could realize a record.
//! - [`PositionCache`]: the last observed physical state of records that cannot be
//!   observed right now.
//!
//! The host world is reached only through the narrow [`WorldView`] capability.

/// Explicit lock parameter for reentrant callers.
pub mod access;
/// Container names, disambiguation and the entry-point reverse index.
pub mod directory;
/// Identifier newtypes, positions and timestamps.
pub mod ids;
/// Strategy chain from logical record to physical location.
pub mod mapping;
/// Last-known physical state keyed by logical id.
pub mod position;
/// Scoring of competing live instances.
pub mod scorer;
/// Host capabilities consumed by this crate.
pub mod world;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use access::Access;
pub use directory::ContainerDirectory;
pub use ids::{ContainerId, EntryPointId, InstanceId, Position, RegionId, Timestamp};
pub use mapping::{
	MappingRecord, MappingResolver, MappingTable, PhysicalRef, Provenance, RescanReport, Subject,
	Target,
};
pub use position::{PositionCache, PositionSnapshot};
pub use scorer::{
	CandidateScore, CandidateScorer, Disqualification, ScoreContext, Selection, weights,
};
pub use world::{
	ContainerInfo, EntryPoint, InstanceInfo, NoWorld, Placed, PlacementHints, PlacementSupplement,
	RegionInfo, WorldView,
};
