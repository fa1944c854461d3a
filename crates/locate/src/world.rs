use waymark_index::RecordId;

use crate::ids::{ContainerId, EntryPointId, InstanceId, Position, RegionId, Timestamp};

/// A physical container as reported by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerInfo {
	pub id: ContainerId,
	pub name: String,
	/// Name of the enclosing grouping, used to disambiguate duplicate names.
	pub parent: Option<String>,
	/// Generic or placeholder containers never count as named.
	pub placeholder: bool,
}

impl ContainerInfo {
	pub fn new(id: ContainerId, name: impl Into<String>) -> Self {
		Self {
			id,
			name: name.into(),
			parent: None,
			placeholder: false,
		}
	}

	pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
		self.parent = Some(parent.into());
		self
	}

	pub fn placeholder(mut self) -> Self {
		self.placeholder = true;
		self
	}

	pub fn is_named(&self) -> bool {
		!self.placeholder && !self.name.trim().is_empty()
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionInfo {
	pub id: RegionId,
	pub name: String,
}

/// A reference through which a container can be entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryPoint {
	pub id: EntryPointId,
	pub leads_to: ContainerId,
}

/// Everything the host knows about one live instance.
///
/// Each field feeds one [`crate::scorer`] signal or one mapping strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceInfo {
	pub id: InstanceId,
	pub logical_id: RecordId,
	/// Fully materialized in the world right now.
	pub active: bool,
	/// Carries the authoring-time placement reference.
	pub has_placement_ref: bool,
	pub container: Option<ContainerId>,
	/// Container restored from saved state; trustworthy only once the host reports its
	/// state as loaded.
	pub persisted_container: Option<ContainerId>,
	pub current_region: Option<RegionId>,
	pub declared_region: Option<RegionId>,
	pub position: Position,
	pub disabled: bool,
	pub deleted: bool,
	/// Display-only stand-ins such as mannequins.
	pub decoy: bool,
	/// Clone records flagged by the data source.
	pub clone: bool,
}

impl InstanceInfo {
	/// A bare instance with every signal unset.
	pub fn new(id: InstanceId, logical_id: RecordId) -> Self {
		Self {
			id,
			logical_id,
			active: false,
			has_placement_ref: false,
			container: None,
			persisted_container: None,
			current_region: None,
			declared_region: None,
			position: Position::default(),
			disabled: false,
			deleted: false,
			decoy: false,
			clone: false,
		}
	}
}

/// Author-time placement data carried by a catalog record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementHints {
	/// Durable origin placement, the most authoritative source.
	pub origin_container: Option<ContainerId>,
	/// Declared alternate starting container.
	pub alternate_container: Option<ContainerId>,
	pub declared_region: Option<RegionId>,
	/// Regions mentioned by the record's behavior or schedule data, in authoring order.
	pub schedule_regions: Vec<RegionId>,
}

impl PlacementHints {
	pub fn is_empty(&self) -> bool {
		self.origin_container.is_none()
			&& self.alternate_container.is_none()
			&& self.declared_region.is_none()
			&& self.schedule_regions.is_empty()
	}
}

/// Records that denote physical things expose their placement hints here.
pub trait Placed {
	fn placement(&self) -> Option<&PlacementHints> {
		None
	}

	/// Whether "where is it" is meaningful for this record.
	fn is_physical(&self) -> bool {
		self.placement().is_some()
	}
}

/// Optional companion data source supplying hints for records that carry none.
pub trait PlacementSupplement: Send + Sync {
	fn hints(&self, logical: RecordId) -> Option<PlacementHints>;
}

/// The host's live object model, reduced to what location resolution needs.
pub trait WorldView: Send + Sync {
	fn containers(&self) -> Vec<ContainerInfo>;

	fn regions(&self) -> Vec<RegionInfo> {
		Vec::new()
	}

	fn entry_points(&self) -> Vec<EntryPoint> {
		Vec::new()
	}

	/// Live instances currently realizing `logical`.
	fn instances(&self, logical: RecordId) -> Vec<InstanceInfo>;

	/// False until the host has restored its saved state.
	fn state_loaded(&self) -> bool {
		true
	}

	fn now(&self) -> Timestamp;
}

/// Stand-in used when the host provides no world. Everything is absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoWorld;

impl WorldView for NoWorld {
	fn containers(&self) -> Vec<ContainerInfo> {
		Vec::new()
	}

	fn instances(&self, _logical: RecordId) -> Vec<InstanceInfo> {
		Vec::new()
	}

	fn state_loaded(&self) -> bool {
		false
	}

	fn now(&self) -> Timestamp {
		Timestamp::default()
	}
}
