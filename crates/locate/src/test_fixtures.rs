use rustc_hash::FxHashMap;
use waymark_index::RecordId;

use crate::ids::{ContainerId, EntryPointId, InstanceId, Position, RegionId, Timestamp};
use crate::world::{ContainerInfo, EntryPoint, InstanceInfo, RegionInfo, WorldView};

/// In-memory world for unit tests.
#[derive(Debug, Clone)]
pub(crate) struct FakeWorld {
	pub containers: Vec<ContainerInfo>,
	pub regions: Vec<RegionInfo>,
	pub entry_points: Vec<EntryPoint>,
	pub instances: FxHashMap<RecordId, Vec<InstanceInfo>>,
	pub loaded: bool,
	pub now: Timestamp,
}

impl Default for FakeWorld {
	fn default() -> Self {
		Self {
			containers: Vec::new(),
			regions: Vec::new(),
			entry_points: Vec::new(),
			instances: FxHashMap::default(),
			loaded: true,
			now: Timestamp(1_000),
		}
	}
}

impl FakeWorld {
	pub fn with_container(mut self, info: ContainerInfo) -> Self {
		self.containers.push(info);
		self
	}

	pub fn with_region(mut self, id: RegionId, name: &str) -> Self {
		self.regions.push(RegionInfo {
			id,
			name: name.to_string(),
		});
		self
	}

	pub fn with_entry_point(mut self, id: EntryPointId, leads_to: ContainerId) -> Self {
		self.entry_points.push(EntryPoint { id, leads_to });
		self
	}

	pub fn with_instance(mut self, instance: InstanceInfo) -> Self {
		self.instances
			.entry(instance.logical_id)
			.or_default()
			.push(instance);
		self
	}

	pub fn unloaded(mut self) -> Self {
		self.loaded = false;
		self
	}
}

impl WorldView for FakeWorld {
	fn containers(&self) -> Vec<ContainerInfo> {
		self.containers.clone()
	}

	fn regions(&self) -> Vec<RegionInfo> {
		self.regions.clone()
	}

	fn entry_points(&self) -> Vec<EntryPoint> {
		self.entry_points.clone()
	}

	fn instances(&self, logical: RecordId) -> Vec<InstanceInfo> {
		self.instances.get(&logical).cloned().unwrap_or_default()
	}

	fn state_loaded(&self) -> bool {
		self.loaded
	}

	fn now(&self) -> Timestamp {
		self.now
	}
}

/// An active, placed instance standing in `container` away from the origin.
pub(crate) fn live(id: u32, logical: u32, container: ContainerId) -> InstanceInfo {
	InstanceInfo {
		active: true,
		container: Some(container),
		position: Position::new(10.0, 20.0, 0.0),
		..InstanceInfo::new(InstanceId(id), RecordId(logical))
	}
}
