use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use waymark_index::{CatalogRecord, Category, RecordId};
use waymark_locate::{
	ContainerId, ContainerInfo, EntryPoint, InstanceId, InstanceInfo, Placed, PlacementHints,
	Position, RegionInfo, Timestamp, WorldView,
};

#[derive(Debug, Clone)]
pub(crate) struct Npc {
	pub name: String,
	pub id: RecordId,
	pub primary: bool,
	pub hints: Option<PlacementHints>,
	pub physical: bool,
}

impl CatalogRecord for Npc {
	fn name(&self) -> &str {
		&self.name
	}

	fn identifier(&self) -> RecordId {
		self.id
	}

	fn category(&self) -> Category {
		if self.physical {
			Category::CHARACTER
		} else {
			Category::ITEM
		}
	}

	fn is_primary(&self) -> bool {
		self.primary
	}
}

impl Placed for Npc {
	fn placement(&self) -> Option<&PlacementHints> {
		self.hints.as_ref()
	}

	fn is_physical(&self) -> bool {
		self.physical
	}
}

/// A primary, physical record without hints.
pub(crate) fn npc(name: &str, id: u32) -> Npc {
	Npc {
		name: name.to_string(),
		id: RecordId(id),
		primary: true,
		hints: None,
		physical: true,
	}
}

pub(crate) fn placed_in(mut npc: Npc, container: u32) -> Npc {
	npc.hints = Some(PlacementHints {
		origin_container: Some(ContainerId(container)),
		..Default::default()
	});
	npc
}

pub(crate) fn item(name: &str, id: u32) -> Npc {
	Npc {
		physical: false,
		..npc(name, id)
	}
}

#[derive(Debug, Default)]
struct State {
	containers: Vec<ContainerInfo>,
	regions: Vec<RegionInfo>,
	entry_points: Vec<EntryPoint>,
	instances: FxHashMap<RecordId, Vec<InstanceInfo>>,
	loaded: bool,
	now: u64,
}

/// Mutable host world shared with the engine under test.
#[derive(Debug, Default)]
pub(crate) struct TestWorld {
	state: RwLock<State>,
}

impl TestWorld {
	/// Two "Cellar" containers told apart by parent, plus "Jorrvaskr" with a door.
	pub fn cellars() -> Arc<Self> {
		let world = Self::default();
		{
			let mut state = world.state.write();
			state.containers = vec![
				ContainerInfo::new(ContainerId(1), "Cellar").with_parent("Bar"),
				ContainerInfo::new(ContainerId(2), "Cellar").with_parent("Keep"),
				ContainerInfo::new(ContainerId(3), "Jorrvaskr"),
			];
			state.entry_points = vec![EntryPoint {
				id: waymark_locate::EntryPointId(900),
				leads_to: ContainerId(3),
			}];
			state.loaded = true;
			state.now = 1_000;
		}
		Arc::new(world)
	}

	pub fn add_instance(&self, instance: InstanceInfo) {
		self.state
			.write()
			.instances
			.entry(instance.logical_id)
			.or_default()
			.push(instance);
	}

	pub fn remove_instances(&self, logical: RecordId) {
		self.state.write().instances.remove(&logical);
	}

	pub fn advance(&self, millis: u64) {
		self.state.write().now += millis;
	}
}

impl WorldView for TestWorld {
	fn containers(&self) -> Vec<ContainerInfo> {
		self.state.read().containers.clone()
	}

	fn regions(&self) -> Vec<RegionInfo> {
		self.state.read().regions.clone()
	}

	fn entry_points(&self) -> Vec<EntryPoint> {
		self.state.read().entry_points.clone()
	}

	fn instances(&self, logical: RecordId) -> Vec<InstanceInfo> {
		self.state
			.read()
			.instances
			.get(&logical)
			.cloned()
			.unwrap_or_default()
	}

	fn state_loaded(&self) -> bool {
		self.state.read().loaded
	}

	fn now(&self) -> Timestamp {
		Timestamp(self.state.read().now)
	}
}

/// An active instance standing in `container`.
pub(crate) fn live(id: u32, logical: u32, container: u32) -> InstanceInfo {
	InstanceInfo {
		active: true,
		container: Some(ContainerId(container)),
		position: Position::new(10.0, 20.0, 0.0),
		..InstanceInfo::new(InstanceId(id), RecordId(logical))
	}
}
