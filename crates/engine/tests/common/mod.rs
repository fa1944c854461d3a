#![allow(dead_code)]

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use waymark_engine::{
	CatalogRecord, Category, ContainerId, ContainerInfo, EntryPoint, InstanceId, InstanceInfo,
	Placed, PlacementHints, Position, RecordId, RegionId, RegionInfo, Timestamp, WorldView,
};

pub fn init_tracing() {
	let _ = tracing_subscriber::fmt()
		.with_test_writer()
		.with_max_level(tracing::Level::DEBUG)
		.try_init();
}

#[derive(Debug, Clone)]
pub struct Thing {
	pub name: String,
	pub id: RecordId,
	pub category: Category,
	pub primary: bool,
	pub aliases: Vec<String>,
	pub hints: Option<PlacementHints>,
	pub physical: bool,
}

impl CatalogRecord for Thing {
	fn name(&self) -> &str {
		&self.name
	}

	fn identifier(&self) -> RecordId {
		self.id
	}

	fn category(&self) -> Category {
		self.category
	}

	fn is_primary(&self) -> bool {
		self.primary
	}

	fn aliases(&self) -> &[String] {
		&self.aliases
	}
}

impl Placed for Thing {
	fn placement(&self) -> Option<&PlacementHints> {
		self.hints.as_ref()
	}

	fn is_physical(&self) -> bool {
		self.physical
	}
}

pub fn item(name: &str, id: u32) -> Thing {
	Thing {
		name: name.to_string(),
		id: RecordId(id),
		category: Category::ITEM,
		primary: false,
		aliases: Vec::new(),
		hints: None,
		physical: false,
	}
}

/// A uniquely named, physical character.
pub fn character(name: &str, id: u32) -> Thing {
	Thing {
		category: Category::CHARACTER,
		primary: true,
		physical: true,
		..item(name, id)
	}
}

pub fn with_hints(mut thing: Thing, hints: PlacementHints) -> Thing {
	thing.hints = Some(hints);
	thing
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

/// Host world the tests mutate while an engine reads it.
#[derive(Debug, Default)]
pub struct HostWorld {
	state: RwLock<State>,
}

impl HostWorld {
	pub fn loaded() -> Arc<Self> {
		let world = Self::default();
		world.state.write().loaded = true;
		Arc::new(world)
	}

	pub fn unloaded() -> Arc<Self> {
		Arc::new(Self::default())
	}

	pub fn add_container(&self, info: ContainerInfo) {
		self.state.write().containers.push(info);
	}

	pub fn add_region(&self, id: RegionId, name: &str) {
		self.state.write().regions.push(RegionInfo {
			id,
			name: name.to_string(),
		});
	}

	pub fn add_instance(&self, instance: InstanceInfo) {
		self.state
			.write()
			.instances
			.entry(instance.logical_id)
			.or_default()
			.push(instance);
	}

	pub fn set_instances(&self, logical: RecordId, instances: Vec<InstanceInfo>) {
		self.state.write().instances.insert(logical, instances);
	}

	pub fn set_loaded(&self, loaded: bool) {
		self.state.write().loaded = loaded;
	}

	pub fn set_now(&self, millis: u64) {
		self.state.write().now = millis;
	}
}

impl WorldView for HostWorld {
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

/// An active instance standing in `container`, away from the origin.
pub fn active_in(id: u32, logical: u32, container: u32) -> InstanceInfo {
	InstanceInfo {
		active: true,
		container: Some(ContainerId(container)),
		position: Position::new(100.0, -40.0, 8.0),
		..InstanceInfo::new(InstanceId(id), RecordId(logical))
	}
}
