//! Container names, duplicate-name disambiguation and the entry-point reverse index.
//!
//! # Disambiguation
//!
//! Names are counted across all containers at build time. A name seen more than once gets
//! a qualified form `"{name} ({parent})"` (or `"{name} ({id})"` without a parent). Both
//! forms are indexed: the bare name keeps resolving to the first container seen with it,
//! the qualified name resolves to exactly one container.
//!
//! # Reverse index
//!
//! `container -> entry point` is built by one pass over the host's entry points, turning
//! the common lookup into a map hit. Misses fall back to a linear scan of the live world.

use rustc_hash::FxHashMap;
use tracing::{debug, warn};
use waymark_index::normalize;

use crate::ids::{ContainerId, EntryPointId, RegionId};
use crate::world::{ContainerInfo, EntryPoint, RegionInfo, WorldView};

#[derive(Debug, Default)]
pub struct ContainerDirectory {
	containers: Vec<ContainerInfo>,
	by_id: FxHashMap<ContainerId, usize>,
	by_name: FxHashMap<Box<str>, ContainerId>,
	/// Qualified display names of containers whose bare name collides.
	qualified: FxHashMap<ContainerId, Box<str>>,
	regions: FxHashMap<RegionId, Box<str>>,
	entry_points: FxHashMap<ContainerId, EntryPointId>,
	duplicate_names: usize,
}

impl ContainerDirectory {
	pub fn build(
		containers: Vec<ContainerInfo>,
		regions: Vec<RegionInfo>,
		entry_points: Vec<EntryPoint>,
	) -> Self {
		let mut dir = Self::default();

		for info in containers {
			if dir.by_id.contains_key(&info.id) {
				debug!(container = %info.id, "ignoring repeated container id");
				continue;
			}
			dir.by_id.insert(info.id, dir.containers.len());
			dir.containers.push(info);
		}

		let mut occurrences: FxHashMap<String, usize> = FxHashMap::default();
		for info in &dir.containers {
			let key = normalize(&info.name);
			if !key.is_empty() {
				*occurrences.entry(key).or_default() += 1;
			}
		}
		dir.duplicate_names = occurrences.values().filter(|&&n| n > 1).count();

		// Real names claim their keys before any synthesized qualified name.
		for info in &dir.containers {
			let bare = normalize(&info.name);
			if !bare.is_empty() {
				dir.by_name.entry(bare.into()).or_insert(info.id);
			}
		}

		for info in &dir.containers {
			let bare = normalize(&info.name);
			if occurrences.get(&bare).copied().unwrap_or(0) < 2 {
				continue;
			}
			let qualifier = match info.parent.as_deref().map(str::trim) {
				Some(parent) if !parent.is_empty() => parent.to_string(),
				_ => info.id.to_string(),
			};
			let qualified = format!("{} ({qualifier})", info.name.trim());
			let key: Box<str> = normalize(&qualified).into();
			match dir.by_name.get(&key).copied() {
				Some(holder) if holder != info.id => warn!(
					container = %info.id,
					holder = %holder,
					name = %qualified,
					"disambiguated name collides with an existing name"
				),
				Some(_) => {}
				None => {
					dir.by_name.insert(key, info.id);
				}
			}
			dir.qualified.insert(info.id, qualified.into());
		}

		for region in regions {
			dir.regions.entry(region.id).or_insert(region.name.into());
		}

		for entry in entry_points {
			dir.entry_points.entry(entry.leads_to).or_insert(entry.id);
		}

		debug!(
			containers = dir.containers.len(),
			duplicate_names = dir.duplicate_names,
			entry_points = dir.entry_points.len(),
			"container directory built"
		);
		dir
	}

	/// Builds from everything the world currently reports.
	pub fn from_world(world: &dyn WorldView) -> Self {
		Self::build(world.containers(), world.regions(), world.entry_points())
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.containers.len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.containers.is_empty()
	}

	pub fn container(&self, id: ContainerId) -> Option<&ContainerInfo> {
		self.by_id.get(&id).map(|&i| &self.containers[i])
	}

	/// Display name, qualified when the bare name is shared with another container.
	pub fn display_name(&self, id: ContainerId) -> Option<&str> {
		if let Some(qualified) = self.qualified.get(&id) {
			return Some(&**qualified);
		}
		self.container(id).map(|c| c.name.as_str())
	}

	/// Exact lookup of a bare or qualified name. Bare duplicates resolve to the first
	/// container seen.
	pub fn lookup_name(&self, name: &str) -> Option<ContainerId> {
		self.by_name.get(normalize(name).as_str()).copied()
	}

	/// Known and neither a placeholder nor unnamed.
	pub fn is_named(&self, id: ContainerId) -> bool {
		self.container(id).is_some_and(ContainerInfo::is_named)
	}

	pub fn region_name(&self, id: RegionId) -> Option<&str> {
		self.regions.get(&id).map(|n| &**n)
	}

	/// Number of distinct names shared by two or more containers.
	#[inline]
	pub fn duplicate_names(&self) -> usize {
		self.duplicate_names
	}

	/// Reverse-index hit only.
	#[inline]
	pub fn indexed_entry_point(&self, container: ContainerId) -> Option<EntryPointId> {
		self.entry_points.get(&container).copied()
	}

	/// Reverse-index lookup with a linear scan of `world` on a miss.
	pub fn entry_point_for(
		&self,
		container: ContainerId,
		world: &dyn WorldView,
	) -> Option<EntryPointId> {
		if let Some(id) = self.indexed_entry_point(container) {
			return Some(id);
		}
		let found = world
			.entry_points()
			.into_iter()
			.find(|e| e.leads_to == container)
			.map(|e| e.id);
		debug!(container = %container, found = found.is_some(), "entry point scan fallback");
		found
	}
}
