use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! host_id {
	($(#[$meta:meta])* $name:ident) => {
		$(#[$meta])*
		#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(pub u32);

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{:08X}", self.0)
			}
		}
	};
}

host_id!(
	/// A physical container (interior cell, exterior cell, room).
	ContainerId
);
host_id!(
	/// A named region grouping containers (hold, town, dungeon).
	RegionId
);
host_id!(
	/// One live instance of a logical record.
	InstanceId
);
host_id!(
	/// A reachable reference leading into a container (door, marker).
	EntryPointId
);

/// Distance from the origin below which a position counts as unset.
pub const ORIGIN_EPSILON: f32 = 1.0e-3;

/// World-space position as reported by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
	pub x: f32,
	pub y: f32,
	pub z: f32,
}

impl Position {
	pub const fn new(x: f32, y: f32, z: f32) -> Self {
		Self { x, y, z }
	}

	/// Instances parked at the origin are almost always orphaned or uninitialized.
	pub fn is_origin(&self) -> bool {
		self.x.abs() < ORIGIN_EPSILON && self.y.abs() < ORIGIN_EPSILON && self.z.abs() < ORIGIN_EPSILON
	}
}

/// Host clock reading in milliseconds.
#[derive(
	Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(pub u64);

impl Timestamp {
	/// Milliseconds elapsed from `self` to `now`; zero if `now` is earlier.
	#[inline]
	pub fn elapsed_until(self, now: Timestamp) -> u64 {
		now.0.saturating_sub(self.0)
	}
}
