//! Last-known physical state for records that cannot be observed right now.
//!
//! Every observation of a live instance refreshes its logical record's snapshot. The cache
//! sits behind its own mutex so the high rate of observation writes never contends with
//! name or mapping queries. A missing snapshot means "unknown" and is reported as `None`.

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde::Serialize;
use waymark_index::RecordId;

use crate::ids::{ContainerId, Position, RegionId, Timestamp};


#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PositionSnapshot {
	pub position: Position,
	pub container: Option<ContainerId>,
	pub region: Option<RegionId>,
	/// When the instance was last observed; callers judge staleness from it.
	pub timestamp: Timestamp,
	/// Cleared when the host reports the instance gone.
	pub valid: bool,
}

impl PositionSnapshot {
	/// Milliseconds since the snapshot was taken.
	#[inline]
	pub fn age(&self, now: Timestamp) -> u64 {
		self.timestamp.elapsed_until(now)
	}
}

#[derive(Debug, Default)]
pub struct PositionCache {
	snapshots: Mutex<FxHashMap<RecordId, PositionSnapshot>>,
}

impl PositionCache {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records an observation. Older observations arriving late are ignored.
	///
	/// Returns true when the stored snapshot changed.
	pub fn observe(
		&self,
		logical: RecordId,
		position: Position,
		container: Option<ContainerId>,
		region: Option<RegionId>,
		timestamp: Timestamp,
	) -> bool {
		let mut snapshots = self.snapshots.lock();
		if let Some(existing) = snapshots.get(&logical)
			&& existing.timestamp > timestamp
		{
			return false;
		}
		snapshots.insert(
			logical,
			PositionSnapshot {
				position,
				container,
				region,
				timestamp,
				valid: true,
			},
		);
		true
	}

	/// Moves an existing snapshot to `container` without a fresh position.
	///
	/// Does nothing when no snapshot exists or the change predates it.
	pub fn note_container_change(
		&self,
		logical: RecordId,
		container: Option<ContainerId>,
		timestamp: Timestamp,
	) -> bool {
		let mut snapshots = self.snapshots.lock();
		match snapshots.get_mut(&logical) {
			Some(snapshot) if snapshot.timestamp <= timestamp => {
				snapshot.container = container;
				snapshot.timestamp = timestamp;
				true
			}
			_ => false,
		}
	}

	/// Keeps the snapshot for diagnostics but stops serving it as last-known.
	pub fn invalidate(&self, logical: RecordId) -> bool {
		match self.snapshots.lock().get_mut(&logical) {
			Some(snapshot) => {
				snapshot.valid = false;
				true
			}
			None => false,
		}
	}

	/// The last valid snapshot, if any.
	pub fn last_known(&self, logical: RecordId) -> Option<PositionSnapshot> {
		self.snapshots
			.lock()
			.get(&logical)
			.copied()
			.filter(|s| s.valid)
	}

	/// The stored snapshot whether or not it is still valid.
	pub fn raw(&self, logical: RecordId) -> Option<PositionSnapshot> {
		self.snapshots.lock().get(&logical).copied()
	}

	pub fn len(&self) -> usize {
		self.snapshots.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.snapshots.lock().is_empty()
	}

	pub fn clear(&self) {
		self.snapshots.lock().clear();
	}
}
