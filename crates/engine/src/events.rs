//! Host notifications fanned out to subscribers.
//!
//! The host emits one [`Observed`] per live-instance observation and one
//! [`ContainerChanged`] per container transition. Subscribers register plain closures;
//! nothing subclasses anything.

use std::sync::Arc;

use parking_lot::RwLock;
use waymark_index::RecordId;
use waymark_locate::{ContainerId, Position, RegionId, Timestamp};

type Callback<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// A live instance was seen at a position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observed {
	pub logical_id: RecordId,
	pub position: Position,
	pub container: Option<ContainerId>,
	pub region: Option<RegionId>,
	pub timestamp: Timestamp,
}

/// A live instance moved between containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerChanged {
	pub logical_id: RecordId,
	pub container: Option<ContainerId>,
	pub timestamp: Timestamp,
}

/// Callbacks for one event kind.
pub struct Dispatcher<E> {
	callbacks: RwLock<Vec<Callback<E>>>,
}

impl<E> Default for Dispatcher<E> {
	fn default() -> Self {
		Self {
			callbacks: RwLock::new(Vec::new()),
		}
	}
}

impl<E> Dispatcher<E> {
	pub fn subscribe(&self, callback: impl Fn(&E) + Send + Sync + 'static) {
		self.callbacks.write().push(Arc::new(callback));
	}

	/// Calls every subscriber in registration order.
	///
	/// The subscriber list is copied first, so a callback may subscribe more callbacks.
	pub fn emit(&self, event: &E) {
		let callbacks = self.callbacks.read().clone();
		for callback in &callbacks {
			callback(event);
		}
	}

	pub fn len(&self) -> usize {
		self.callbacks.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.callbacks.read().is_empty()
	}
}

impl<E> std::fmt::Debug for Dispatcher<E> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Dispatcher")
			.field("subscribers", &self.len())
			.finish()
	}
}

/// Every dispatcher the host emits into.
#[derive(Debug, Default)]
pub struct EventHub {
	pub observed: Dispatcher<Observed>,
	pub container_changed: Dispatcher<ContainerChanged>,
}

impl EventHub {
	pub fn new() -> Self {
		Self::default()
	}
}
