use std::sync::Arc;

use parking_lot::RwLock;

/// How a call reaches guarded state.
///
/// Reentrant callers that already pinned a generation pass [`Access::Held`]; everyone
/// else passes [`Access::Acquire`] and the callee takes the read lock itself. One code
/// path serves both.
#[derive(Debug)]
pub enum Access<'a, G> {
	Acquire,
	Held(&'a G),
}

impl<G> Clone for Access<'_, G> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<G> Copy for Access<'_, G> {}

impl<G> Access<'_, G> {
	/// Runs `f` against the held value, or against the value currently published in
	/// `lock`. The read lock is released before `f` runs.
	pub fn with<R>(self, lock: &RwLock<Arc<G>>, f: impl FnOnce(&G) -> R) -> R {
		match self {
			Self::Held(held) => f(held),
			Self::Acquire => {
				let current = lock.read().clone();
				f(&current)
			}
		}
	}
}
