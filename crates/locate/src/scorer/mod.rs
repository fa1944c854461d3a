//! Confidence scoring for competing live instances of one logical record.
//!
//! Duplicate data sources and stale references can leave several live instances claiming
//! the same logical id. Each candidate gets an additive score from the signals in
//! [`weights`]; the highest surviving score wins and the instance id only orders ties.
//!
//! The winner is remembered as the known-good instance for that logical id. Later
//! selections return it without scoring as long as it is still present and usable.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::trace;
use waymark_index::RecordId;

use crate::directory::ContainerDirectory;
use crate::ids::{ContainerId, InstanceId};
use crate::world::InstanceInfo;

#[cfg(test)]
mod tests;

/// Additive signal weights.
pub mod weights {
	pub const ACTIVE: i32 = 50;
	pub const PLACEMENT_REF: i32 = 30;
	pub const EXPECTED_CONTAINER: i32 = 25;
	pub const HAS_CONTAINER: i32 = 20;
	pub const NAMED_CONTAINER: i32 = 10;
	pub const PERSISTED: i32 = 20;
	pub const CURRENT_REGION: i32 = 15;
	pub const DECLARED_REGION: i32 = 15;
	pub const KNOWN_GOOD: i32 = 10;
	pub const AT_ORIGIN: i32 = -50;
	pub const DISABLED: i32 = -100;
	/// Replaces every other signal.
	pub const DELETED: i32 = -1000;
}

/// Why a candidate can never be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Disqualification {
	Deleted,
	Decoy,
	Clone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateScore {
	pub instance: InstanceId,
	pub total: i32,
	pub disqualified: Option<Disqualification>,
}

/// Inputs that come from outside the candidate itself.
#[derive(Debug, Clone, Copy)]
pub struct ScoreContext<'a> {
	/// Where the mapping predicts this record lives.
	pub expected_container: Option<ContainerId>,
	pub directory: &'a ContainerDirectory,
}

/// Outcome of [`CandidateScorer::select`].
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
	pub instance: InstanceInfo,
	/// `None` when served from the known-good cache without scoring.
	pub score: Option<i32>,
	pub from_cache: bool,
}

/// Scores candidates and remembers the last known-good pick per logical id.
#[derive(Debug, Default)]
pub struct CandidateScorer {
	known_good: Mutex<FxHashMap<RecordId, InstanceId>>,
	cache_hits: AtomicU64,
	scored: AtomicU64,
}

impl CandidateScorer {
	pub fn new() -> Self {
		Self::default()
	}

	/// Scores one candidate.
	pub fn score(
		&self,
		candidate: &InstanceInfo,
		ctx: &ScoreContext<'_>,
		known_good: Option<InstanceId>,
	) -> CandidateScore {
		if candidate.deleted {
			return CandidateScore {
				instance: candidate.id,
				total: weights::DELETED,
				disqualified: Some(Disqualification::Deleted),
			};
		}

		let mut total = 0;
		if candidate.active {
			total += weights::ACTIVE;
		}
		if candidate.has_placement_ref {
			total += weights::PLACEMENT_REF;
		}
		if let Some(container) = candidate.container {
			if ctx.expected_container == Some(container) {
				total += weights::EXPECTED_CONTAINER;
			}
			total += weights::HAS_CONTAINER;
			if ctx.directory.is_named(container) {
				total += weights::NAMED_CONTAINER;
			}
		}
		if candidate.persisted_container.is_some() {
			total += weights::PERSISTED;
		}
		if candidate.current_region.is_some() {
			total += weights::CURRENT_REGION;
		}
		if candidate.declared_region.is_some() {
			total += weights::DECLARED_REGION;
		}
		if known_good == Some(candidate.id) {
			total += weights::KNOWN_GOOD;
		}
		if candidate.position.is_origin() {
			total += weights::AT_ORIGIN;
		}
		if candidate.disabled {
			total += weights::DISABLED;
		}

		let disqualified = if candidate.decoy {
			Some(Disqualification::Decoy)
		} else if candidate.clone {
			Some(Disqualification::Clone)
		} else {
			None
		};

		CandidateScore {
			instance: candidate.id,
			total,
			disqualified,
		}
	}

	/// Scores every candidate and returns the survivors, best first.
	pub fn rank(
		&self,
		logical: RecordId,
		candidates: &[InstanceInfo],
		ctx: &ScoreContext<'_>,
	) -> Vec<CandidateScore> {
		self.rank_against(candidates, ctx, self.known_good(logical))
	}

	fn rank_against(
		&self,
		candidates: &[InstanceInfo],
		ctx: &ScoreContext<'_>,
		known_good: Option<InstanceId>,
	) -> Vec<CandidateScore> {
		let mut ranked: Vec<CandidateScore> = candidates
			.iter()
			.map(|c| self.score(c, ctx, known_good))
			.filter(|s| s.disqualified.is_none())
			.collect();
		ranked.sort_by(|a, b| b.total.cmp(&a.total).then(a.instance.cmp(&b.instance)));
		self.scored.fetch_add(1, Ordering::Relaxed);
		ranked
	}

	/// Picks the instance that best realizes `logical`.
	///
	/// A still-usable known-good instance short-circuits scoring. Otherwise every
	/// candidate is scored, the previous pick still earning its known-good signal, and the
	/// best survivor becomes the new known-good pick.
	pub fn select(
		&self,
		logical: RecordId,
		candidates: &[InstanceInfo],
		ctx: &ScoreContext<'_>,
	) -> Option<Selection> {
		let cached = self.known_good(logical);
		if let Some(cached) = cached
			&& let Some(hit) = candidates.iter().find(|c| c.id == cached && usable(c))
		{
			self.cache_hits.fetch_add(1, Ordering::Relaxed);
			return Some(Selection {
				instance: hit.clone(),
				score: None,
				from_cache: true,
			});
		}

		let Some(best) = self.rank_against(candidates, ctx, cached).into_iter().next() else {
			if cached.is_some() {
				self.forget(logical);
			}
			return None;
		};
		let instance = candidates.iter().find(|c| c.id == best.instance)?.clone();
		trace!(%logical, instance = %best.instance, score = best.total, "selected instance");
		self.known_good.lock().insert(logical, best.instance);
		Some(Selection {
			instance,
			score: Some(best.total),
			from_cache: false,
		})
	}

	pub fn known_good(&self, logical: RecordId) -> Option<InstanceId> {
		self.known_good.lock().get(&logical).copied()
	}

	pub fn forget(&self, logical: RecordId) {
		self.known_good.lock().remove(&logical);
	}

	pub fn clear(&self) {
		self.known_good.lock().clear();
	}

	pub fn cache_hits(&self) -> u64 {
		self.cache_hits.load(Ordering::Relaxed)
	}

	/// Number of full scoring passes run.
	pub fn scoring_passes(&self) -> u64 {
		self.scored.load(Ordering::Relaxed)
	}
}

/// A cached pick stays valid while it could still win outright.
fn usable(candidate: &InstanceInfo) -> bool {
	!(candidate.deleted || candidate.decoy || candidate.clone || candidate.disabled)
}
