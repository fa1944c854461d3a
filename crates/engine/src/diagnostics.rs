use std::collections::BTreeMap;

use serde::Serialize;
use waymark_locate::{CandidateScorer, PositionCache, Provenance};

use crate::engine::Generation;

/// Point-in-time counters for one engine. Serializable for status dumps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
	pub catalog: &'static str,
	pub generation: u64,
	pub shut_down: bool,
	pub indexed: usize,
	/// Records skipped for empty or too-short names.
	pub skipped: usize,
	pub shadowed: usize,
	pub aliases: usize,
	pub name_conflicts: usize,
	pub mapped: usize,
	pub unmapped: usize,
	pub by_provenance: BTreeMap<Provenance, usize>,
	pub containers: usize,
	pub duplicate_display_names: usize,
	pub cached_positions: usize,
	pub known_good_hits: u64,
	pub scoring_passes: u64,
}

impl Diagnostics {
	pub(crate) fn collect<T>(
		catalog: &'static str,
		generation: &Generation<T>,
		scorer: &CandidateScorer,
		positions: &PositionCache,
		shut_down: bool,
	) -> Self {
		let stats = generation.names().stats();
		Self {
			catalog,
			generation: generation.number(),
			shut_down,
			indexed: stats.indexed,
			skipped: stats.skipped,
			shadowed: stats.shadowed,
			aliases: stats.aliases,
			name_conflicts: generation.names().conflicts().len(),
			mapped: generation.mapping().mapped_len(),
			unmapped: generation.mapping().unresolved_len(),
			by_provenance: generation.mapping().provenance_counts(),
			containers: generation.directory().len(),
			duplicate_display_names: generation.directory().duplicate_names(),
			cached_positions: positions.len(),
			known_good_hits: scorer.cache_hits(),
			scoring_passes: scorer.scoring_passes(),
		}
	}
}
