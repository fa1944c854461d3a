//! Staged fuzzy matching shared by every catalog.
//!
//! # Cascade
//!
//! Stages run in order and the first one that produces a match wins:
//!
//! | Stage | Accepts | Winner |
//! |---|---|---|
//! | [`MatchStage::Exact`] / [`MatchStage::Alias`] | exact name, then alias table | the bound slot |
//! | [`MatchStage::Prefix`] | names starting with the query | shortest name |
//! | [`MatchStage::Contains`] | names containing the query | highest boundary score |
//! | [`MatchStage::WordSet`] | names containing every query word | shortest name |
//! | [`MatchStage::Levenshtein`] | whole-name edit distance within bounds | lowest distance, then shortest |
//! | [`MatchStage::WordLevenshtein`] | per-word edit distance within bounds | lowest total, then shortest |
//!
//! Ties that survive the listed rule go to the entry scanned first (insertion order).
//! No match is a normal outcome.

mod stages;

use serde::{Deserialize, Serialize};

use crate::index::NameIndex;
use crate::normalize::normalize;
use crate::record::Category;

#[cfg(test)]
mod tests;

/// Which cascade stage produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchStage {
	Exact,
	Alias,
	Prefix,
	Contains,
	WordSet,
	Levenshtein,
	WordLevenshtein,
}

/// A single resolved slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
	pub slot: usize,
	pub stage: MatchStage,
	/// Stage-specific: boundary score for [`MatchStage::Contains`], edit distance for the
	/// Levenshtein stages, name length otherwise.
	pub score: i32,
}

/// A ranked "did you mean" candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Suggestion {
	pub slot: usize,
	pub stage: MatchStage,
	pub score: i32,
}

/// Fuzzy cascade tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FuzzyConfig {
	/// Highest whole-name edit distance accepted.
	pub max_distance: usize,
	/// Largest name/query length difference considered for whole-name edit distance.
	pub length_tolerance: usize,
	pub base_score: i32,
	/// Added when a contained query starts the name.
	pub start_bonus: i32,
	/// Added when a contained query follows a space.
	pub boundary_bonus: i32,
	pub word_max_distance: usize,
	pub word_length_tolerance: usize,
	/// Highest summed per-word distance accepted.
	pub word_total_distance: usize,
}

impl Default for FuzzyConfig {
	fn default() -> Self {
		Self {
			max_distance: 2,
			length_tolerance: 3,
			base_score: 100,
			start_bonus: 50,
			boundary_bonus: 30,
			word_max_distance: 2,
			word_length_tolerance: 2,
			word_total_distance: 4,
		}
	}
}

/// Runs the match cascade against any [`NameIndex`]. Holds configuration only.
#[derive(Debug, Clone, Copy, Default)]
pub struct FuzzyResolver {
	config: FuzzyConfig,
}

impl FuzzyResolver {
	pub fn new(config: FuzzyConfig) -> Self {
		Self { config }
	}

	#[inline]
	pub fn config(&self) -> &FuzzyConfig {
		&self.config
	}

	/// Resolves `query` to at most one slot of `index`.
	///
	/// With a `filter`, only entries whose category intersects it are considered.
	pub fn resolve<T>(
		&self,
		index: &NameIndex<T>,
		query: &str,
		filter: Option<Category>,
	) -> Option<Match> {
		let query = normalize(query);
		if query.is_empty() {
			return None;
		}
		let words: Vec<&str> = query.split(' ').collect();
		let scan = stages::Scan {
			index,
			query: &query,
			words: &words,
			filter,
			config: &self.config,
		};

		scan.exact()
			.or_else(|| scan.prefix())
			.or_else(|| scan.contains())
			.or_else(|| scan.word_set())
			.or_else(|| scan.levenshtein())
			.or_else(|| scan.word_levenshtein())
	}

	/// Ranked candidates for a query that may not resolve, best first.
	///
	/// Containment matches (by score) precede typo matches (by distance); each slot
	/// appears once.
	pub fn suggest<T>(
		&self,
		index: &NameIndex<T>,
		query: &str,
		filter: Option<Category>,
		limit: usize,
	) -> Vec<Suggestion> {
		let query = normalize(query);
		if query.is_empty() || limit == 0 {
			return Vec::new();
		}
		let words: Vec<&str> = query.split(' ').collect();
		let scan = stages::Scan {
			index,
			query: &query,
			words: &words,
			filter,
			config: &self.config,
		};
		scan.suggestions(limit)
	}
}
