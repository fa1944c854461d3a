use super::{FuzzyConfig, Match, MatchStage, Suggestion};
use crate::index::{Entry, NameIndex};
use crate::normalize::{PREFIX_LEN, char_len, prefix_key};
use crate::record::Category;

/// One query evaluated against one generation.
pub(super) struct Scan<'a, T> {
	pub index: &'a NameIndex<T>,
	/// Normalized, non-empty.
	pub query: &'a str,
	pub words: &'a [&'a str],
	pub filter: Option<Category>,
	pub config: &'a FuzzyConfig,
}

impl<T> Scan<'_, T> {
	fn admitted(&self) -> impl Iterator<Item = (usize, &Entry<T>)> + '_ {
		self.index
			.entries()
			.iter()
			.enumerate()
			.filter(|(_, e)| e.category.admits(self.filter))
	}

	fn admits_slot(&self, slot: usize) -> bool {
		self.index
			.entry(slot)
			.is_some_and(|e| e.category.admits(self.filter))
	}

	fn multi_word(&self) -> bool {
		self.words.len() >= 2
	}

	pub fn exact(&self) -> Option<Match> {
		if let Some(slot) = self.index.lookup_normalized(self.query)
			&& self.admits_slot(slot)
		{
			return Some(Match {
				slot,
				stage: MatchStage::Exact,
				score: 0,
			});
		}
		self.index
			.lookup_alias(self.query)
			.filter(|&slot| self.admits_slot(slot))
			.map(|slot| Match {
				slot,
				stage: MatchStage::Alias,
				score: 0,
			})
	}

	pub fn prefix(&self) -> Option<Match> {
		let mut best: Option<(usize, usize)> = None;
		let mut consider = |slot: usize, entry: &Entry<T>| {
			if !entry.normalized.starts_with(self.query) {
				return;
			}
			let len = char_len(&entry.normalized);
			if best.is_none_or(|(_, best_len)| len < best_len) {
				best = Some((slot, len));
			}
		};

		if char_len(self.query) >= PREFIX_LEN {
			for &slot in self.index.prefix_candidates(prefix_key(self.query)) {
				if let Some(entry) = self.index.entry(slot)
					&& entry.category.admits(self.filter)
				{
					consider(slot, entry);
				}
			}
		} else {
			for (slot, entry) in self.admitted() {
				consider(slot, entry);
			}
		}

		best.map(|(slot, len)| Match {
			slot,
			stage: MatchStage::Prefix,
			score: len as i32,
		})
	}

	/// Score of `name` containing the query at its first occurrence, if it does.
	fn containment_score(&self, name: &str) -> Option<i32> {
		let pos = name.find(self.query)?;
		let mut score = self.config.base_score;
		if pos == 0 {
			score += self.config.start_bonus;
		} else if name[..pos].ends_with(' ') {
			score += self.config.boundary_bonus;
		}
		let surplus = char_len(name).saturating_sub(char_len(self.query));
		Some(score - surplus as i32)
	}

	pub fn contains(&self) -> Option<Match> {
		let mut best: Option<(usize, i32)> = None;
		for (slot, entry) in self.admitted() {
			let Some(score) = self.containment_score(&entry.normalized) else {
				continue;
			};
			if best.is_none_or(|(_, best_score)| score > best_score) {
				best = Some((slot, score));
			}
		}
		best.map(|(slot, score)| Match {
			slot,
			stage: MatchStage::Contains,
			score,
		})
	}

	pub fn word_set(&self) -> Option<Match> {
		if !self.multi_word() {
			return None;
		}
		let mut best: Option<(usize, usize)> = None;
		for (slot, entry) in self.admitted() {
			if !self.words.iter().all(|w| entry.normalized.contains(w)) {
				continue;
			}
			let len = char_len(&entry.normalized);
			if best.is_none_or(|(_, best_len)| len < best_len) {
				best = Some((slot, len));
			}
		}
		best.map(|(slot, len)| Match {
			slot,
			stage: MatchStage::WordSet,
			score: len as i32,
		})
	}

	/// Whole-name edit distance when `name` passes the length window and distance ceiling.
	fn whole_distance(&self, name: &str, query_len: usize) -> Option<usize> {
		let len = char_len(name);
		if len.abs_diff(query_len) > self.config.length_tolerance {
			return None;
		}
		let distance = strsim::levenshtein(self.query, name);
		(distance <= self.config.max_distance).then_some(distance)
	}

	pub fn levenshtein(&self) -> Option<Match> {
		let query_len = char_len(self.query);
		let mut best: Option<(usize, usize, usize)> = None;
		for (slot, entry) in self.admitted() {
			let Some(distance) = self.whole_distance(&entry.normalized, query_len) else {
				continue;
			};
			let len = char_len(&entry.normalized);
			if best.is_none_or(|(_, d, l)| (distance, len) < (d, l)) {
				best = Some((slot, distance, len));
			}
		}
		best.map(|(slot, distance, _)| Match {
			slot,
			stage: MatchStage::Levenshtein,
			score: distance as i32,
		})
	}

	/// Summed best per-word distance, or `None` when any query word has no close
	/// counterpart or the total exceeds the ceiling.
	fn word_distance(&self, name: &str) -> Option<usize> {
		let mut total = 0;
		for word in self.words {
			let word_len = char_len(word);
			let best = name
				.split(' ')
				.filter(|token| char_len(token).abs_diff(word_len) <= self.config.word_length_tolerance)
				.map(|token| strsim::levenshtein(word, token))
				.filter(|&d| d <= self.config.word_max_distance)
				.min()?;
			total += best;
			if total > self.config.word_total_distance {
				return None;
			}
		}
		Some(total)
	}

	pub fn word_levenshtein(&self) -> Option<Match> {
		if !self.multi_word() {
			return None;
		}
		let mut best: Option<(usize, usize, usize)> = None;
		for (slot, entry) in self.admitted() {
			let Some(total) = self.word_distance(&entry.normalized) else {
				continue;
			};
			let len = char_len(&entry.normalized);
			if best.is_none_or(|(_, t, l)| (total, len) < (t, l)) {
				best = Some((slot, total, len));
			}
		}
		best.map(|(slot, total, _)| Match {
			slot,
			stage: MatchStage::WordLevenshtein,
			score: total as i32,
		})
	}

	pub fn suggestions(&self, limit: usize) -> Vec<Suggestion> {
		let query_len = char_len(self.query);
		let mut contained = Vec::new();
		let mut typos = Vec::new();
		for (slot, entry) in self.admitted() {
			if let Some(score) = self.containment_score(&entry.normalized) {
				contained.push(Suggestion {
					slot,
					stage: MatchStage::Contains,
					score,
				});
			} else if let Some(distance) = self.whole_distance(&entry.normalized, query_len) {
				typos.push(Suggestion {
					slot,
					stage: MatchStage::Levenshtein,
					score: distance as i32,
				});
			}
		}
		// Stable sorts keep insertion order among equal scores.
		contained.sort_by(|a, b| b.score.cmp(&a.score));
		typos.sort_by_key(|s| s.score);
		contained.extend(typos);
		contained.truncate(limit);
		contained
	}
}
