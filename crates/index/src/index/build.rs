use std::collections::hash_map::Entry as Slot;

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use super::{Bucket, BuildStats, ConflictKind, Entry, IndexConfig, NameConflict, NameIndex};
use crate::normalize::{char_len, normalize, prefix_key};
use crate::record::{CatalogRecord, RecordId};

impl<T: CatalogRecord> NameIndex<T> {
	/// Builds a generation from `records`.
	///
	/// Never fails: empty and too-short names are skipped and counted, conflicts are
	/// settled by [`IndexConfig::duplicate_policy`] and recorded.
	pub fn build<I>(label: &'static str, records: I, config: &IndexConfig) -> Self
	where
		I: IntoIterator<Item = T>,
	{
		Self::build_with_aliases(label, records, std::iter::empty(), config)
	}

	/// Builds a generation with an extra `alias -> canonical name` table on top of the
	/// aliases each record declares.
	pub fn build_with_aliases<I, A>(
		label: &'static str,
		records: I,
		extra_aliases: A,
		config: &IndexConfig,
	) -> Self
	where
		I: IntoIterator<Item = T>,
		A: IntoIterator<Item = (String, String)>,
	{
		let mut index = Self::empty(label);
		let mut stats = BuildStats::default();

		for record in records {
			index.insert_record(record, config, &mut stats);
		}

		for slot in 0..index.entries.len() {
			let target = index.entries[slot].normalized.clone();
			let owner = index.entries[slot].identifier;
			let declared: Vec<String> = index.entries[slot]
				.record
				.aliases()
				.iter()
				.map(|a| normalize(a))
				.collect();
			for alias in declared {
				index.bind_alias(alias, target.clone(), owner, &mut stats);
			}
		}

		for (alias, canonical) in extra_aliases {
			let canonical = normalize(&canonical);
			if !index.by_name.contains_key(canonical.as_str()) {
				debug!(registry = label, alias = %alias, target = %canonical, "dropping dangling alias");
				index.conflicts.push(NameConflict {
					key: normalize(&alias),
					kind: ConflictKind::DanglingAlias { target: canonical },
				});
				stats.conflicts += 1;
				continue;
			}
			let owner = index.entries[index.by_name[canonical.as_str()]].identifier;
			index.bind_alias(normalize(&alias), canonical.into(), owner, &mut stats);
		}

		index.rebuild_prefixes();
		index.stats = stats;

		debug!(
			registry = label,
			indexed = stats.indexed,
			skipped = stats.skipped,
			shadowed = stats.shadowed,
			conflicts = stats.conflicts,
			"name index built"
		);
		index
	}

	fn insert_record(&mut self, record: T, config: &IndexConfig, stats: &mut BuildStats) {
		let normalized = normalize(record.name());
		if normalized.is_empty() || char_len(&normalized) < config.min_name_len {
			debug!(
				registry = self.label,
				id = %record.identifier(),
				name = record.name(),
				"skipping unindexable name"
			);
			stats.skipped += 1;
			return;
		}

		let slot = self.entries.len();
		let identifier = record.identifier();
		let primary = record.is_primary();

		match self.by_name.entry(normalized.as_str().into()) {
			Slot::Vacant(v) => {
				v.insert(slot);
			}
			Slot::Occupied(mut o) => {
				let holder = &self.entries[*o.get()];
				if primary && holder.primary {
					let policy = config.duplicate_policy;
					let (winner, loser) = if policy.incoming_wins(holder.identifier, identifier) {
						o.insert(slot);
						(identifier, holder.identifier)
					} else {
						(holder.identifier, identifier)
					};
					warn!(
						registry = self.label,
						name = %normalized,
						%winner,
						%loser,
						%policy,
						"duplicate primary name"
					);
					self.conflicts.push(NameConflict {
						key: normalized.clone(),
						kind: ConflictKind::DuplicatePrimary {
							winner,
							loser,
							policy,
						},
					});
					stats.conflicts += 1;
				} else if primary {
					o.insert(slot);
					stats.shadowed += 1;
				} else {
					stats.shadowed += 1;
				}
			}
		}

		self.entries.push(Entry {
			raw_name: record.name().into(),
			normalized: normalized.into(),
			identifier,
			category: record.category(),
			primary,
			record,
		});
		stats.indexed += 1;
	}

	fn bind_alias(
		&mut self,
		alias: String,
		target: Box<str>,
		owner: RecordId,
		stats: &mut BuildStats,
	) {
		if alias.is_empty() || *alias == *target {
			return;
		}
		if self.by_name.contains_key(alias.as_str()) {
			self.conflicts.push(NameConflict {
				key: alias,
				kind: ConflictKind::AliasShadowsName { alias_of: owner },
			});
			stats.conflicts += 1;
			return;
		}
		match self.aliases.entry(alias.as_str().into()) {
			Slot::Vacant(v) => {
				v.insert(target);
				stats.aliases += 1;
			}
			Slot::Occupied(o) if *o.get() == target => {}
			Slot::Occupied(o) => {
				self.conflicts.push(NameConflict {
					key: alias,
					kind: ConflictKind::DuplicateAlias {
						kept: o.get().to_string(),
						dropped: target.into(),
					},
				});
				stats.conflicts += 1;
			}
		}
	}

	fn rebuild_prefixes(&mut self) {
		let mut by_prefix: FxHashMap<Box<str>, Bucket> = FxHashMap::default();
		for (slot, entry) in self.entries.iter().enumerate() {
			by_prefix
				.entry(prefix_key(&entry.normalized).into())
				.or_default()
				.push(slot);
		}
		self.by_prefix = by_prefix;
	}
}
