//! Duplicate-name vocabulary and the policy that settles primary-name conflicts.

use serde::{Deserialize, Serialize};

use crate::record::RecordId;

/// Settles which of two primary records sharing a normalized name owns the exact slot.
///
/// The loser stays in the entry table and remains reachable through the fuzzy stages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
	/// The numerically lower identifier is treated as the original record.
	#[default]
	LowerIdWins,
	HigherIdWins,
	/// Keep the first record seen for a name.
	FirstWins,
	/// Overwrite with the last record seen.
	LastWins,
}

impl DuplicatePolicy {
	/// Returns true when `incoming` should take the slot held by `existing`.
	///
	/// Equal identifiers never displace under the id-ordered policies.
	#[inline]
	pub fn incoming_wins(self, existing: RecordId, incoming: RecordId) -> bool {
		match self {
			Self::LowerIdWins => incoming < existing,
			Self::HigherIdWins => incoming > existing,
			Self::FirstWins => false,
			Self::LastWins => true,
		}
	}
}

impl std::fmt::Display for DuplicatePolicy {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::LowerIdWins => write!(f, "lower-id-wins"),
			Self::HigherIdWins => write!(f, "higher-id-wins"),
			Self::FirstWins => write!(f, "first-wins"),
			Self::LastWins => write!(f, "last-wins"),
		}
	}
}

/// A conflict observed while building one generation. Diagnostic only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameConflict {
	/// Normalized key that conflicted.
	pub key: String,
	pub kind: ConflictKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictKind {
	/// Two primary records share a name; `winner` owns the exact slot.
	DuplicatePrimary {
		winner: RecordId,
		loser: RecordId,
		policy: DuplicatePolicy,
	},
	/// An alias equals an indexed name; the name keeps the key.
	AliasShadowsName { alias_of: RecordId },
	/// Two aliases share a key; the first binding is kept.
	DuplicateAlias { kept: String, dropped: String },
	/// An alias points at a name that is not indexed.
	DanglingAlias { target: String },
}
