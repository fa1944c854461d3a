use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of a catalog record.
///
/// Doubles as the logical id of physical records. Ordering is meaningful: the duplicate
/// policy compares identifiers numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u32);

impl fmt::Display for RecordId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:08X}", self.0)
	}
}

bitflags::bitflags! {
	/// Catalog membership of a record. A filter matches when the sets intersect.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
	pub struct Category: u32 {
		/// Characters and creatures.
		const CHARACTER = 1 << 0;
		/// Places, cells and regions.
		const PLACE = 1 << 1;
		/// Generic items.
		const ITEM = 1 << 2;
		/// Crafting and cooking recipes.
		const RECIPE = 1 << 3;
		const INGREDIENT = 1 << 4;
		const POTION = 1 << 5;
		const SPELL = 1 << 6;
		const OTHER = 1 << 31;
	}
}

impl Category {
	/// Returns true when `filter` is absent or shares a flag with `self`.
	#[inline]
	pub fn admits(self, filter: Option<Category>) -> bool {
		filter.is_none_or(|f| self.intersects(f))
	}
}

/// Contract every indexed catalog record satisfies.
///
/// This is the only place a catalog decides which string is its comparable name; the
/// index and the resolver are generic over it.
pub trait CatalogRecord: Send + Sync + 'static {
	/// Display name as authored.
	fn name(&self) -> &str;

	fn identifier(&self) -> RecordId;

	fn category(&self) -> Category {
		Category::empty()
	}

	/// Uniquely named records (as opposed to generic templates) take part in the
	/// duplicate policy.
	fn is_primary(&self) -> bool {
		false
	}

	/// Alternate names that resolve to this record's name.
	fn aliases(&self) -> &[String] {
		&[]
	}
}
