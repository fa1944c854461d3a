use crate::record::{CatalogRecord, Category, RecordId};

#[derive(Debug, Clone)]
pub(crate) struct Rec {
	pub name: String,
	pub id: RecordId,
	pub category: Category,
	pub primary: bool,
	pub aliases: Vec<String>,
}

impl CatalogRecord for Rec {
	fn name(&self) -> &str {
		&self.name
	}

	fn identifier(&self) -> RecordId {
		self.id
	}

	fn category(&self) -> Category {
		self.category
	}

	fn is_primary(&self) -> bool {
		self.primary
	}

	fn aliases(&self) -> &[String] {
		&self.aliases
	}
}

pub(crate) fn rec(name: &str, id: u32) -> Rec {
	Rec {
		name: name.to_string(),
		id: RecordId(id),
		category: Category::ITEM,
		primary: false,
		aliases: Vec::new(),
	}
}

pub(crate) fn primary(name: &str, id: u32) -> Rec {
	Rec {
		primary: true,
		category: Category::CHARACTER,
		..rec(name, id)
	}
}

pub(crate) fn with_category(mut r: Rec, category: Category) -> Rec {
	r.category = category;
	r
}

pub(crate) fn with_alias(mut r: Rec, alias: &str) -> Rec {
	r.aliases.push(alias.to_string());
	r
}
