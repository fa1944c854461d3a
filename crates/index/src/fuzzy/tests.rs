use proptest::prelude::*;
use rstest::rstest;

use super::*;
use crate::index::IndexConfig;
use crate::record::RecordId;
use crate::test_fixtures::{Rec, primary, rec, with_alias, with_category};

fn catalog() -> NameIndex<Rec> {
	NameIndex::build(
		"test",
		vec![
			rec("Apple Cabbage Stew", 1),
			rec("Apple Pie", 2),
			rec("Cabbage", 3),
			rec("Beef Stew", 4),
			rec("Vegetable Soup", 5),
			with_alias(rec("Sweetroll", 6), "sweet roll"),
			rec("Iron Ingot", 7),
			rec("Iron Dagger", 8),
		],
		&IndexConfig::default(),
	)
}

fn resolve(index: &NameIndex<Rec>, query: &str) -> Option<(RecordId, MatchStage)> {
	FuzzyResolver::default()
		.resolve(index, query, None)
		.map(|m| (index.entry(m.slot).unwrap().identifier, m.stage))
}

#[rstest]
#[case::exact("cabbage", 3, MatchStage::Exact)]
#[case::exact_folds_case("APPLE pie", 2, MatchStage::Exact)]
#[case::alias("Sweet Roll", 6, MatchStage::Alias)]
#[case::prefix_prefers_shortest("apple", 2, MatchStage::Prefix)]
#[case::prefix_short_query("ir", 7, MatchStage::Prefix)]
#[case::contains("cabbage stew", 1, MatchStage::Contains)]
#[case::contains_boundary("stew", 4, MatchStage::Contains)]
#[case::word_set("stew cabbage apple", 1, MatchStage::WordSet)]
#[case::levenshtein("aple cabage stew", 1, MatchStage::Levenshtein)]
#[case::levenshtein_single("cabage", 3, MatchStage::Levenshtein)]
#[case::word_levenshtein("stw cabbag aple", 1, MatchStage::WordLevenshtein)]
fn test_cascade_stage(#[case] query: &str, #[case] id: u32, #[case] stage: MatchStage) {
	let index = catalog();
	assert_eq!(resolve(&index, query), Some((RecordId(id), stage)), "query {query:?}");
}

#[rstest]
#[case("xyzxyz")]
#[case("")]
#[case("   ")]
#[case("zzzz qqqq")]
fn test_no_match_is_none(#[case] query: &str) {
	assert_eq!(resolve(&catalog(), query), None);
}

/// "stew" sits after a space in both stews; the shorter name loses less to the length
/// penalty.
#[test]
fn test_contains_score_components() {
	let index = catalog();
	let m = FuzzyResolver::default().resolve(&index, "stew", None).unwrap();
	assert_eq!(m.stage, MatchStage::Contains);
	assert_eq!(m.score, 100 + 30 - ("beef stew".len() as i32 - 4));
}

#[test]
fn test_contains_ties_go_to_first_scanned() {
	let index = NameIndex::build(
		"test",
		vec![rec("red bowl", 1), rec("big bowl", 2)],
		&IndexConfig::default(),
	);
	assert_eq!(resolve(&index, "bowl"), Some((RecordId(1), MatchStage::Contains)));
}

#[test]
fn test_levenshtein_prefers_lower_distance_then_shorter() {
	let index = NameIndex::build(
		"test",
		vec![rec("mages", 1), rec("mage", 2), rec("magex", 3)],
		&IndexConfig::default(),
	);
	// "magi" is one edit from "mage" and two from the others.
	assert_eq!(resolve(&index, "magi"), Some((RecordId(2), MatchStage::Levenshtein)));
}

#[test]
fn test_length_window_excludes_far_candidates() {
	let index = NameIndex::build("test", vec![rec("abcdefgh", 1)], &IndexConfig::default());
	// Two insertions away, so only a window of at least two admits it.
	let tight = FuzzyResolver::new(FuzzyConfig {
		length_tolerance: 1,
		..FuzzyConfig::default()
	});
	assert!(tight.resolve(&index, "abcdefghij", None).is_none());
	let m = FuzzyResolver::default()
		.resolve(&index, "abcdefghij", None)
		.unwrap();
	assert_eq!((m.stage, m.score), (MatchStage::Levenshtein, 2));
}

#[test]
fn test_category_filter_restricts_every_stage() {
	let index = NameIndex::build(
		"test",
		vec![
			with_category(rec("Nightshade", 1), Category::INGREDIENT),
			with_category(rec("Nightshade", 2), Category::SPELL),
		],
		&IndexConfig::default(),
	);
	let resolver = FuzzyResolver::default();

	let m = resolver
		.resolve(&index, "nightshade", Some(Category::SPELL))
		.unwrap();
	assert_eq!(index.entry(m.slot).unwrap().identifier, RecordId(2));
	// The exact slot belongs to the ingredient, so the spell surfaces through prefix.
	assert_eq!(m.stage, MatchStage::Prefix);

	assert!(
		resolver
			.resolve(&index, "nightshade", Some(Category::RECIPE))
			.is_none()
	);
}

#[test]
fn test_duplicate_loser_still_reachable_by_fuzzy_stage() {
	let index = NameIndex::build(
		"test",
		vec![
			with_category(primary("Bob", 100), Category::OTHER),
			with_category(primary("Bob", 5), Category::CHARACTER),
		],
		&IndexConfig::default(),
	);
	let m = FuzzyResolver::default()
		.resolve(&index, "bob", Some(Category::OTHER))
		.unwrap();
	assert_eq!(index.entry(m.slot).unwrap().identifier, RecordId(100));
}

#[test]
fn test_suggest_orders_containment_before_typos() {
	let index = catalog();
	let suggestions = FuzzyResolver::default().suggest(&index, "stew", None, 5);
	let ids: Vec<u32> = suggestions
		.iter()
		.map(|s| index.entry(s.slot).unwrap().identifier.0)
		.collect();
	assert_eq!(ids, vec![4, 1]);
	assert!(suggestions.iter().all(|s| s.stage == MatchStage::Contains));

	assert!(FuzzyResolver::default().suggest(&index, "stew", None, 0).is_empty());
}

fn name_strategy() -> impl Strategy<Value = String> {
	"[a-z]{2,8}( [a-z]{2,8}){0,2}"
}

proptest! {
	/// A query equal to an indexed name always resolves exactly, whatever else matches.
	#[test]
	fn prop_exact_match_has_priority(names in proptest::collection::vec(name_strategy(), 1..12), pick in 0usize..12) {
		let records: Vec<Rec> = names
			.iter()
			.enumerate()
			.map(|(i, n)| rec(n, i as u32))
			.collect();
		let index = NameIndex::build("prop", records, &IndexConfig::default());
		let query = &names[pick % names.len()];
		let m = FuzzyResolver::default().resolve(&index, query, None).unwrap();
		prop_assert_eq!(m.stage, MatchStage::Exact);
		prop_assert_eq!(&*index.entry(m.slot).unwrap().normalized, query.as_str());
	}

	/// Whole-name typo matches respect the distance ceiling and the length window.
	#[test]
	fn prop_levenshtein_bounds(names in proptest::collection::vec(name_strategy(), 1..12), query in name_strategy()) {
		let records: Vec<Rec> = names
			.iter()
			.enumerate()
			.map(|(i, n)| rec(n, i as u32))
			.collect();
		let index = NameIndex::build("prop", records, &IndexConfig::default());
		if let Some(m) = FuzzyResolver::default().resolve(&index, &query, None)
			&& m.stage == MatchStage::Levenshtein
		{
			let name = &index.entry(m.slot).unwrap().normalized;
			prop_assert!(strsim::levenshtein(&query, name) <= 2);
			prop_assert!(name.chars().count().abs_diff(query.chars().count()) <= 3);
		}
	}
}
