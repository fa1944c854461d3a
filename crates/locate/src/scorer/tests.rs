use rstest::rstest;

use super::*;
use crate::ids::{Position, RegionId};
use crate::test_fixtures::live;
use crate::world::ContainerInfo;

fn directory() -> ContainerDirectory {
	ContainerDirectory::build(
		vec![
			ContainerInfo::new(ContainerId(1), "Dragonsreach"),
			ContainerInfo::new(ContainerId(2), "").placeholder(),
		],
		Vec::new(),
		Vec::new(),
	)
}

fn ctx(dir: &ContainerDirectory) -> ScoreContext<'_> {
	ScoreContext {
		expected_container: None,
		directory: dir,
	}
}

#[test]
fn test_active_named_instance_beats_disabled_one() {
	let dir = directory();
	let scorer = CandidateScorer::new();
	let logical = RecordId(42);
	let a = InstanceInfo {
		disabled: true,
		..live(1, 42, ContainerId(2))
	};
	let b = live(2, 42, ContainerId(1));

	let first = scorer.select(logical, &[a.clone(), b.clone()], &ctx(&dir)).unwrap();
	assert_eq!(first.instance.id, InstanceId(2));
	assert!(!first.from_cache);
	assert_eq!(
		first.score,
		Some(weights::ACTIVE + weights::HAS_CONTAINER + weights::NAMED_CONTAINER)
	);

	let passes = scorer.scoring_passes();
	let again = scorer.select(logical, &[a, b], &ctx(&dir)).unwrap();
	assert_eq!(again.instance.id, InstanceId(2));
	assert!(again.from_cache);
	assert_eq!(again.score, None);
	assert_eq!(scorer.scoring_passes(), passes, "cache hit must skip scoring");
	assert_eq!(scorer.cache_hits(), 1);
}

#[test]
fn test_cached_pick_dropped_when_no_longer_usable() {
	let dir = directory();
	let scorer = CandidateScorer::new();
	let logical = RecordId(7);
	let a = live(1, 7, ContainerId(1));
	let b = live(2, 7, ContainerId(2));
	assert_eq!(
		scorer.select(logical, &[a.clone(), b.clone()], &ctx(&dir)).unwrap().instance.id,
		InstanceId(1)
	);

	let a_disabled = InstanceInfo { disabled: true, ..a };
	let next = scorer.select(logical, &[a_disabled, b], &ctx(&dir)).unwrap();
	assert_eq!(next.instance.id, InstanceId(2));
	assert!(!next.from_cache);
	assert_eq!(scorer.known_good(logical), Some(InstanceId(2)));
}

#[test]
fn test_previous_pick_keeps_known_good_signal_when_rescored() {
	let dir = directory();
	let scorer = CandidateScorer::new();
	let logical = RecordId(9);
	let a = InstanceInfo {
		has_placement_ref: true,
		persisted_container: Some(ContainerId(1)),
		current_region: Some(RegionId(4)),
		declared_region: Some(RegionId(4)),
		..live(1, 9, ContainerId(1))
	};
	assert_eq!(
		scorer.select(logical, &[a.clone()], &ctx(&dir)).unwrap().instance.id,
		InstanceId(1)
	);

	// Disabled, the old pick scores 60 on its own and 70 with the known-good signal.
	let a_disabled = InstanceInfo { disabled: true, ..a };
	let b = InstanceInfo {
		active: true,
		current_region: Some(RegionId(4)),
		position: Position::new(5.0, 5.0, 5.0),
		..InstanceInfo::new(InstanceId(2), logical)
	};
	assert_eq!(scorer.score(&a_disabled, &ctx(&dir), None).total, 60);
	assert_eq!(scorer.score(&b, &ctx(&dir), None).total, 65);

	let next = scorer.select(logical, &[a_disabled, b], &ctx(&dir)).unwrap();
	assert_eq!(next.instance.id, InstanceId(1));
	assert_eq!(next.score, Some(70));
	assert!(!next.from_cache);
}

#[test]
fn test_stale_pick_forgotten_when_nothing_survives() {
	let dir = directory();
	let scorer = CandidateScorer::new();
	let logical = RecordId(3);
	let a = live(1, 3, ContainerId(1));
	scorer.select(logical, &[a.clone()], &ctx(&dir)).unwrap();

	let gone = InstanceInfo { deleted: true, ..a };
	assert!(scorer.select(logical, &[gone], &ctx(&dir)).is_none());
	assert_eq!(scorer.known_good(logical), None);
}

#[rstest]
#[case::deleted(InstanceInfo { deleted: true, ..live(1, 1, ContainerId(1)) }, Disqualification::Deleted)]
#[case::decoy(InstanceInfo { decoy: true, ..live(1, 1, ContainerId(1)) }, Disqualification::Decoy)]
#[case::clone(InstanceInfo { clone: true, ..live(1, 1, ContainerId(1)) }, Disqualification::Clone)]
fn test_disqualified_candidates_never_selected(
	#[case] candidate: InstanceInfo,
	#[case] reason: Disqualification,
) {
	let dir = directory();
	let scorer = CandidateScorer::new();
	let score = scorer.score(&candidate, &ctx(&dir), None);
	assert_eq!(score.disqualified, Some(reason));
	assert!(scorer.select(RecordId(1), &[candidate], &ctx(&dir)).is_none());
}

#[test]
fn test_deleted_score_ignores_other_signals() {
	let dir = directory();
	let candidate = InstanceInfo {
		deleted: true,
		has_placement_ref: true,
		persisted_container: Some(ContainerId(1)),
		..live(1, 1, ContainerId(1))
	};
	let score = CandidateScorer::new().score(&candidate, &ctx(&dir), Some(InstanceId(1)));
	assert_eq!(score.total, weights::DELETED);
}

#[test]
fn test_every_signal_adds_up() {
	let dir = directory();
	let candidate = InstanceInfo {
		has_placement_ref: true,
		persisted_container: Some(ContainerId(1)),
		current_region: Some(RegionId(3)),
		declared_region: Some(RegionId(3)),
		..live(5, 1, ContainerId(1))
	};
	let context = ScoreContext {
		expected_container: Some(ContainerId(1)),
		directory: &dir,
	};
	let score = CandidateScorer::new().score(&candidate, &context, Some(InstanceId(5)));
	assert_eq!(score.total, 50 + 30 + 25 + 20 + 10 + 20 + 15 + 15 + 10);
}

#[test]
fn test_origin_position_is_penalized() {
	let dir = directory();
	let at_origin = InstanceInfo {
		position: Position::default(),
		..live(1, 1, ContainerId(2))
	};
	let placed = live(2, 1, ContainerId(2));
	let ranked = CandidateScorer::new().rank(RecordId(1), &[at_origin, placed], &ctx(&dir));
	assert_eq!(ranked[0].instance, InstanceId(2));
	assert_eq!(ranked[0].total - ranked[1].total, -weights::AT_ORIGIN);
}

#[test]
fn test_ties_order_by_instance_id() {
	let dir = directory();
	let ranked = CandidateScorer::new().rank(
		RecordId(1),
		&[live(9, 1, ContainerId(1)), live(3, 1, ContainerId(1))],
		&ctx(&dir),
	);
	let order: Vec<InstanceId> = ranked.iter().map(|s| s.instance).collect();
	assert_eq!(order, vec![InstanceId(3), InstanceId(9)]);
}
