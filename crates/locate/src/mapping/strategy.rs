use waymark_index::RecordId;

use super::{MappingResolver, Provenance, Target};
use crate::ids::RegionId;
use crate::scorer::ScoreContext;
use crate::world::{InstanceInfo, PlacementHints};

/// Selects the live instance at most once per attempt, on first use.
#[derive(Default)]
pub(super) struct LiveLookup {
	selected: Option<Option<InstanceInfo>>,
}

impl LiveLookup {
	fn get(
		&mut self,
		resolver: &MappingResolver<'_>,
		logical: RecordId,
		hints: Option<&PlacementHints>,
	) -> Option<&InstanceInfo> {
		self.selected
			.get_or_insert_with(|| {
				let candidates = resolver.world.instances(logical);
				if candidates.is_empty() {
					return None;
				}
				let ctx = ScoreContext {
					expected_container: hints.and_then(|h| h.origin_container.or(h.alternate_container)),
					directory: resolver.directory,
				};
				resolver
					.scorer
					.select(logical, &candidates, &ctx)
					.map(|s| s.instance)
			})
			.as_ref()
	}
}

impl MappingResolver<'_> {
	pub(super) fn run(
		&self,
		provenance: Provenance,
		logical: RecordId,
		hints: Option<&PlacementHints>,
		live: &mut LiveLookup,
	) -> Option<Target> {
		match provenance {
			Provenance::OriginPlacement => hints?.origin_container.map(Target::Container),
			Provenance::CurrentContainer => live
				.get(self, logical, hints)
				.filter(|i| i.active)
				.and_then(|i| i.container)
				.map(Target::Container),
			Provenance::PersistedContainer => {
				if !self.world.state_loaded() {
					return None;
				}
				live
					.get(self, logical, hints)
					.and_then(|i| i.persisted_container)
					.map(Target::Container)
			}
			Provenance::AlternateContainer => hints?.alternate_container.map(Target::Container),
			Provenance::CurrentRegion => live
				.get(self, logical, hints)
				.and_then(|i| i.current_region)
				.map(Target::Region),
			Provenance::DeclaredRegion => hints?.declared_region.map(Target::Region),
			Provenance::ScheduleDerived => mine_schedule(&hints?.schedule_regions).map(Target::Region),
		}
	}
}

/// Most frequent region; ties go to the one mentioned first.
pub(super) fn mine_schedule(regions: &[RegionId]) -> Option<RegionId> {
	let mut counts: Vec<(RegionId, usize)> = Vec::new();
	for &region in regions {
		match counts.iter_mut().find(|(id, _)| *id == region) {
			Some((_, n)) => *n += 1,
			None => counts.push((region, 1)),
		}
	}
	counts
		.into_iter()
		.fold(None, |best: Option<(RegionId, usize)>, (region, n)| match best {
			Some((_, best_n)) if best_n >= n => best,
			_ => Some((region, n)),
		})
		.map(|(region, _)| region)
}
