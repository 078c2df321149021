use super::{nether, overworld};
use crate::host::{ItemHost, WorldHost};
use crate::item_tracker::ItemEntityTracker;
use crate::settings::ItemTrackerSettings;
use crate::sim::MemoryWorld;
use crate::types::{ItemKind, Position};
use crate::ItemEntity;
use std::collections::BTreeSet;
use std::sync::Arc;

const LOG: &str = "minecraft:oak_log";
const STONE: &str = "minecraft:stone";

fn tracker_with(configure: impl FnOnce(&mut ItemTrackerSettings)) -> ItemEntityTracker {
    let mut settings = ItemTrackerSettings::default();
    configure(&mut settings);
    ItemEntityTracker::new(settings)
}

fn quantity(host: &MemoryWorld, item: &ItemEntity) -> u32 {
    host.item(item.id).map(|item| item.quantity).unwrap_or_default()
}

#[test]
fn nearby_compatible_drop_is_absorbed() {
    let host = MemoryWorld::new();
    let tracker = ItemEntityTracker::default();
    let world = overworld();

    let a = host.spawn_item(LOG, 10, Position::new(0.0, 64.0, 0.0));
    let b = host.spawn_item(LOG, 5, Position::new(1.0, 64.0, 1.0));

    assert!(!tracker.on_enter(&host, &a, &world));
    assert!(tracker.on_enter(&host, &b, &world));

    assert_eq!(quantity(&host, &a), 15);
    assert!(!host.is_present(b.id));
    assert_eq!(tracker.tracked_of_kind(&world, &ItemKind::new(LOG)), 1);
    assert_eq!(tracker.tracked_in_world(&world), 1);
    assert_eq!(tracker.stats().merged, 1);
}

#[test]
fn pair_filling_the_stack_exactly_merges() {
    let host = MemoryWorld::new();
    let tracker = ItemEntityTracker::default();
    let world = overworld();

    let a = host.spawn_item(LOG, 60, Position::new(0.0, 64.0, 0.0));
    let b = host.spawn_item(LOG, 4, Position::new(0.5, 64.0, 0.5));

    assert!(!tracker.on_enter(&host, &a, &world));
    assert!(tracker.on_enter(&host, &b, &world));

    assert_eq!(quantity(&host, &a), 64);
    assert!(!host.is_present(b.id));
    assert_eq!(tracker.tracked_of_kind(&world, &ItemKind::new(LOG)), 1);
}

#[test]
fn pair_overflowing_the_stack_is_left_alone() {
    let host = MemoryWorld::new();
    let tracker = ItemEntityTracker::default();
    let world = overworld();

    let a = host.spawn_item(LOG, 60, Position::new(0.0, 64.0, 0.0));
    let b = host.spawn_item(LOG, 5, Position::new(0.5, 64.0, 0.5));

    assert!(!tracker.on_enter(&host, &a, &world));
    assert!(!tracker.on_enter(&host, &b, &world));

    assert_eq!(quantity(&host, &a), 60);
    assert_eq!(quantity(&host, &b), 5);
    assert!(tracker.is_tracked(&world, b.id));
    assert_eq!(tracker.tracked_of_kind(&world, &ItemKind::new(LOG)), 2);
    assert_eq!(tracker.stats().merged, 0);
}

#[test]
fn configured_stack_size_bounds_merges() {
    let host = MemoryWorld::new();
    let tracker = tracker_with(|settings| settings.max_stack_size = 16);
    let world = overworld();

    let a = host.spawn_item(LOG, 10, Position::new(0.0, 64.0, 0.0));
    let b = host.spawn_item(LOG, 10, Position::new(0.0, 64.0, 0.0));
    let c = host.spawn_item(LOG, 6, Position::new(0.0, 64.0, 0.0));

    tracker.on_enter(&host, &a, &world);
    assert!(!tracker.on_enter(&host, &b, &world));
    assert!(tracker.on_enter(&host, &c, &world));

    assert_eq!(quantity(&host, &a), 16);
    assert_eq!(quantity(&host, &b), 10);
}

#[test]
fn overflowing_candidate_is_passed_over_for_the_next_one() {
    let host = MemoryWorld::new();
    let tracker = ItemEntityTracker::default();
    let world = overworld();

    let a = host.spawn_item(LOG, 60, Position::new(0.0, 64.0, 0.0));
    let c = host.spawn_item(LOG, 50, Position::new(0.0, 64.0, 0.0));
    tracker.on_enter(&host, &a, &world);
    assert!(!tracker.on_enter(&host, &c, &world));

    let b = host.spawn_item(LOG, 10, Position::new(0.0, 64.0, 0.0));
    assert!(tracker.on_enter(&host, &b, &world));

    assert_eq!(quantity(&host, &a), 60);
    assert_eq!(quantity(&host, &c), 60);
    assert!(!host.is_present(b.id));
    assert_eq!(tracker.tracked_in_world(&world), 2);
}

#[test]
fn full_candidates_are_skipped() {
    let host = MemoryWorld::new();
    let tracker = ItemEntityTracker::default();
    let world = overworld();

    let full = host.spawn_item(LOG, 64, Position::new(0.0, 64.0, 0.0));
    let b = host.spawn_item(LOG, 5, Position::new(0.0, 64.0, 0.0));

    tracker.on_enter(&host, &full, &world);
    assert!(!tracker.on_enter(&host, &b, &world));

    assert_eq!(quantity(&host, &full), 64);
    assert_eq!(quantity(&host, &b), 5);
    assert_eq!(tracker.tracked_in_world(&world), 2);
}

#[test]
fn different_kinds_and_worlds_never_merge() {
    let host = MemoryWorld::new();
    let tracker = ItemEntityTracker::default();

    let log = host.spawn_item(LOG, 5, Position::new(0.0, 64.0, 0.0));
    let stone = host.spawn_item(STONE, 5, Position::new(0.0, 64.0, 0.0));
    let other_world_log = host.spawn_item(LOG, 5, Position::new(0.0, 64.0, 0.0));

    assert!(!tracker.on_enter(&host, &log, &overworld()));
    assert!(!tracker.on_enter(&host, &stone, &overworld()));
    assert!(!tracker.on_enter(&host, &other_world_log, &nether()));

    assert_eq!(tracker.tracked_in_world(&overworld()), 2);
    assert_eq!(tracker.tracked_in_world(&nether()), 1);
}

#[test]
fn incompatible_stacks_are_not_merged() {
    struct PickyWorld(MemoryWorld);

    impl WorldHost for PickyWorld {
        fn can_see_sky(&self, world: &crate::WorldId, position: &Position) -> bool {
            self.0.can_see_sky(world, position)
        }
        fn move_to(&self, id: crate::EntityId, position: Position) -> Result<(), crate::MutationError> {
            self.0.move_to(id, position)
        }
        fn discard(&self, id: crate::EntityId) {
            self.0.discard(id)
        }
    }

    impl ItemHost for PickyWorld {
        fn item(&self, id: crate::EntityId) -> Option<ItemEntity> {
            self.0.item(id)
        }
        fn are_mergeable(&self, _: &ItemEntity, _: &ItemEntity) -> bool {
            false
        }
        fn set_quantity(&self, id: crate::EntityId, quantity: u32) -> Result<(), crate::MutationError> {
            self.0.set_quantity(id, quantity)
        }
    }

    let host = PickyWorld(MemoryWorld::new());
    let tracker = ItemEntityTracker::default();
    let world = overworld();

    let a = host.0.spawn_item(LOG, 5, Position::new(0.0, 64.0, 0.0));
    let b = host.0.spawn_item(LOG, 5, Position::new(0.0, 64.0, 0.0));
    tracker.on_enter(&host, &a, &world);

    assert!(!tracker.on_enter(&host, &b, &world));
    assert_eq!(tracker.tracked_in_world(&world), 2);
}

#[test]
fn open_sky_ignores_vertical_distance() {
    let host = MemoryWorld::new();
    let tracker = ItemEntityTracker::default();
    let world = overworld();

    let low = host.spawn_item(LOG, 5, Position::new(0.0, 64.0, 0.0));
    let high = host.spawn_item(LOG, 5, Position::new(0.0, 90.0, 0.0));

    tracker.on_enter(&host, &low, &world);
    assert!(tracker.on_enter(&host, &high, &world));
    assert_eq!(quantity(&host, &low), 10);
}

#[test]
fn covered_drops_need_vertical_proximity() {
    let host = MemoryWorld::new();
    let tracker = ItemEntityTracker::default();
    let world = overworld();
    host.set_roof(&world, Some(200.0));

    let low = host.spawn_item(LOG, 5, Position::new(0.0, 64.0, 0.0));
    let high = host.spawn_item(LOG, 5, Position::new(0.0, 90.0, 0.0));
    let close = host.spawn_item(LOG, 5, Position::new(0.0, 65.0, 0.0));

    tracker.on_enter(&host, &low, &world);
    assert!(!tracker.on_enter(&host, &high, &world));
    assert!(tracker.on_enter(&host, &close, &world));

    assert_eq!(quantity(&host, &low), 10);
    assert_eq!(tracker.tracked_in_world(&world), 2);
}

#[test]
fn untrackable_drops_are_ignored() {
    let host = MemoryWorld::new();
    let tracker = ItemEntityTracker::default();
    let world = overworld();

    let mut named = ItemEntity::new(host.next_entity_id(), LOG, 5, Position::default());
    named.custom_name = true;
    let air = ItemEntity::new(host.next_entity_id(), "minecraft:air", 1, Position::default());
    let legacy_air = ItemEntity::new(host.next_entity_id(), "block.minecraft.air", 1, Position::default());
    let blank = ItemEntity::new(host.next_entity_id(), " ", 1, Position::default());
    let integration = ItemEntity::new(host.next_entity_id(), "create:cogwheel", 1, Position::default());
    let mut removed = ItemEntity::new(host.next_entity_id(), LOG, 5, Position::default());
    removed.removed = true;

    for item in [named, air, legacy_air, blank, integration, removed] {
        host.insert_item(item.clone());
        assert!(!tracker.on_enter(&host, &item, &world));
        assert!(!tracker.is_tracked(&world, item.id));
    }
    assert_eq!(tracker.stats().filtered, 0);
}

#[test]
fn allow_list_takes_precedence_over_deny_list() {
    let host = MemoryWorld::new();
    let tracker = tracker_with(|settings| {
        settings.allow_list = BTreeSet::from(["A".to_string()]);
        settings.deny_list = BTreeSet::from(["A".to_string(), "B".to_string()]);
    });
    let world = overworld();

    let a = host.spawn_item("A", 1, Position::new(0.0, 0.0, 0.0));
    let b = host.spawn_item("B", 1, Position::new(10.0, 0.0, 0.0));
    let c = host.spawn_item("C", 1, Position::new(20.0, 0.0, 0.0));

    tracker.on_enter(&host, &a, &world);
    tracker.on_enter(&host, &b, &world);
    tracker.on_enter(&host, &c, &world);

    assert!(tracker.is_tracked(&world, a.id));
    assert!(!tracker.is_tracked(&world, b.id));
    assert!(!tracker.is_tracked(&world, c.id));
    assert_eq!(tracker.stats().filtered, 2);
}

#[test]
fn default_deny_list_skips_diamonds() {
    let host = MemoryWorld::new();
    let tracker = ItemEntityTracker::default();
    let world = overworld();

    let a = host.spawn_item("minecraft:diamond", 1, Position::default());
    let b = host.spawn_item("minecraft:diamond", 1, Position::default());

    assert!(!tracker.on_enter(&host, &a, &world));
    assert!(!tracker.on_enter(&host, &b, &world));
    assert_eq!(tracker.tracked_in_world(&world), 0);
    assert_eq!(quantity(&host, &a), 1);
}

#[test]
fn non_positive_radius_disables_merging_but_keeps_caps() {
    let host = MemoryWorld::new();
    let tracker = tracker_with(|settings| {
        settings.collect_radius = 0;
        settings.max_items_per_kind = 2;
    });
    let world = overworld();

    let drops: Vec<_> = (0..3)
        .map(|_| host.spawn_item(LOG, 1, Position::new(0.0, 64.0, 0.0)))
        .collect();
    for drop in &drops {
        assert!(!tracker.on_enter(&host, drop, &world));
    }

    assert_eq!(tracker.kind_snapshot(&world, &ItemKind::new(LOG)), vec![drops[1].id, drops[2].id]);
    assert!(!host.is_present(drops[0].id));
}

#[test]
fn kind_cap_evicts_the_oldest_drop_from_every_index() {
    let host = MemoryWorld::new();
    let tracker = tracker_with(|settings| settings.max_items_per_kind = 2);
    let world = overworld();

    let drops: Vec<_> = (0..3)
        .map(|i| host.spawn_item(LOG, 1, Position::new(f64::from(i) * 20.0, 64.0, 0.0)))
        .collect();
    for drop in &drops {
        tracker.on_enter(&host, drop, &world);
    }

    assert!(!host.is_present(drops[0].id));
    assert!(host.is_present(drops[1].id));
    assert!(host.is_present(drops[2].id));
    assert!(!tracker.is_tracked(&world, drops[0].id));
    assert_eq!(tracker.world_snapshot(&world), vec![drops[1].id, drops[2].id]);
    assert_eq!(tracker.stats().evicted, 1);
}

#[test]
fn world_cap_evicts_across_kinds() {
    let host = MemoryWorld::new();
    let tracker = tracker_with(|settings| settings.max_items_per_world = 2);
    let world = overworld();

    let kinds = ["minecraft:dirt", "minecraft:sand", "minecraft:gravel"];
    let drops: Vec<_> = kinds
        .iter()
        .enumerate()
        .map(|(i, kind)| host.spawn_item(*kind, 1, Position::new(i as f64 * 20.0, 64.0, 0.0)))
        .collect();
    for drop in &drops {
        tracker.on_enter(&host, drop, &world);
    }

    assert!(!host.is_present(drops[0].id));
    assert_eq!(tracker.tracked_of_kind(&world, &ItemKind::new(kinds[0])), 0);
    assert_eq!(tracker.tracked_of_kind(&world, &ItemKind::new(kinds[1])), 1);
    assert_eq!(tracker.tracked_of_kind(&world, &ItemKind::new(kinds[2])), 1);
    assert_eq!(tracker.tracked_in_world(&world), 2);
}

#[test]
fn repeated_entry_is_indexed_once() {
    let host = MemoryWorld::new();
    let tracker = ItemEntityTracker::default();
    let world = overworld();

    let a = host.spawn_item(LOG, 5, Position::default());
    assert!(!tracker.on_enter(&host, &a, &world));
    assert!(!tracker.on_enter(&host, &a, &world));

    assert_eq!(tracker.tracked_in_world(&world), 1);
    assert_eq!(tracker.tracked_of_kind(&world, &ItemKind::new(LOG)), 1);
    assert_eq!(quantity(&host, &a), 5);
}

#[test]
fn leave_removes_from_both_indices() {
    let host = MemoryWorld::new();
    let tracker = ItemEntityTracker::default();
    let world = overworld();

    let a = host.spawn_item(LOG, 5, Position::default());
    tracker.on_enter(&host, &a, &world);
    tracker.on_leave(&a, &world);

    assert_eq!(tracker.tracked_in_world(&world), 0);
    assert_eq!(tracker.tracked_of_kind(&world, &ItemKind::new(LOG)), 0);
}

#[test]
fn leave_of_absorbed_drop_keeps_survivor_indexed() {
    let host = MemoryWorld::new();
    let tracker = ItemEntityTracker::default();
    let world = overworld();

    let a = host.spawn_item(LOG, 10, Position::new(0.0, 64.0, 0.0));
    let b = host.spawn_item(LOG, 5, Position::new(1.0, 64.0, 1.0));
    tracker.on_enter(&host, &a, &world);
    assert!(tracker.on_enter(&host, &b, &world));

    let absorbed = host.item(b.id).expect("absorbed drop is still known to the host");
    tracker.on_leave(&absorbed, &world);
    tracker.on_leave(&b, &world);

    assert!(tracker.is_tracked(&world, a.id));
    assert_eq!(tracker.tracked_of_kind(&world, &ItemKind::new(LOG)), 1);
    assert_eq!(quantity(&host, &a), 15);
}

#[test]
fn leave_releases_drops_denied_after_entry() {
    let host = MemoryWorld::new();
    let tracker = ItemEntityTracker::default();
    let world = overworld();

    let a = host.spawn_item(LOG, 5, Position::default());
    tracker.on_enter(&host, &a, &world);

    let mut settings = (*tracker.settings()).clone();
    settings.deny_list.insert(LOG.to_string());
    tracker.update_settings(settings);
    tracker.on_leave(&a, &world);

    assert!(!tracker.is_tracked(&world, a.id));
    assert_eq!(tracker.tracked_of_kind(&world, &ItemKind::new(LOG)), 0);
}

#[test]
fn leave_of_untracked_drop_is_harmless() {
    let tracker = ItemEntityTracker::default();
    let world = overworld();
    let stray = ItemEntity::new(crate::EntityId(999), LOG, 1, Position::default());

    tracker.on_leave(&stray, &world);

    assert_eq!(tracker.tracked_in_world(&world), 0);
}

#[test]
fn sweep_reclaims_silently_despawned_drops_and_is_idempotent() {
    let host = MemoryWorld::new();
    let tracker = tracker_with(|settings| settings.verification_cycle = 0);
    let world = overworld();

    let a = host.spawn_item(LOG, 1, Position::new(0.0, 64.0, 0.0));
    let b = host.spawn_item(STONE, 1, Position::new(40.0, 64.0, 0.0));
    tracker.on_enter(&host, &a, &world);
    tracker.on_enter(&host, &b, &world);

    host.despawn_silently(a.id);
    let first = tracker.verify(&host);
    let second = tracker.verify(&host);

    assert_eq!(first.world_removed, 1);
    assert_eq!(first.kind_removed, 1);
    assert!(second.is_empty());
    assert!(!tracker.is_tracked(&world, a.id));
    assert!(tracker.is_tracked(&world, b.id));
}

#[test]
fn sweep_reclaims_drops_the_host_forgot() {
    let host = MemoryWorld::new();
    let tracker = ItemEntityTracker::default();
    let world = overworld();

    let a = host.spawn_item(LOG, 1, Position::default());
    tracker.on_enter(&host, &a, &world);
    host.forget(a.id);

    assert_eq!(tracker.verify(&host).world_removed, 1);
    assert_eq!(tracker.tracked_in_world(&world), 0);
}

#[test]
fn verification_runs_on_its_cycle() {
    let host = MemoryWorld::new();
    let tracker = tracker_with(|settings| settings.verification_cycle = 2);
    let world = overworld();

    let a = host.spawn_item(LOG, 1, Position::new(0.0, 64.0, 0.0));
    tracker.on_enter(&host, &a, &world);
    host.despawn_silently(a.id);
    assert!(tracker.is_tracked(&world, a.id));

    let b = host.spawn_item(LOG, 1, Position::new(50.0, 64.0, 0.0));
    tracker.on_enter(&host, &b, &world);

    assert!(!tracker.is_tracked(&world, a.id));
    assert!(tracker.is_tracked(&world, b.id));
    assert_eq!(tracker.stats().sweeps, 1);
}

#[test]
fn failed_quantity_update_falls_back_to_moving_closer() {
    let host = MemoryWorld::new();
    let tracker = ItemEntityTracker::default();
    let world = overworld();

    let a = host.spawn_item(LOG, 10, Position::new(0.0, 64.0, 0.0));
    tracker.on_enter(&host, &a, &world);

    host.set_fail_mutations(true);
    let b = host.spawn_item(LOG, 5, Position::new(1.0, 64.0, 1.0));
    let c = host.spawn_item(LOG, 5, Position::new(1.5, 64.0, 0.5));

    assert!(!tracker.on_enter(&host, &b, &world));
    assert!(!tracker.on_enter(&host, &c, &world));

    assert_eq!(quantity(&host, &a), 10);
    assert_eq!(quantity(&host, &b), 5);
    assert_eq!(host.item(b.id).map(|item| item.position), Some(a.position));
    assert!(tracker.is_tracked(&world, b.id));
    assert!(tracker.is_tracked(&world, c.id));
    assert_eq!(tracker.stats().mutation_failures, 2);
}

#[test]
fn survivor_moves_toward_last_drop_when_enabled() {
    let host = MemoryWorld::new();
    let tracker = tracker_with(|settings| settings.move_position_to_last_drop = true);
    let world = overworld();

    let a = host.spawn_item(LOG, 1, Position::new(0.0, 64.0, 0.0));
    let b = host.spawn_item(LOG, 1, Position::new(2.0, 66.0, 0.0));
    tracker.on_enter(&host, &a, &world);
    assert!(tracker.on_enter(&host, &b, &world));

    assert_eq!(host.item(a.id).map(|item| item.position), Some(Position::new(0.5, 64.0, 0.0)));
}

#[test]
fn settings_reload_applies_to_the_next_event() {
    let host = MemoryWorld::new();
    let tracker = ItemEntityTracker::default();
    let world = overworld();

    let a = host.spawn_item(LOG, 1, Position::new(0.0, 64.0, 0.0));
    tracker.on_enter(&host, &a, &world);

    let mut settings = (*tracker.settings()).clone();
    settings.collect_radius = 0;
    tracker.update_settings(settings);

    let b = host.spawn_item(LOG, 1, Position::new(0.0, 64.0, 0.0));
    assert!(!tracker.on_enter(&host, &b, &world));
    assert_eq!(tracker.tracked_in_world(&world), 2);
}

#[test]
fn concurrent_worlds_are_tracked_independently() {
    let host = Arc::new(MemoryWorld::new());
    let tracker = Arc::new(ItemEntityTracker::default());

    std::thread::scope(|scope| {
        for w in 0..4 {
            let host = Arc::clone(&host);
            let tracker = Arc::clone(&tracker);
            scope.spawn(move || {
                let world = crate::WorldId::new(format!("world_{w}"));
                for i in 0..50 {
                    let drop = host.spawn_item(LOG, 1, Position::new(f64::from(i) * 10.0, 64.0, 0.0));
                    tracker.on_enter(host.as_ref(), &drop, &world);
                }
            });
        }
    });

    for w in 0..4 {
        let world = crate::WorldId::new(format!("world_{w}"));
        assert_eq!(tracker.tracked_in_world(&world), 32);
    }
    assert_eq!(tracker.stats().evicted, 4 * 18);
}
