//! # Item Drop Tracker
//!
//! Indexes stackable item drops twice: per world (flat, for the world-wide
//! population cap) and per world and kind (for merge search and the per-kind
//! cap). Both indices preserve insertion order so eviction always hits the
//! oldest drop.
//!
//! ## Entry
//!
//! 1. Irrelevant drops (removed, custom-named, blank or air kind, excluded
//!    integration prefix) and filtered kinds are ignored.
//! 2. A drop that still has room on its stack is compared against a snapshot
//!    of its `(world, kind)` partition. The first compatible drop inside the
//!    merge box whose combined quantity fits the stack cap absorbs it; the
//!    incoming drop is discarded and the entry reports `true` so the host
//!    cancels the spawn.
//! 3. Otherwise the drop is indexed, evicting the oldest drop of the world and
//!    then of the kind when a cap is exceeded.
//! 4. Every accepted entry advances the verification counter; when it reaches
//!    the configured cycle, stale references are swept.

use crate::entity::ItemEntity;
use crate::error::MutationError;
use crate::host::ItemHost;
use crate::index::PartitionIndex;
use crate::latch::WarnOnce;
use crate::proximity::{self, MergeBox};
use crate::settings::ItemTrackerSettings;
use crate::stats::{TrackerStats, TrackerStatsSnapshot};
use crate::types::{EntityId, ItemKind, WorldId, LAST_DROP_BLEND};
use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Registry keys of the empty item.
const AIR_KINDS: [&str; 2] = ["minecraft:air", "block.minecraft.air"];

/// Key of the per-world, per-kind partition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemPartition {
    pub world: WorldId,
    pub kind: ItemKind,
}

impl ItemPartition {
    pub fn new(world: WorldId, kind: ItemKind) -> Self {
        Self { world, kind }
    }
}

/// What a verification sweep removed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    pub world_removed: usize,
    pub kind_removed: usize,
}

impl SweepReport {
    pub fn is_empty(&self) -> bool {
        self.world_removed == 0 && self.kind_removed == 0
    }
}

enum MergeOutcome {
    Absorbed,
    NotMerged,
}

/// Tracker for stackable item drops.
#[derive(Debug)]
pub struct ItemEntityTracker {
    settings: ArcSwap<ItemTrackerSettings>,
    /// All tracked drops of a world, each remembering its kind so a world-cap
    /// eviction can also clear the kind partition.
    by_world: PartitionIndex<WorldId, ItemKind>,
    by_kind: PartitionIndex<ItemPartition, ()>,
    verification_counter: AtomicU32,
    mutation_warning: WarnOnce,
    stats: TrackerStats,
}

impl Default for ItemEntityTracker {
    fn default() -> Self {
        Self::new(ItemTrackerSettings::default())
    }
}

impl ItemEntityTracker {
    pub fn new(settings: ItemTrackerSettings) -> Self {
        Self {
            settings: ArcSwap::from_pointee(settings),
            by_world: PartitionIndex::new(),
            by_kind: PartitionIndex::new(),
            verification_counter: AtomicU32::new(0),
            mutation_warning: WarnOnce::new(),
            stats: TrackerStats::default(),
        }
    }

    /// Current settings.
    pub fn settings(&self) -> Arc<ItemTrackerSettings> {
        self.settings.load_full()
    }

    /// Swaps in new settings; they apply from the next event on. Re-arms the
    /// mutation failure warning.
    pub fn update_settings(&self, settings: ItemTrackerSettings) {
        self.settings.store(Arc::new(settings));
        self.mutation_warning.reset();
    }

    /// Handles a drop entering `world`.
    ///
    /// Returns `true` only when the drop was fully merged into an existing
    /// one and discarded, which tells the host to cancel its spawn.
    pub fn on_enter<H>(&self, host: &H, item: &ItemEntity, world: &WorldId) -> bool
    where
        H: ItemHost + ?Sized,
    {
        if item.removed {
            return false;
        }
        let settings = self.settings.load_full();
        let Some(kind) = self.tracking_kind(item, &settings) else {
            return false;
        };
        if !settings.filter().accepts(kind.as_str()) {
            trace!("[Item filtered] {} {}", kind, item.id);
            self.stats.record_filtered();
            return false;
        }
        debug!("[Item joined {}] {} {}", world, kind, item.id);

        let partition = ItemPartition::new(world.clone(), kind);
        let handled = match self.try_merge(host, item, &partition, &settings) {
            MergeOutcome::Absorbed => true,
            MergeOutcome::NotMerged => {
                self.track(host, item.id, &partition, &settings);
                false
            }
        };

        self.advance_verification(host, &settings);
        handled
    }

    /// Handles a drop leaving `world`.
    pub fn on_leave(&self, item: &ItemEntity, world: &WorldId) {
        let settings = self.settings.load_full();
        // No allow/deny check here: the lists may have changed since entry.
        let Some(kind) = self.tracking_kind(item, &settings) else {
            return;
        };

        self.by_world.remove(world, item.id);
        let partition = ItemPartition::new(world.clone(), kind);
        if self.by_kind.remove(&partition, item.id).is_some() {
            debug!("[Item left {}] {} {}", world, partition.kind, item.id);
        } else if item.removed {
            debug!(
                "[Item left {}] {} {} was already released by the tracker",
                world, partition.kind, item.id
            );
        } else {
            warn!(
                "Item {} {} in {} was not tracked by item entity tracker!",
                partition.kind, item.id, world
            );
        }
    }

    /// Removes references to drops the host reports as removed.
    pub fn verify<H>(&self, host: &H) -> SweepReport
    where
        H: ItemHost + ?Sized,
    {
        let report = SweepReport {
            world_removed: self.by_world.sweep(|id| host.is_item_removed(id)),
            kind_removed: self.by_kind.sweep(|id| host.is_item_removed(id)),
        };
        self.stats
            .record_sweep(report.world_removed + report.kind_removed);

        if report.is_empty() {
            trace!("[Item verification] index is consistent");
        } else {
            debug!(
                "[Item verification] removed {} world and {} kind references",
                report.world_removed, report.kind_removed
            );
        }
        report
    }

    pub fn tracked_in_world(&self, world: &WorldId) -> usize {
        self.by_world.partition_len(world)
    }

    pub fn tracked_of_kind(&self, world: &WorldId, kind: &ItemKind) -> usize {
        self.by_kind
            .partition_len(&ItemPartition::new(world.clone(), kind.clone()))
    }

    pub fn is_tracked(&self, world: &WorldId, id: EntityId) -> bool {
        self.by_world.contains(world, id)
    }

    /// Tracked ids of one kind, oldest first.
    pub fn kind_snapshot(&self, world: &WorldId, kind: &ItemKind) -> Vec<EntityId> {
        self.by_kind
            .snapshot(&ItemPartition::new(world.clone(), kind.clone()))
    }

    /// Tracked ids of a world, oldest first.
    pub fn world_snapshot(&self, world: &WorldId) -> Vec<EntityId> {
        self.by_world.snapshot(world)
    }

    pub fn stats(&self) -> TrackerStatsSnapshot {
        self.stats.snapshot(self.by_world.total_len())
    }

    /// Forgets every reference without touching the host.
    pub fn clear(&self) {
        self.by_world.clear();
        self.by_kind.clear();
        self.verification_counter.store(0, Ordering::Release);
    }

    /// Resolves the partition kind of a drop, or `None` for drops that are
    /// never tracked whatever the filter says.
    fn tracking_kind(&self, item: &ItemEntity, settings: &ItemTrackerSettings) -> Option<ItemKind> {
        if item.custom_name || item.kind.is_blank() {
            return None;
        }

        let name = item.kind.as_str();
        if AIR_KINDS.contains(&name) {
            return None;
        }
        if settings
            .excluded_prefixes
            .iter()
            .any(|prefix| !prefix.is_empty() && name.starts_with(prefix.as_str()))
        {
            return None;
        }

        Some(item.kind.clone())
    }

    fn try_merge<H>(
        &self,
        host: &H,
        item: &ItemEntity,
        partition: &ItemPartition,
        settings: &ItemTrackerSettings,
    ) -> MergeOutcome
    where
        H: ItemHost + ?Sized,
    {
        if !item.can_stack() {
            return MergeOutcome::NotMerged;
        }
        let Some(merge_box) = MergeBox::around(&item.position, settings.collect_radius) else {
            return MergeOutcome::NotMerged;
        };
        let cap = settings.stack_cap(item.max_quantity);
        if item.quantity >= cap {
            return MergeOutcome::NotMerged;
        }

        let incoming_sky = host.can_see_sky(&partition.world, &item.position);

        for candidate_id in self.by_kind.snapshot(partition) {
            if candidate_id == item.id {
                continue;
            }
            let Some(candidate) = host.item(candidate_id) else {
                continue;
            };
            // Pairs that would overflow the cap are not compatible.
            let Some(merged) = candidate
                .quantity
                .checked_add(item.quantity)
                .filter(|merged| *merged <= cap)
            else {
                continue;
            };
            if !host.are_mergeable(item, &candidate) {
                continue;
            }
            let both_see_sky =
                incoming_sky && host.can_see_sky(&partition.world, &candidate.position);
            if !proximity::in_box(&merge_box, item, &candidate, both_see_sky) {
                continue;
            }

            if let Err(error) = host.set_quantity(candidate.id, merged) {
                self.fall_back(host, item, &candidate, error);
                return MergeOutcome::NotMerged;
            }

            debug!("[Merge Item] {} + {} = {} items", item.id, candidate.id, merged);
            if settings.move_position_to_last_drop {
                let target = candidate
                    .position
                    .blend_toward(&item.position, LAST_DROP_BLEND);
                if let Err(error) = host.move_to(candidate.id, target) {
                    debug!("Unable to move item {} to last drop: {}", candidate.id, error);
                }
            }

            host.discard(item.id);
            self.stats.record_merged();
            return MergeOutcome::Absorbed;
        }

        MergeOutcome::NotMerged
    }

    /// Failed merge: report once, then at least bring the two drops together.
    fn fall_back<H>(&self, host: &H, incoming: &ItemEntity, candidate: &ItemEntity, error: MutationError)
    where
        H: ItemHost + ?Sized,
    {
        self.stats.record_mutation_failure();
        if self.mutation_warning.fire() {
            warn!(
                "Unable to merge item {} into {}: {}. Falling back to moving drops together.",
                incoming.id, candidate.id, error
            );
        } else {
            debug!("Unable to merge item {} into {}: {}", incoming.id, candidate.id, error);
        }

        if let Err(error) = host.move_to(incoming.id, candidate.position) {
            debug!("Unable to move item {}: {}", incoming.id, error);
        }
    }

    fn track<H>(&self, host: &H, id: EntityId, partition: &ItemPartition, settings: &ItemTrackerSettings)
    where
        H: ItemHost + ?Sized,
    {
        let world_outcome = self.by_world.insert_bounded(
            partition.world.clone(),
            id,
            partition.kind.clone(),
            settings.max_items_per_world,
        );
        if let Some((evicted, evicted_kind)) = world_outcome.evicted {
            debug!(
                "[Item World Limit {}] Removing first item {}",
                world_outcome.len + 1,
                evicted
            );
            self.by_kind
                .remove(&ItemPartition::new(partition.world.clone(), evicted_kind), evicted);
            host.discard(evicted);
            self.stats.record_evicted();
        }

        let kind_outcome =
            self.by_kind
                .insert_bounded(partition.clone(), id, (), settings.max_items_per_kind);
        if let Some((evicted, ())) = kind_outcome.evicted {
            debug!(
                "[Item Type Limit {}] Removing first item {}",
                kind_outcome.len + 1,
                evicted
            );
            self.by_world.remove(&partition.world, evicted);
            host.discard(evicted);
            self.stats.record_evicted();
        }

        if world_outcome.inserted {
            self.stats.record_inserted();
        }
    }

    fn advance_verification<H>(&self, host: &H, settings: &ItemTrackerSettings)
    where
        H: ItemHost + ?Sized,
    {
        let Ok(cycle) = u32::try_from(settings.verification_cycle) else {
            return;
        };
        if cycle == 0 {
            return;
        }

        let count = self.verification_counter.fetch_add(1, Ordering::AcqRel) + 1;
        if count >= cycle {
            self.verification_counter.store(0, Ordering::Release);
            self.verify(host);
        }
    }
}
