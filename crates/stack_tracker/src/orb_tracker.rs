//! # Experience Orb Tracker
//!
//! Orbs have no kind, so they are indexed per world only. An entering orb is
//! merged into the first live orb inside its merge box by summing the two
//! values; the sum has no cap. Zero-value orbs are ghosts and are discarded
//! on sight. Unlike item drops there is no population cap for orbs.

use crate::entity::ExperienceOrb;
use crate::error::MutationError;
use crate::host::OrbHost;
use crate::index::PartitionIndex;
use crate::latch::WarnOnce;
use crate::proximity::{self, MergeBox};
use crate::settings::OrbTrackerSettings;
use crate::stats::{TrackerStats, TrackerStatsSnapshot};
use crate::types::{EntityId, WorldId, LAST_DROP_BLEND};
use arc_swap::ArcSwap;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Tracker for experience orbs.
#[derive(Debug)]
pub struct ExperienceOrbTracker {
    settings: ArcSwap<OrbTrackerSettings>,
    by_world: PartitionIndex<WorldId, ()>,
    mutation_warning: WarnOnce,
    stats: TrackerStats,
}

impl Default for ExperienceOrbTracker {
    fn default() -> Self {
        Self::new(OrbTrackerSettings::default())
    }
}

impl ExperienceOrbTracker {
    pub fn new(settings: OrbTrackerSettings) -> Self {
        Self {
            settings: ArcSwap::from_pointee(settings),
            by_world: PartitionIndex::new(),
            mutation_warning: WarnOnce::new(),
            stats: TrackerStats::default(),
        }
    }

    pub fn settings(&self) -> Arc<OrbTrackerSettings> {
        self.settings.load_full()
    }

    pub fn update_settings(&self, settings: OrbTrackerSettings) {
        self.settings.store(Arc::new(settings));
        self.mutation_warning.reset();
    }

    /// Handles an orb entering `world`.
    ///
    /// Returns `true` when the orb was consumed, either merged into an
    /// existing orb or discarded as a zero-value ghost.
    pub fn on_enter<H>(&self, host: &H, orb: &ExperienceOrb, world: &WorldId) -> bool
    where
        H: OrbHost + ?Sized,
    {
        if orb.removed {
            return false;
        }

        if orb.value == 0 {
            debug!("Remove Experience Orb {} with {} xp from {}.", orb.id, orb.value, world);
            host.discard(orb.id);
            self.stats.record_discarded_ghost();
            return true;
        }

        let settings = self.settings.load_full();
        if !settings.world_filter().accepts(world.as_str()) {
            trace!("[Orb filtered] {} in {}", orb.id, world);
            self.stats.record_filtered();
            return false;
        }
        debug!("Experience Orb {} with {} xp joined {}.", orb.id, orb.value, world);

        if self.try_merge(host, orb, world, &settings) {
            return true;
        }

        if self.by_world.insert_bounded(world.clone(), orb.id, (), 0).inserted {
            self.stats.record_inserted();
        }
        false
    }

    /// Handles an orb leaving `world`.
    pub fn on_leave(&self, orb: &ExperienceOrb, world: &WorldId) {
        if self.by_world.remove(world, orb.id).is_some() {
            debug!("Experience Orb {} with {} xp left {}.", orb.id, orb.value, world);
        }
    }

    /// Removes references to orbs the host reports as removed.
    pub fn verify<H>(&self, host: &H) -> usize
    where
        H: OrbHost + ?Sized,
    {
        let removed = self.by_world.sweep(|id| host.is_orb_removed(id));
        self.stats.record_sweep(removed);
        if removed > 0 {
            debug!("[Orb verification] removed {} references", removed);
        }
        removed
    }

    pub fn tracked_in_world(&self, world: &WorldId) -> usize {
        self.by_world.partition_len(world)
    }

    pub fn is_tracked(&self, world: &WorldId, id: EntityId) -> bool {
        self.by_world.contains(world, id)
    }

    pub fn world_snapshot(&self, world: &WorldId) -> Vec<EntityId> {
        self.by_world.snapshot(world)
    }

    pub fn stats(&self) -> TrackerStatsSnapshot {
        self.stats.snapshot(self.by_world.total_len())
    }

    pub fn clear(&self) {
        self.by_world.clear();
    }

    fn try_merge<H>(&self, host: &H, orb: &ExperienceOrb, world: &WorldId, settings: &OrbTrackerSettings) -> bool
    where
        H: OrbHost + ?Sized,
    {
        let Some(merge_box) = MergeBox::around(&orb.position, settings.collect_radius) else {
            return false;
        };
        let incoming_sky = host.can_see_sky(world, &orb.position);

        for candidate_id in self.by_world.snapshot(world) {
            if candidate_id == orb.id {
                continue;
            }
            let Some(candidate) = host.orb(candidate_id) else {
                continue;
            };
            let both_see_sky = incoming_sky && host.can_see_sky(world, &candidate.position);
            if !proximity::in_box(&merge_box, orb, &candidate, both_see_sky) {
                continue;
            }

            let merged = candidate
                .value
                .checked_add(orb.value)
                .ok_or(MutationError::ValueOverflow)
                .and_then(|value| host.set_value(candidate.id, value).map(|()| value));
            let value = match merged {
                Ok(value) => value,
                Err(error) => {
                    self.fall_back(host, orb, &candidate, error);
                    return false;
                }
            };

            debug!("Merged experience orb {} with {} and {} xp.", orb.id, candidate.id, value);
            if settings.move_position_to_last_drop {
                let target = candidate.position.blend_toward(&orb.position, LAST_DROP_BLEND);
                if let Err(error) = host.move_to(candidate.id, target) {
                    debug!("Unable to move experience orb {}: {}", candidate.id, error);
                }
            }
            host.discard(orb.id);
            self.stats.record_merged();
            return true;
        }

        false
    }

    fn fall_back<H>(&self, host: &H, orb: &ExperienceOrb, candidate: &ExperienceOrb, error: MutationError)
    where
        H: OrbHost + ?Sized,
    {
        self.stats.record_mutation_failure();
        if self.mutation_warning.fire() {
            warn!(
                "Unable to merge experience orb {} with {}: {}. Falling back to moving orbs together.",
                orb.id, candidate.id, error
            );
        } else {
            debug!("Unable to merge experience orb {} with {}: {}", orb.id, candidate.id, error);
        }

        if let Err(error) = host.move_to(orb.id, candidate.position) {
            debug!("Unable to move experience orb {}: {}", orb.id, error);
        }
    }
}
