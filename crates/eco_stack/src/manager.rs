//! # Stack Manager
//!
//! Routes world entity events to the item and orb trackers. One manager
//! serves every world of a host; the trackers inside partition by world, so
//! events from different world threads may arrive concurrently.

use crate::compat::{CompatibilityReport, CREATE_ID};
use crate::config::EcoStackConfig;
use crate::events::{EntityJoinWorldEvent, EntityLeaveWorldEvent, WorldEntity};
use serde::Serialize;
use stack_tracker::{
    ExperienceOrbTracker, ItemEntityTracker, ItemHost, ItemTrackerSettings, OrbHost,
    SweepReport, TrackerStatsSnapshot,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Counters of both trackers.
#[derive(Debug, Clone, Serialize)]
pub struct ManagerStats {
    pub items: TrackerStatsSnapshot,
    pub experience_orbs: TrackerStatsSnapshot,
}

/// Event-facing entry point tying the trackers to a host.
#[derive(Debug)]
pub struct EcoStackManager<H> {
    host: Arc<H>,
    items: ItemEntityTracker,
    orbs: ExperienceOrbTracker,
    compatibility: CompatibilityReport,
}

impl<H> EcoStackManager<H>
where
    H: ItemHost + OrbHost,
{
    pub fn new(host: Arc<H>, config: &EcoStackConfig, compatibility: CompatibilityReport) -> Self {
        compatibility.log();
        let manager = Self {
            host,
            items: ItemEntityTracker::new(item_settings(config, &compatibility)),
            orbs: ExperienceOrbTracker::new(config.experience_orb.clone()),
            compatibility,
        };
        info!(
            "Stack manager ready (item merging: {}, experience orb merging: {})",
            manager.compatibility.items_enabled(),
            manager.compatibility.orbs_enabled()
        );
        manager
    }

    /// Handles a join, canceling it when the entity was merged away.
    ///
    /// Returns whether the event was canceled by this call.
    pub fn handle_entity_join(&self, event: &mut EntityJoinWorldEvent) -> bool {
        if event.canceled || !event.server_side {
            return false;
        }

        let handled = match &event.entity {
            WorldEntity::Item(item) if self.compatibility.items_enabled() => {
                self.items.on_enter(self.host.as_ref(), item, &event.world)
            }
            WorldEntity::ExperienceOrb(orb) if self.compatibility.orbs_enabled() => {
                self.orbs.on_enter(self.host.as_ref(), orb, &event.world)
            }
            _ => false,
        };

        if handled {
            event.cancel();
        }
        handled
    }

    pub fn handle_entity_leave(&self, event: &EntityLeaveWorldEvent) {
        if event.canceled || !event.server_side {
            return;
        }

        match &event.entity {
            WorldEntity::Item(item) if self.compatibility.items_enabled() => {
                self.items.on_leave(item, &event.world)
            }
            WorldEntity::ExperienceOrb(orb) if self.compatibility.orbs_enabled() => {
                self.orbs.on_leave(orb, &event.world)
            }
            _ => {}
        }
    }

    /// Applies a new configuration to both trackers. Tracked references are
    /// kept; new limits apply from the next join.
    pub fn reload(&self, config: &EcoStackConfig) {
        self.items
            .update_settings(item_settings(config, &self.compatibility));
        self.orbs.update_settings(config.experience_orb.clone());
        debug!("Stack manager settings reloaded");
    }

    /// Sweeps stale references out of both trackers.
    pub fn verify(&self) -> (SweepReport, usize) {
        (
            self.items.verify(self.host.as_ref()),
            self.orbs.verify(self.host.as_ref()),
        )
    }

    pub fn stats(&self) -> ManagerStats {
        ManagerStats {
            items: self.items.stats(),
            experience_orbs: self.orbs.stats(),
        }
    }

    pub fn host(&self) -> &Arc<H> {
        &self.host
    }

    pub fn item_tracker(&self) -> &ItemEntityTracker {
        &self.items
    }

    pub fn orb_tracker(&self) -> &ExperienceOrbTracker {
        &self.orbs
    }

    pub fn compatibility(&self) -> &CompatibilityReport {
        &self.compatibility
    }
}

/// Item settings with the create prefix forced in when that extension is
/// present.
fn item_settings(config: &EcoStackConfig, compatibility: &CompatibilityReport) -> ItemTrackerSettings {
    let mut settings = config.item_entity.clone();
    if compatibility.create_loaded
        && !settings
            .excluded_prefixes
            .iter()
            .any(|prefix| prefix == CREATE_ID)
    {
        settings.excluded_prefixes.push(CREATE_ID.to_string());
    }
    settings
}
