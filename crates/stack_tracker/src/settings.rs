//! Tracker settings.
//!
//! Both trackers read these through an `ArcSwap`, so a configuration reload
//! takes effect on the next event without pausing the world. Numeric limits
//! use signed integers on purpose: zero or a negative value disables the
//! corresponding behaviour.

use crate::filter::FilterPolicy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// Item tracker defaults
fn default_item_collect_radius() -> i32 { 3 }
fn default_max_items_per_world() -> i32 { 128 }
fn default_max_items_per_kind() -> i32 { 32 }
fn default_max_stack_size() -> i32 { 64 }
fn default_verification_cycle() -> i32 { 64 }
fn default_deny_list() -> BTreeSet<String> {
    ["minecraft:diamond", "minecraft:diamond_block"]
        .into_iter()
        .map(String::from)
        .collect()
}
fn default_excluded_prefixes() -> Vec<String> {
    vec!["create".to_string()]
}

// Orb tracker defaults
fn default_orb_collect_radius() -> i32 { 4 }

/// Settings of the item drop tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemTrackerSettings {
    /// Half-width of the merge box in blocks (0 or less disables merging)
    #[serde(default = "default_item_collect_radius")]
    pub collect_radius: i32,
    /// Maximum tracked drops per world before the oldest is discarded
    #[serde(default = "default_max_items_per_world")]
    pub max_items_per_world: i32,
    /// Maximum tracked drops per world and kind before the oldest is discarded
    #[serde(default = "default_max_items_per_kind")]
    pub max_items_per_kind: i32,
    /// Upper bound for merged stacks, further capped by the kind's own maximum
    #[serde(default = "default_max_stack_size")]
    pub max_stack_size: i32,
    /// Nudge the surviving stack toward the latest drop after a merge
    #[serde(default)]
    pub move_position_to_last_drop: bool,
    /// Accepted entries between two verification sweeps (0 or less disables)
    #[serde(default = "default_verification_cycle")]
    pub verification_cycle: i32,
    /// If non-empty, only these kinds are tracked
    #[serde(default)]
    pub allow_list: BTreeSet<String>,
    /// Kinds that are never tracked (ignored while an allow list is set)
    #[serde(default = "default_deny_list")]
    pub deny_list: BTreeSet<String>,
    /// Kinds starting with one of these prefixes belong to integrations
    /// with their own drop handling
    #[serde(default = "default_excluded_prefixes")]
    pub excluded_prefixes: Vec<String>,
}

impl Default for ItemTrackerSettings {
    fn default() -> Self {
        Self {
            collect_radius: default_item_collect_radius(),
            max_items_per_world: default_max_items_per_world(),
            max_items_per_kind: default_max_items_per_kind(),
            max_stack_size: default_max_stack_size(),
            move_position_to_last_drop: false,
            verification_cycle: default_verification_cycle(),
            allow_list: BTreeSet::new(),
            deny_list: default_deny_list(),
            excluded_prefixes: default_excluded_prefixes(),
        }
    }
}

impl ItemTrackerSettings {
    /// Effective merge cap for a stack whose kind allows `kind_max` items.
    pub fn stack_cap(&self, kind_max: u32) -> u32 {
        match u32::try_from(self.max_stack_size) {
            Ok(configured) if configured > 0 => configured.min(kind_max),
            _ => kind_max,
        }
    }

    /// Allow/deny decision over item kinds.
    pub fn filter(&self) -> FilterPolicy<'_> {
        FilterPolicy::new(&self.allow_list, &self.deny_list)
    }
}

/// Settings of the experience orb tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbTrackerSettings {
    /// Half-width of the merge box in blocks (0 or less disables merging)
    #[serde(default = "default_orb_collect_radius")]
    pub collect_radius: i32,
    /// Nudge the surviving orb toward the latest drop after a merge
    #[serde(default)]
    pub move_position_to_last_drop: bool,
    /// If non-empty, orbs are only tracked in these worlds
    #[serde(default)]
    pub allow_worlds: BTreeSet<String>,
    /// Worlds in which orbs are never tracked
    #[serde(default)]
    pub deny_worlds: BTreeSet<String>,
}

impl OrbTrackerSettings {
    /// Allow/deny decision over world ids.
    pub fn world_filter(&self) -> FilterPolicy<'_> {
        FilterPolicy::new(&self.allow_worlds, &self.deny_worlds)
    }
}

impl Default for OrbTrackerSettings {
    fn default() -> Self {
        Self {
            collect_radius: default_orb_collect_radius(),
            move_position_to_last_drop: false,
            allow_worlds: BTreeSet::new(),
            deny_worlds: BTreeSet::new(),
        }
    }
}
