//! Scenario tests for the trackers, driven by the in-memory host.
//!
//! - Item drop merging, capacity eviction and verification sweeps
//! - Experience orb merging and ghost removal
//! - The end-to-end drop pile scenario
//! - Concurrent access from several world threads

#[cfg(test)]
pub mod item_tracker_test;



use crate::types::WorldId;

pub(crate) fn overworld() -> WorldId {
    WorldId::new("minecraft:overworld")
}

pub(crate) fn nether() -> WorldId {
    WorldId::new("minecraft:the_nether")
}
