//! Capabilities the host simulation provides to the trackers.
//!
//! The host owns object lifetimes and authoritative state. Trackers read
//! snapshots by id and request mutations; they never keep objects alive.
//! All traits require `Send + Sync` so one tracker can serve several world
//! threads.

use crate::entity::{ExperienceOrb, ItemEntity};
use crate::error::MutationError;
use crate::types::{EntityId, Position, WorldId};

/// Queries and mutations common to every tracked object class.
pub trait WorldHost: Send + Sync {
    /// Whether the block at `position` has an unobstructed view of the sky.
    fn can_see_sky(&self, world: &WorldId, position: &Position) -> bool;

    /// Teleports an object.
    fn move_to(&self, id: EntityId, position: Position) -> Result<(), MutationError>;

    /// Removes an object from the simulation. Discarding an unknown or
    /// already removed object is a no-op.
    fn discard(&self, id: EntityId);
}

/// Host access to stackable item drops.
pub trait ItemHost: WorldHost {
    /// Current snapshot, or `None` once the host has forgotten the object.
    fn item(&self, id: EntityId) -> Option<ItemEntity>;

    /// Whether two stacks may be combined.
    fn are_mergeable(&self, a: &ItemEntity, b: &ItemEntity) -> bool {
        a.kind == b.kind && a.stackable && b.stackable
    }

    fn set_quantity(&self, id: EntityId, quantity: u32) -> Result<(), MutationError>;

    /// True when the host reports the object removed or no longer knows it.
    fn is_item_removed(&self, id: EntityId) -> bool {
        self.item(id).map_or(true, |item| item.removed)
    }
}

/// Host access to experience orbs.
pub trait OrbHost: WorldHost {
    fn orb(&self, id: EntityId) -> Option<ExperienceOrb>;

    fn set_value(&self, id: EntityId, value: u32) -> Result<(), MutationError>;

    fn is_orb_removed(&self, id: EntityId) -> bool {
        self.orb(id).map_or(true, |orb| orb.removed)
    }
}
