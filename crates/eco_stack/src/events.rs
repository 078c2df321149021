//! World entity events as delivered by the host's event bus.

use stack_tracker::{EntityId, ExperienceOrb, ItemEntity, WorldId};

/// An entity crossing a world boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum WorldEntity {
    Item(ItemEntity),
    ExperienceOrb(ExperienceOrb),
    /// Any entity class the trackers do not handle.
    Other(EntityId),
}

impl WorldEntity {
    pub fn id(&self) -> EntityId {
        match self {
            WorldEntity::Item(item) => item.id,
            WorldEntity::ExperienceOrb(orb) => orb.id,
            WorldEntity::Other(id) => *id,
        }
    }
}

/// Fired before an entity is added to a world. Canceling it stops the spawn.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityJoinWorldEvent {
    pub entity: WorldEntity,
    pub world: WorldId,
    /// False for client-side copies of the world.
    pub server_side: bool,
    pub canceled: bool,
}

impl EntityJoinWorldEvent {
    /// A server-side, not yet canceled join.
    pub fn new(entity: WorldEntity, world: WorldId) -> Self {
        Self {
            entity,
            world,
            server_side: true,
            canceled: false,
        }
    }

    pub fn cancel(&mut self) {
        self.canceled = true;
    }

    pub fn is_canceled(&self) -> bool {
        self.canceled
    }
}

/// Fired when an entity is removed from a world.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityLeaveWorldEvent {
    pub entity: WorldEntity,
    pub world: WorldId,
    pub server_side: bool,
    pub canceled: bool,
}

impl EntityLeaveWorldEvent {
    pub fn new(entity: WorldEntity, world: WorldId) -> Self {
        Self {
            entity,
            world,
            server_side: true,
            canceled: false,
        }
    }
}
