//! Host-side object snapshots.
//!
//! The host owns every object; the trackers only ever see these plain
//! snapshots, either handed in with an event or fetched by id through the
//! host traits in [`crate::host`].

use crate::types::{EntityId, ItemKind, Position};
use serde::{Deserialize, Serialize};

/// Identity, location and liveness of an object, which is all the
/// proximity test needs.
pub trait Tracked {
    fn id(&self) -> EntityId;
    fn position(&self) -> Position;
    fn is_alive(&self) -> bool;
}

/// Snapshot of a stackable item drop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemEntity {
    pub id: EntityId,
    /// Registry key of the carried item. May be blank for broken stacks.
    pub kind: ItemKind,
    pub position: Position,
    pub quantity: u32,
    /// Per-kind stack maximum reported by the host.
    pub max_quantity: u32,
    pub stackable: bool,
    pub alive: bool,
    pub removed: bool,
    /// Named drops are player-curated and never tracked.
    pub custom_name: bool,
}

impl ItemEntity {
    /// Creates a live, stackable, unnamed drop with a stack maximum of 64.
    pub fn new(id: EntityId, kind: impl Into<ItemKind>, quantity: u32, position: Position) -> Self {
        Self {
            id,
            kind: kind.into(),
            position,
            quantity,
            max_quantity: 64,
            stackable: true,
            alive: true,
            removed: false,
            custom_name: false,
        }
    }

    /// Whether this stack could take part in a merge at all.
    pub fn can_stack(&self) -> bool {
        self.stackable && self.max_quantity > 1 && self.quantity < self.max_quantity
    }
}

impl Tracked for ItemEntity {
    fn id(&self) -> EntityId {
        self.id
    }

    fn position(&self) -> Position {
        self.position
    }

    fn is_alive(&self) -> bool {
        self.alive && !self.removed
    }
}

/// Snapshot of an experience orb. Orbs carry a scalar value and no kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceOrb {
    pub id: EntityId,
    pub position: Position,
    pub value: u32,
    pub alive: bool,
    pub removed: bool,
}

impl ExperienceOrb {
    pub fn new(id: EntityId, value: u32, position: Position) -> Self {
        Self {
            id,
            position,
            value,
            alive: true,
            removed: false,
        }
    }
}

impl Tracked for ExperienceOrb {
    fn id(&self) -> EntityId {
        self.id
    }

    fn position(&self) -> Position {
        self.position
    }

    fn is_alive(&self) -> bool {
        self.alive && !self.removed
    }
}
