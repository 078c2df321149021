//! In-memory reference host.
//!
//! [`MemoryWorld`] implements [`ItemHost`] and [`OrbHost`] over a concurrent
//! object table. It is what the test suites drive, and it doubles as a
//! lightweight host for offline simulations of drop-heavy scenes.
//!
//! Sky visibility is modelled with an optional roof height per world:
//! positions below the roof are covered, everything else sees the sky.

use crate::entity::{ExperienceOrb, ItemEntity};
use crate::error::MutationError;
use crate::host::{ItemHost, OrbHost, WorldHost};
use crate::types::{EntityId, ItemKind, Position, WorldId};
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

#[derive(Debug, Clone)]
enum SimObject {
    Item(ItemEntity),
    Orb(ExperienceOrb),
}

impl SimObject {
    fn release(&mut self) {
        match self {
            SimObject::Item(item) => {
                item.removed = true;
                item.alive = false;
            }
            SimObject::Orb(orb) => {
                orb.removed = true;
                orb.alive = false;
            }
        }
    }

    fn is_removed(&self) -> bool {
        match self {
            SimObject::Item(item) => item.removed,
            SimObject::Orb(orb) => orb.removed,
        }
    }

    fn set_position(&mut self, position: Position) {
        match self {
            SimObject::Item(item) => item.position = position,
            SimObject::Orb(orb) => orb.position = position,
        }
    }
}

/// Concurrent in-memory world used as a host.
#[derive(Debug)]
pub struct MemoryWorld {
    objects: DashMap<EntityId, SimObject>,
    roofs: DashMap<WorldId, f64>,
    next_id: AtomicU64,
    fail_mutations: AtomicBool,
    discards: AtomicU64,
}

impl Default for MemoryWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryWorld {
    pub fn new() -> Self {
        Self {
            objects: DashMap::new(),
            roofs: DashMap::new(),
            next_id: AtomicU64::new(1),
            fail_mutations: AtomicBool::new(false),
            discards: AtomicU64::new(0),
        }
    }

    pub fn next_entity_id(&self) -> EntityId {
        EntityId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Spawns a live stackable drop and returns its snapshot.
    pub fn spawn_item(&self, kind: impl Into<ItemKind>, quantity: u32, position: Position) -> ItemEntity {
        let item = ItemEntity::new(self.next_entity_id(), kind, quantity, position);
        self.insert_item(item.clone());
        item
    }

    /// Stores a custom drop snapshot as-is.
    pub fn insert_item(&self, item: ItemEntity) {
        self.objects.insert(item.id, SimObject::Item(item));
    }

    pub fn spawn_orb(&self, value: u32, position: Position) -> ExperienceOrb {
        let orb = ExperienceOrb::new(self.next_entity_id(), value, position);
        self.insert_orb(orb.clone());
        orb
    }

    pub fn insert_orb(&self, orb: ExperienceOrb) {
        self.objects.insert(orb.id, SimObject::Orb(orb));
    }

    /// Marks an object removed without any leave notification, the way a
    /// host subsystem might despawn it behind the tracker's back.
    pub fn despawn_silently(&self, id: EntityId) {
        if let Some(mut object) = self.objects.get_mut(&id) {
            object.release();
        }
    }

    /// Drops an object from the table entirely.
    pub fn forget(&self, id: EntityId) {
        self.objects.remove(&id);
    }

    /// Covers `world` below `height`, or opens it to the sky with `None`.
    pub fn set_roof(&self, world: &WorldId, height: Option<f64>) {
        match height {
            Some(height) => {
                self.roofs.insert(world.clone(), height);
            }
            None => {
                self.roofs.remove(world);
            }
        }
    }

    /// Makes every quantity and value mutation fail.
    pub fn set_fail_mutations(&self, fail: bool) {
        self.fail_mutations.store(fail, Ordering::Release);
    }

    /// Whether the object exists and has not been removed.
    pub fn is_present(&self, id: EntityId) -> bool {
        self.objects.get(&id).map_or(false, |object| !object.is_removed())
    }

    /// Number of discard calls that hit a live object.
    pub fn discard_count(&self) -> u64 {
        self.discards.load(Ordering::Relaxed)
    }

    fn check_mutable(&self, id: EntityId) -> Result<(), MutationError> {
        if self.fail_mutations.load(Ordering::Acquire) {
            return Err(MutationError::Rejected("mutations disabled".to_string()));
        }
        if !self.is_present(id) {
            return Err(MutationError::UnknownEntity(id));
        }
        Ok(())
    }
}

impl WorldHost for MemoryWorld {
    fn can_see_sky(&self, world: &WorldId, position: &Position) -> bool {
        self.roofs.get(world).map_or(true, |roof| position.y >= *roof)
    }

    fn move_to(&self, id: EntityId, position: Position) -> Result<(), MutationError> {
        let mut object = self
            .objects
            .get_mut(&id)
            .ok_or(MutationError::UnknownEntity(id))?;
        object.set_position(position);
        Ok(())
    }

    fn discard(&self, id: EntityId) {
        if let Some(mut object) = self.objects.get_mut(&id) {
            if !object.is_removed() {
                object.release();
                self.discards.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

impl ItemHost for MemoryWorld {
    fn item(&self, id: EntityId) -> Option<ItemEntity> {
        match self.objects.get(&id)?.value() {
            SimObject::Item(item) => Some(item.clone()),
            SimObject::Orb(_) => None,
        }
    }

    fn set_quantity(&self, id: EntityId, quantity: u32) -> Result<(), MutationError> {
        self.check_mutable(id)?;
        match self.objects.get_mut(&id).as_deref_mut() {
            Some(SimObject::Item(item)) => {
                item.quantity = quantity;
                Ok(())
            }
            _ => Err(MutationError::UnknownEntity(id)),
        }
    }
}

impl OrbHost for MemoryWorld {
    fn orb(&self, id: EntityId) -> Option<ExperienceOrb> {
        match self.objects.get(&id)?.value() {
            SimObject::Orb(orb) => Some(orb.clone()),
            SimObject::Item(_) => None,
        }
    }

    fn set_value(&self, id: EntityId, value: u32) -> Result<(), MutationError> {
        self.check_mutable(id)?;
        match self.objects.get_mut(&id).as_deref_mut() {
            Some(SimObject::Orb(orb)) => {
                orb.value = value;
                Ok(())
            }
            _ => Err(MutationError::UnknownEntity(id)),
        }
    }
}
