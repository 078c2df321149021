//! Insertion-ordered partition index.
//!
//! Both trackers keep non-owning references (entity ids) in partitions keyed
//! by world, or by world and kind. Each partition remembers insertion order so
//! capacity eviction can always drop the oldest member.
//!
//! The outer map is a [`DashMap`], so inserts, removals and sweeps from
//! different world threads need no external locking. Trackers never iterate a
//! live partition: they take a [`PartitionIndex::snapshot`] first, because a
//! merge found during the scan removes members from the very set being
//! scanned.

use crate::types::EntityId;
use dashmap::DashMap;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

/// Insertion-ordered set of entity ids, each carrying a small payload.
///
/// Removal is `O(log n)` and never reorders the remaining members.
#[derive(Debug, Clone)]
pub struct OrderedRefSet<V> {
    next_seq: u64,
    order: BTreeMap<u64, EntityId>,
    members: HashMap<EntityId, (u64, V)>,
}

impl<V> Default for OrderedRefSet<V> {
    fn default() -> Self {
        Self {
            next_seq: 0,
            order: BTreeMap::new(),
            members: HashMap::new(),
        }
    }
}

impl<V> OrderedRefSet<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `id` as the newest member. Returns false, and keeps the original
    /// age and payload, if it was already present.
    pub fn insert(&mut self, id: EntityId, payload: V) -> bool {
        if self.members.contains_key(&id) {
            return false;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.order.insert(seq, id);
        self.members.insert(id, (seq, payload));
        true
    }

    pub fn remove(&mut self, id: EntityId) -> Option<V> {
        let (seq, payload) = self.members.remove(&id)?;
        self.order.remove(&seq);
        Some(payload)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.members.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn pop_oldest(&mut self) -> Option<(EntityId, V)> {
        let (_, id) = self.order.pop_first()?;
        let (_, payload) = self.members.remove(&id)?;
        Some((id, payload))
    }

    /// Member ids, oldest first.
    pub fn snapshot(&self) -> Vec<EntityId> {
        self.order.values().copied().collect()
    }

    /// Keeps members for which `keep` returns true. Returns how many were
    /// dropped.
    pub fn retain(&mut self, mut keep: impl FnMut(EntityId, &V) -> bool) -> usize {
        let before = self.members.len();
        let members = &mut self.members;
        self.order.retain(|_, id| {
            let id = *id;
            let retained = members.get(&id).map_or(false, |(_, payload)| keep(id, payload));
            if !retained {
                members.remove(&id);
            }
            retained
        });
        before - self.members.len()
    }
}

/// Result of [`PartitionIndex::insert_bounded`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertOutcome<V> {
    /// Whether the id was newly added.
    pub inserted: bool,
    /// Partition size after insertion and eviction.
    pub len: usize,
    /// Oldest member dropped because the partition exceeded its cap.
    pub evicted: Option<(EntityId, V)>,
}

/// Concurrent map from partition key to an [`OrderedRefSet`].
#[derive(Debug)]
pub struct PartitionIndex<K, V>
where
    K: Eq + Hash,
{
    partitions: DashMap<K, OrderedRefSet<V>>,
}

impl<K, V> Default for PartitionIndex<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self {
            partitions: DashMap::new(),
        }
    }
}

impl<K, V> PartitionIndex<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `id` and, under the same shard lock, evicts the oldest member
    /// if the partition now holds more than `cap` entries. A `cap` of zero or
    /// less means unlimited.
    pub fn insert_bounded(&self, key: K, id: EntityId, payload: V, cap: i32) -> InsertOutcome<V> {
        let mut set = self.partitions.entry(key).or_default();
        let inserted = set.insert(id, payload);
        let evicted = match usize::try_from(cap) {
            Ok(cap) if cap > 0 && set.len() > cap => set.pop_oldest(),
            _ => None,
        };
        InsertOutcome {
            inserted,
            len: set.len(),
            evicted,
        }
    }

    pub fn remove(&self, key: &K, id: EntityId) -> Option<V> {
        self.partitions.get_mut(key)?.remove(id)
    }

    pub fn contains(&self, key: &K, id: EntityId) -> bool {
        self.partitions.get(key).map_or(false, |set| set.contains(id))
    }

    /// Point-in-time copy of a partition's members, oldest first.
    pub fn snapshot(&self, key: &K) -> Vec<EntityId> {
        self.partitions.get(key).map(|set| set.snapshot()).unwrap_or_default()
    }

    pub fn partition_len(&self, key: &K) -> usize {
        self.partitions.get(key).map_or(0, |set| set.len())
    }

    pub fn total_len(&self) -> usize {
        self.partitions.iter().map(|entry| entry.value().len()).sum()
    }

    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    /// Drops every member for which `is_stale` returns true, then drops
    /// partitions left empty. Returns how many members were removed.
    ///
    /// `is_stale` must not touch this index.
    pub fn sweep(&self, mut is_stale: impl FnMut(EntityId) -> bool) -> usize {
        let mut removed = 0;
        for mut entry in self.partitions.iter_mut() {
            removed += entry.value_mut().retain(|id, _| !is_stale(id));
        }
        self.partitions.retain(|_, set| !set.is_empty());
        removed
    }

    pub fn clear(&self) {
        self.partitions.clear();
    }
}
