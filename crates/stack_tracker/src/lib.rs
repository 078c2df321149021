//! # Stack Tracker
//!
//! Spatial deduplication and capacity bounding for transient world objects,
//! meant to sit inside a game server's entity event loop.
//!
//! When an item drop or an experience orb enters a world, the matching
//! tracker decides in one pass whether it merges into a nearby compatible
//! object, is indexed as a new object, or pushes the oldest object of its
//! partition out to respect a population cap.
//!
//! ## Architecture
//!
//! - **[`ItemEntityTracker`]**: stackable drops, indexed per world and per
//!   `(world, kind)`, merged up to the stack cap, evicted oldest-first and
//!   periodically swept for stale references
//! - **[`ExperienceOrbTracker`]**: value-carrying orbs, indexed per world,
//!   merged by summing values
//! - **[`filter`]**: allow/deny decision shared by both trackers
//! - **[`proximity`]**: the merge box test, with vertical relaxation for
//!   objects under open sky
//! - **[`index`]**: insertion-ordered partitions over a concurrent map
//!
//! The host owns every object. Trackers hold only entity ids and talk to the
//! host through the [`ItemHost`] and [`OrbHost`] traits; [`MemoryWorld`] is a
//! ready-made in-memory host.
//!
//! ## Quick Start
//!
//! ```rust
//! use stack_tracker::{ItemEntityTracker, MemoryWorld, Position, WorldId};
//!
//! let host = MemoryWorld::new();
//! let tracker = ItemEntityTracker::default();
//! let world = WorldId::new("minecraft:overworld");
//!
//! let first = host.spawn_item("minecraft:oak_log", 10, Position::new(0.0, 64.0, 0.0));
//! assert!(!tracker.on_enter(&host, &first, &world));
//!
//! let second = host.spawn_item("minecraft:oak_log", 5, Position::new(1.0, 64.0, 1.0));
//! assert!(tracker.on_enter(&host, &second, &world));
//! assert_eq!(tracker.tracked_in_world(&world), 1);
//! ```

pub mod entity;
pub mod error;
pub mod filter;
pub mod host;
pub mod index;
pub mod item_tracker;
pub mod latch;
pub mod orb_tracker;
pub mod proximity;
pub mod settings;
pub mod sim;
pub mod stats;
pub mod types;

#[cfg(test)]
mod tests;

pub use entity::{ExperienceOrb, ItemEntity, Tracked};
pub use error::MutationError;
pub use filter::FilterPolicy;
pub use host::{ItemHost, OrbHost, WorldHost};
pub use index::{OrderedRefSet, PartitionIndex};
pub use item_tracker::{ItemEntityTracker, ItemPartition, SweepReport};
pub use orb_tracker::ExperienceOrbTracker;
pub use settings::{ItemTrackerSettings, OrbTrackerSettings};
pub use sim::MemoryWorld;
pub use stats::TrackerStatsSnapshot;
pub use types::{EntityId, ItemKind, Position, WorldId};
