//! # Eco Stack
//!
//! Service layer that plugs the [`stack_tracker`] trackers into a host's
//! entity event bus.
//!
//! * **[`config`]**: TOML configuration with defaults for every key
//! * **[`logging`]**: tracing subscriber setup
//! * **[`compat`]**: detection of extensions that already merge drops or orbs
//! * **[`manager`]**: join/leave event routing and hot reload
//!
//! ## Quick Start
//!
//! ```rust
//! use eco_stack::{CompatibilityReport, EcoStackConfig, EcoStackManager};
//! use eco_stack::{EntityJoinWorldEvent, WorldEntity};
//! use stack_tracker::{MemoryWorld, Position, WorldId};
//! use std::sync::Arc;
//!
//! let manager = EcoStackManager::new(
//!     Arc::new(MemoryWorld::new()),
//!     &EcoStackConfig::default(),
//!     CompatibilityReport::detect(["minecraft"]),
//! );
//! let world = WorldId::new("minecraft:overworld");
//!
//! for quantity in [10, 5] {
//!     let item = manager.host().spawn_item("minecraft:oak_log", quantity, Position::default());
//!     let mut event = EntityJoinWorldEvent::new(WorldEntity::Item(item), world.clone());
//!     manager.handle_entity_join(&mut event);
//! }
//! assert_eq!(manager.item_tracker().tracked_in_world(&world), 1);
//! ```

pub mod compat;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod manager;

pub use compat::CompatibilityReport;
pub use config::{EcoStackConfig, LoggingSettings};
pub use error::ConfigError;
pub use events::{EntityJoinWorldEvent, EntityLeaveWorldEvent, WorldEntity};
pub use logging::{setup_logging, try_setup_logging};
pub use manager::{EcoStackManager, ManagerStats};
