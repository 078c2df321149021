//! # Core Type Definitions
//!
//! Identifiers and positions shared by both trackers.
//!
//! ## Key Types
//!
//! - [`EntityId`] - Stable host-assigned identifier of a world object
//! - [`WorldId`] - Key of an isolated simulated world (dimension)
//! - [`ItemKind`] - Registry key that discriminates stackable objects
//! - [`Position`] - 3D position with double precision
//!
//! ## Design Principles
//!
//! - **Type Safety**: Wrapper types keep world keys and item kinds apart even though
//!   both are strings underneath
//! - **Cheap Keys**: [`CompactString`] keeps short keys inline, so cloning partition
//!   keys on every event does not allocate

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier of an object in the host simulation.
///
/// The host assigns it and guarantees it is stable for the object's lifetime.
/// Trackers only ever hold these ids, never the objects themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Identifier of a world. Objects never interact across worlds.
///
/// # Examples
///
/// ```rust
/// use stack_tracker::WorldId;
///
/// let overworld = WorldId::new("minecraft:overworld");
/// assert_eq!(overworld.as_str(), "minecraft:overworld");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldId(CompactString);

impl WorldId {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(CompactString::new(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for WorldId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Category key of a stackable object, usually its registry name
/// (e.g. `minecraft:oak_log`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemKind(CompactString);

impl ItemKind {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(CompactString::new(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// True for empty or whitespace-only keys.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ItemKind {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// How far a surviving object moves toward the latest drop after a merge.
pub const LAST_DROP_BLEND: f64 = 0.25;

/// Represents a 3D position in the game world.
///
/// Y is the vertical axis.
///
/// # Examples
///
/// ```rust
/// use stack_tracker::Position;
///
/// let drop_point = Position::new(10.7, 64.0, -3.2);
/// assert_eq!(drop_point.truncated(), (10, 64, -3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// X coordinate (east-west axis)
    pub x: f64,
    /// Y coordinate (vertical axis)
    pub y: f64,
    /// Z coordinate (north-south axis)
    pub z: f64,
}

impl Position {
    /// Creates a new position with the specified coordinates.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Integer coordinates, truncated toward zero on every axis.
    ///
    /// This is the block-style truncation merge boxes are built from, so
    /// `-0.5` becomes `0`, not `-1`.
    pub fn truncated(&self) -> (i64, i64, i64) {
        (self.x as i64, self.y as i64, self.z as i64)
    }

    /// Moves `factor` of the way toward `target` on the horizontal axes.
    ///
    /// Axes that already match are copied unchanged and the vertical axis is
    /// always kept, so a pile never sinks into or floats above its floor.
    pub fn blend_toward(&self, target: &Position, factor: f64) -> Position {
        let blend = |from: f64, to: f64| {
            if from == to {
                from
            } else {
                from + (to - from) * factor
            }
        };

        Position {
            x: blend(self.x, target.x),
            y: self.y,
            z: blend(self.z, target.z),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}
