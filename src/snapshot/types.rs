//! Snapshot data types
//!
//! This module defines the value objects persisted per (player, world):
//! the snapshot itself, the world-free location, and the simplified
//! status-effect record. All of them are plain serde structs; the field
//! set of `PlayerSnapshot` *is* the allowlist of what gets persisted.

use serde::{Deserialize, Serialize};

/// Number of main inventory slots in a player inventory.
pub const PLAYER_INVENTORY_SIZE: usize = 36;

/// Number of armour/equipment slots.
pub const ARMOUR_SLOTS: usize = 4;

/// The platform's default maximum health.
pub const MAX_HEALTH: f64 = 20.0;

/// The platform's default maximum hunger/food level.
pub const MAX_HUNGER: i32 = 20;

/// A location decoupled from any particular world object.
///
/// Keeping the world out of the serialized form means a stored location can
/// be bound to any target world at apply time, and snapshots can be written
/// without holding a live world reference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartialLocation {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub pitch: f32,
    pub yaw: f32,
}

impl PartialLocation {
    pub fn new(x: f64, y: f64, z: f64, pitch: f32, yaw: f32) -> Self {
        PartialLocation { x, y, z, pitch, yaw }
    }
}

impl std::fmt::Display for PartialLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{} y{} z{}", self.x, self.y, self.z)
    }
}

/// A simplified, serializable view of an active status effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffect {
    #[serde(rename = "type")]
    pub effect_type: String,
    pub duration: i32,
    pub amplifier: i32,
}

impl StatusEffect {
    pub fn new(effect_type: impl Into<String>, duration: i32, amplifier: i32) -> Self {
        StatusEffect {
            effect_type: effect_type.into(),
            duration,
            amplifier,
        }
    }
}

/// The authoritative state for one (player, world) pair.
///
/// Inventory and armour slots hold opaque encoded item blobs produced by the
/// host's item codec; an empty slot is `None`. Coordinates are the only field
/// whose absence carries meaning: a snapshot without coordinates is *empty*
/// (the game engine picks the spawn point), but may still carry inventory and
/// vitals. Consumers must check [`PlayerSnapshot::is_empty`] before
/// attempting placement.
///
/// Snapshots are value objects: each save/load produces a fresh copy, and
/// nothing in this crate shares mutable snapshot state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSnapshot {
    pub inventory: Vec<Option<String>>,
    pub armour: Vec<Option<String>>,
    #[serde(rename = "potionEffects")]
    pub potion_effects: Vec<StatusEffect>,
    pub coordinates: Option<PartialLocation>,
    #[serde(rename = "experienceLevels")]
    pub experience_levels: i32,
    #[serde(rename = "experiencePoints")]
    pub experience_points: f32,
    pub health: f64,
    pub hunger: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<String>,
}

impl PlayerSnapshot {
    /// An empty snapshot with every field at its documented default.
    ///
    /// This is what `load` returns when no file exists yet, which makes
    /// "never saved" and "explicitly emptied" indistinguishable on purpose.
    pub fn empty() -> Self {
        PlayerSnapshot {
            inventory: vec![None; PLAYER_INVENTORY_SIZE],
            armour: vec![None; ARMOUR_SLOTS],
            potion_effects: Vec::new(),
            coordinates: None,
            experience_levels: 0,
            experience_points: 0.0,
            health: MAX_HEALTH,
            hunger: MAX_HUNGER,
            vehicle: None,
        }
    }

    /// The player has to exist *somewhere*, so a snapshot with nulled
    /// coordinates is defined as empty. Emptiness says nothing about the
    /// other fields.
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_none()
    }

    /// Returns a copy with the location removed.
    ///
    /// Used when a snapshot is cloned onto a different player: the clone
    /// must not inherit the source player's position.
    pub fn stripped_of_location(&self) -> Self {
        let mut copy = self.clone();
        copy.coordinates = None;
        copy
    }

    /// Returns a copy with the location replaced.
    pub fn with_location(&self, location: Option<PartialLocation>) -> Self {
        let mut copy = self.clone();
        copy.coordinates = location;
        copy
    }
}

impl Default for PlayerSnapshot {
    fn default() -> Self {
        PlayerSnapshot::empty()
    }
}
