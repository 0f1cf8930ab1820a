//! Host platform boundary
//!
//! The engine never talks to the game engine directly. Everything it needs
//! from the host (live player state, world rules, item/entity blob
//! conversion) comes in through the traits in this module, which keeps the
//! persistence core testable with plain mock implementations.

use crate::snapshot::{PartialLocation, StatusEffect};
use serde::{Deserialize, Serialize};

/// The game modes a world can default to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    Survival,
    Creative,
    Adventure,
    Spectator,
}

impl Default for GameMode {
    fn default() -> Self {
        GameMode::Survival
    }
}

/// Converts host item handles to/from opaque encoded blobs.
///
/// The blob format is the host's business; the only contract is that
/// `decode_item(encode_item(item)) == item` for any representable item.
/// Either direction may fail for a single item, in which case the affected
/// slot degrades to empty rather than failing the whole snapshot.
pub trait ItemCodec {
    type Item;

    fn encode_item(&self, item: &Self::Item) -> Option<String>;
    fn decode_item(&self, blob: &str) -> Option<Self::Item>;
}

/// Converts host entity handles into opaque encoded blobs, for the
/// mounted-vehicle reference.
///
/// Encode-only: the engine records the mount a player had when a snapshot
/// was taken, but never respawns one. Re-entry placement is the platform's
/// job, and the pre-transition eject exists precisely so a stored vehicle
/// cannot be duplicated into the world.
pub trait EntityCodec {
    type Entity;

    fn encode_entity(&self, entity: &Self::Entity) -> Option<String>;
}

/// A container holding either a live entity handle or its encoded form,
/// never both. Accessors pattern-match; there is no half-initialized state.
#[derive(Debug, Clone)]
pub enum EntityHolder<E> {
    Live(E),
    Encoded(String),
}

impl<E> EntityHolder<E> {
    /// The live handle, if this holder carries one.
    pub fn live(&self) -> Option<&E> {
        match self {
            EntityHolder::Live(entity) => Some(entity),
            EntityHolder::Encoded(_) => None,
        }
    }

    /// The encoded blob, if this holder carries one.
    pub fn encoded(&self) -> Option<&str> {
        match self {
            EntityHolder::Live(_) => None,
            EntityHolder::Encoded(blob) => Some(blob),
        }
    }

    /// Resolves the holder to an encoded blob, encoding the live handle if
    /// necessary. Returns `None` when a live handle fails to encode.
    pub fn to_encoded<C>(&self, codec: &C) -> Option<String>
    where
        C: EntityCodec<Entity = E>,
    {
        match self {
            EntityHolder::Live(entity) => codec.encode_entity(entity),
            EntityHolder::Encoded(blob) => Some(blob.clone()),
        }
    }
}

/// Live view of (and apply surface onto) a connected player.
///
/// The read side feeds snapshot capture; the write side is what
/// `SyncEngine` drives when a loaded snapshot is applied. The host
/// guarantees all calls for one player happen serially on the main
/// simulation thread.
pub trait LivePlayer {
    type Item;
    type Entity;

    fn player_id(&self) -> &str;
    fn is_online(&self) -> bool;
    fn location(&self) -> PartialLocation;
    fn inventory(&self) -> Vec<Option<Self::Item>>;
    fn armour(&self) -> Vec<Option<Self::Item>>;
    fn active_effects(&self) -> Vec<StatusEffect>;
    fn experience_levels(&self) -> i32;
    fn experience_points(&self) -> f32;
    fn health(&self) -> f64;
    fn hunger(&self) -> i32;
    fn vehicle(&self) -> Option<EntityHolder<Self::Entity>>;

    fn set_inventory(&mut self, contents: Vec<Option<Self::Item>>);
    fn set_armour(&mut self, contents: Vec<Option<Self::Item>>);
    fn clear_effects(&mut self);
    fn add_effect(&mut self, effect: &StatusEffect);
    fn set_experience(&mut self, levels: i32, points: f32);
    fn set_health(&mut self, health: f64);
    fn set_hunger(&mut self, hunger: i32);
    fn set_game_mode(&mut self, mode: GameMode);
    fn teleport(&mut self, location: PartialLocation);

    /// Detaches the player from their mount, if any. Called before a world
    /// transition to prevent duplicate-entity bugs on re-entry.
    fn eject(&mut self);

    /// Drops the given items into the world at the player's location.
    fn drop_items(&mut self, items: Vec<Self::Item>);
}

/// Read-only view of a world's identity and rules.
pub trait WorldView {
    fn name(&self) -> &str;
    fn default_game_mode(&self) -> GameMode;

    /// Whether the platform's keep-inventory-on-death rule is active.
    fn keep_inventory(&self) -> bool;
}
