//! Player snapshot data model and document codec
//!
//! - `types`: the snapshot value objects and their defaults
//! - `codec`: JSON document encode/decode and slot-level blob handling

pub mod codec;
pub mod types;

pub use types::{
    ARMOUR_SLOTS, MAX_HEALTH, MAX_HUNGER, PLAYER_INVENTORY_SIZE, PartialLocation, PlayerSnapshot,
    StatusEffect,
};
