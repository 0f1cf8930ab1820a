//! Snapshot document codec
//!
//! Encodes a [`PlayerSnapshot`] to a JSON document and decodes it back.
//! Decoding is total: every field has a defined default when missing, null,
//! or the wrong shape, and unknown keys are ignored, so documents written by
//! older or newer versions still load. Only the coordinates and vehicle
//! fields may remain truly absent after a decode.
//!
//! The module also carries the slot-level bridge between encoded blobs and
//! live host items: a single slot that fails either direction degrades to an
//! empty slot instead of failing the whole snapshot.

use super::types::{
    ARMOUR_SLOTS, PLAYER_INVENTORY_SIZE, PartialLocation, PlayerSnapshot, StatusEffect,
};
use crate::host::ItemCodec;
use serde_json::Value;

/// Encodes a snapshot into a JSON document.
pub fn encode(snapshot: &PlayerSnapshot) -> Value {
    serde_json::to_value(snapshot).unwrap_or(Value::Null)
}

/// Decodes a snapshot from a JSON document, substituting defaults for any
/// field that is missing or unreadable.
pub fn decode(document: &Value) -> PlayerSnapshot {
    let mut snapshot = PlayerSnapshot::empty();

    let Some(map) = document.as_object() else {
        return snapshot;
    };

    if let Some(value) = map.get("inventory") {
        snapshot.inventory = decode_blob_slots(value, PLAYER_INVENTORY_SIZE);
    }
    if let Some(value) = map.get("armour") {
        snapshot.armour = decode_blob_slots(value, ARMOUR_SLOTS);
    }
    if let Some(array) = map.get("potionEffects").and_then(Value::as_array) {
        snapshot.potion_effects = array
            .iter()
            .filter_map(|effect| serde_json::from_value::<StatusEffect>(effect.clone()).ok())
            .collect();
    }
    if let Some(levels) = map.get("experienceLevels").and_then(Value::as_i64) {
        snapshot.experience_levels = levels as i32;
    }
    if let Some(points) = map.get("experiencePoints").and_then(Value::as_f64) {
        snapshot.experience_points = points as f32;
    }
    if let Some(health) = map.get("health").and_then(Value::as_f64) {
        snapshot.health = health;
    }
    if let Some(hunger) = map.get("hunger").and_then(Value::as_i64) {
        snapshot.hunger = hunger as i32;
    }

    // The only two fields allowed to stay absent after a decode.
    snapshot.coordinates = map
        .get("coordinates")
        .and_then(|value| serde_json::from_value::<PartialLocation>(value.clone()).ok());
    snapshot.vehicle = map
        .get("vehicle")
        .and_then(Value::as_str)
        .map(str::to_string);

    snapshot
}

/// Decodes a slot array; a missing/null array yields `default_len` empty
/// slots, and any non-string slot entry becomes an empty slot.
fn decode_blob_slots(value: &Value, default_len: usize) -> Vec<Option<String>> {
    match value.as_array() {
        Some(array) => array
            .iter()
            .map(|slot| slot.as_str().map(str::to_string))
            .collect(),
        None => vec![None; default_len],
    }
}

/// Encodes live item contents into per-slot blobs. A slot whose item fails
/// to encode becomes an empty slot.
pub fn encode_contents<C: ItemCodec>(codec: &C, contents: &[Option<C::Item>]) -> Vec<Option<String>> {
    contents
        .iter()
        .map(|slot| slot.as_ref().and_then(|item| codec.encode_item(item)))
        .collect()
}

/// Decodes per-slot blobs back into live item contents. A blob that fails
/// to decode becomes an empty slot.
pub fn decode_contents<C: ItemCodec>(codec: &C, blobs: &[Option<String>]) -> Vec<Option<C::Item>> {
    blobs
        .iter()
        .map(|slot| slot.as_deref().and_then(|blob| codec.decode_item(blob)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::types::{MAX_HEALTH, MAX_HUNGER};
    use serde_json::json;

    fn sample_snapshot() -> PlayerSnapshot {
        let mut snapshot = PlayerSnapshot::empty();
        snapshot.inventory[0] = Some("item-blob-0".to_string());
        snapshot.inventory[9] = Some("item-blob-9".to_string());
        snapshot.armour[3] = Some("helmet-blob".to_string());
        snapshot.potion_effects = vec![StatusEffect::new("SPEED", 600, 1)];
        snapshot.coordinates = Some(PartialLocation::new(10.0, 65.0, 10.0, 12.5, 90.0));
        snapshot.experience_levels = 30;
        snapshot.experience_points = 0.45;
        snapshot.health = 17.5;
        snapshot.hunger = 18;
        snapshot.vehicle = Some("boat-blob".to_string());
        snapshot
    }

    #[test]
    fn test_round_trip() {
        let snapshot = sample_snapshot();
        let decoded = decode(&encode(&snapshot));
        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn test_round_trip_of_empty_snapshot() {
        let snapshot = PlayerSnapshot::empty();
        let decoded = decode(&encode(&snapshot));
        assert_eq!(decoded, snapshot);
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_decode_of_empty_document_gives_defaults() {
        let decoded = decode(&json!({}));

        assert!(decoded.is_empty());
        assert_eq!(decoded.inventory, vec![None; PLAYER_INVENTORY_SIZE]);
        assert_eq!(decoded.armour, vec![None; ARMOUR_SLOTS]);
        assert_eq!(decoded.health, MAX_HEALTH);
        assert_eq!(decoded.hunger, MAX_HUNGER);
        assert!(decoded.vehicle.is_none());
    }

    #[test]
    fn test_decode_tolerates_unknown_keys() {
        let document = json!({
            "health": 5.0,
            "futureField": {"nested": true},
            "anotherUnknown": [1, 2, 3],
        });

        let decoded = decode(&document);
        assert_eq!(decoded.health, 5.0);
        assert_eq!(decoded.hunger, MAX_HUNGER);
    }

    #[test]
    fn test_decode_tolerates_null_fields() {
        let document = json!({
            "inventory": null,
            "potionEffects": null,
            "coordinates": null,
            "hunger": 7,
        });

        let decoded = decode(&document);
        assert_eq!(decoded.inventory, vec![None; PLAYER_INVENTORY_SIZE]);
        assert!(decoded.potion_effects.is_empty());
        assert!(decoded.is_empty());
        assert_eq!(decoded.hunger, 7);
    }

    #[test]
    fn test_decode_of_non_object_document() {
        assert_eq!(decode(&json!("garbage")), PlayerSnapshot::empty());
        assert_eq!(decode(&Value::Null), PlayerSnapshot::empty());
    }

    #[test]
    fn test_malformed_slot_degrades_to_empty() {
        let document = json!({
            "inventory": ["good-blob", 42, null, {"bad": true}],
        });

        let decoded = decode(&document);
        assert_eq!(
            decoded.inventory,
            vec![Some("good-blob".to_string()), None, None, None]
        );
    }

    struct ReverseCodec;

    impl ItemCodec for ReverseCodec {
        type Item = String;

        fn encode_item(&self, item: &String) -> Option<String> {
            if item == "unencodable" {
                return None;
            }
            Some(item.chars().rev().collect())
        }

        fn decode_item(&self, blob: &str) -> Option<String> {
            if blob == "corrupt" {
                return None;
            }
            Some(blob.chars().rev().collect())
        }
    }

    #[test]
    fn test_item_codec_round_trip_through_slots() {
        let contents = vec![Some("sword".to_string()), None, Some("shield".to_string())];
        let blobs = encode_contents(&ReverseCodec, &contents);
        let restored = decode_contents(&ReverseCodec, &blobs);
        assert_eq!(restored, contents);
    }

    #[test]
    fn test_failed_slot_codec_degrades_to_empty() {
        let contents = vec![Some("unencodable".to_string()), Some("sword".to_string())];
        let blobs = encode_contents(&ReverseCodec, &contents);
        assert_eq!(blobs[0], None);
        assert_eq!(blobs[1], Some("drows".to_string()));

        let blobs = vec![Some("corrupt".to_string()), Some("drows".to_string())];
        let restored = decode_contents(&ReverseCodec, &blobs);
        assert_eq!(restored, vec![None, Some("sword".to_string())]);
    }
}
