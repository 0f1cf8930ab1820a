//! Per-player, per-world snapshot persistence
//!
//! This crate keeps an independent copy of a player's state (inventory,
//! position, vitals, status effects) per world on a multi-world game
//! server, restores the right copy whenever the player enters a world, and
//! maintains a timestamped backup history of every snapshot.
//!
//! # Architecture
//!
//! - `snapshot`: the snapshot data model and its JSON document codec
//! - `store`: the filesystem-backed repository (save/load/backup/list)
//! - `level_set`: world grouping, sets of worlds sharing continuity
//! - `config`: the engine configuration struct and its file loading
//! - `engine`: the orchestration invoked on domain events (transitions,
//!   death, logout, explicit/periodic saves)
//! - `host`: traits the host game platform implements (live player access,
//!   world rules, opaque item/entity blob codecs)
//!
//! The host wires its event bus to the `SyncEngine` hooks and runs the
//! returned [`engine::PendingApply`] one tick after each world transition.
//! Everything runs inline on the host's main simulation thread; the store
//! is best-effort and no operation here ever aborts an event handler.

pub mod config;
pub mod engine;
pub mod host;
pub mod level_set;
pub mod snapshot;
pub mod store;

pub use config::EngineConfig;
pub use engine::{GlobalSaveTimer, PendingApply, SyncEngine};
pub use host::{EntityCodec, EntityHolder, GameMode, ItemCodec, LivePlayer, WorldView};
pub use level_set::{LevelSet, LevelSetRegistry};
pub use snapshot::{PartialLocation, PlayerSnapshot, StatusEffect};
pub use store::{BackupRecord, SnapshotStore};
