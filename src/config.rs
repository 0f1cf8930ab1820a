//! Engine configuration
//!
//! The general configuration consumed by the sync engine, as an explicit
//! struct constructed at startup and passed by reference. Reloading means
//! replacing the struct, never mutating a global.

use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the engine configuration file under the store root.
pub const CONFIG_FILE: &str = "config.json";

/// Floor for the periodic global-save interval: one minute at 20 ticks per
/// second. Shorter configured intervals are clamped up to this.
pub const MIN_GLOBAL_SAVE_INTERVAL: u64 = 20 * 60;

/// Default periodic global-save interval: five minutes of ticks.
const DEFAULT_GLOBAL_SAVE_INTERVAL: u64 = 20 * 60 * 5;

fn default_global_save_interval() -> u64 {
    DEFAULT_GLOBAL_SAVE_INTERVAL
}

/// Per-world behavior toggles, keyed by world name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldsConfig {
    /// Worlds where automatic coordinate placement is skipped on apply.
    #[serde(rename = "disable-coordinate-handling", default)]
    pub disable_coordinate_handling: Vec<String>,

    /// Worlds where the location is always discarded on save.
    #[serde(rename = "null-coordinates", default)]
    pub null_coordinates: Vec<String>,

    /// Worlds where inventory loss on death is forced regardless of the
    /// platform's keep-inventory rule.
    #[serde(rename = "no-keepinventory", default)]
    pub no_keepinventory: Vec<String>,

    /// Periodic global-save interval in ticks.
    #[serde(rename = "global-save-tick-interval", default = "default_global_save_interval")]
    pub global_save_tick_interval: u64,
}

impl Default for WorldsConfig {
    fn default() -> Self {
        WorldsConfig {
            disable_coordinate_handling: Vec::new(),
            null_coordinates: Vec::new(),
            no_keepinventory: Vec::new(),
            global_save_tick_interval: DEFAULT_GLOBAL_SAVE_INTERVAL,
        }
    }
}

/// The engine's configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub worlds: WorldsConfig,
}

impl EngineConfig {
    /// Loads the configuration from `config.json` under the store root.
    ///
    /// A missing file is created with the defaults; a corrupt file is
    /// logged and replaced in memory (not on disk) by the defaults.
    pub fn load(store_root: impl AsRef<Path>) -> Self {
        let path = store_root.as_ref().join(CONFIG_FILE);

        if !path.exists() {
            let config = EngineConfig::default();
            if let Err(e) = config.persist(&path) {
                warn!("Failed to write default config {}: {}", path.display(), e);
            }
            return config;
        }

        match fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(config) => config,
                Err(e) => {
                    warn!("Failed to parse config {}: {}", path.display(), e);
                    EngineConfig::default()
                }
            },
            Err(e) => {
                warn!("Failed to read config {}: {}", path.display(), e);
                EngineConfig::default()
            }
        }
    }

    fn persist(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
    }

    /// Whether saves for this world discard the player's location.
    pub fn nulls_coordinates(&self, world: &str) -> bool {
        self.worlds.null_coordinates.iter().any(|name| name == world)
    }

    /// Whether applies for this world skip coordinate placement.
    pub fn coordinate_handling_disabled(&self, world: &str) -> bool {
        self.worlds
            .disable_coordinate_handling
            .iter()
            .any(|name| name == world)
    }

    /// Whether death in this world forces inventory loss regardless of the
    /// platform's keep-inventory rule.
    pub fn forces_inventory_loss(&self, world: &str) -> bool {
        self.worlds.no_keepinventory.iter().any(|name| name == world)
    }

    /// The periodic global-save interval in ticks, clamped to the one
    /// minute floor.
    pub fn global_save_interval(&self) -> u64 {
        self.worlds
            .global_save_tick_interval
            .max(MIN_GLOBAL_SAVE_INTERVAL)
    }
}
