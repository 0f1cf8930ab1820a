//! Level-set configuration
//!
//! A level set is an ordered group of worlds treated as one continuity
//! unit: saving or loading for any member propagates non-positional player
//! state to all other members. Sets are configured in a small JSON document
//! at the store root; a world absent from every configured set is its own
//! singleton set.

use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the level-set configuration file under the store root.
pub const LEVEL_SET_CONFIG_FILE: &str = "level-set-config.json";

/// An ordered, unique-membership group of world names sharing continuity.
///
/// Membership is symmetric: resolving a set for a world always yields a set
/// containing that world itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LevelSet {
    worlds: Vec<String>,
}

/// Deserializes through [`LevelSet::new`] so that duplicate members in the
/// configuration file are dropped, keeping the unique-membership invariant
/// no matter where a set comes from.
impl<'de> Deserialize<'de> for LevelSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let worlds = Vec::<String>::deserialize(deserializer)?;
        Ok(LevelSet::new(worlds))
    }
}

impl LevelSet {
    /// Creates a set from a list of world names, dropping duplicates while
    /// preserving the configured order.
    pub fn new(worlds: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut unique: Vec<String> = Vec::new();
        for world in worlds {
            let world = world.into();
            if !unique.contains(&world) {
                unique.push(world);
            }
        }
        LevelSet { worlds: unique }
    }

    /// A set containing exactly one world. Used for worlds that are not
    /// part of any configured set.
    pub fn singleton(world: impl Into<String>) -> Self {
        LevelSet {
            worlds: vec![world.into()],
        }
    }

    pub fn contains(&self, world: &str) -> bool {
        self.worlds.iter().any(|member| member == world)
    }

    /// Member world names in configured order.
    pub fn worlds(&self) -> &[String] {
        &self.worlds
    }

    pub fn len(&self) -> usize {
        self.worlds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.worlds.is_empty()
    }
}

/// On-disk schema: `{ "level_sets": [ ["world", ...], ... ] }`.
#[derive(Debug, Serialize, Deserialize)]
struct LevelSetDocument {
    #[serde(default)]
    level_sets: Vec<LevelSet>,
}

/// Loads and resolves the configured level sets.
///
/// The configuration is read once at construction and cached for the
/// process lifetime; [`LevelSetRegistry::reload`] replaces the cached list
/// from disk on demand.
pub struct LevelSetRegistry {
    config_path: PathBuf,
    sets: Vec<LevelSet>,
}

impl LevelSetRegistry {
    /// Loads the registry from `level-set-config.json` under the store
    /// root. A missing file is replaced by the default configuration (one
    /// set grouping the three canonical worlds), which is also persisted.
    pub fn load(store_root: impl AsRef<Path>) -> Self {
        let config_path = store_root.as_ref().join(LEVEL_SET_CONFIG_FILE);
        let sets = read_or_create(&config_path);
        LevelSetRegistry { config_path, sets }
    }

    /// The default configuration used when no file exists yet.
    pub fn default_sets() -> Vec<LevelSet> {
        vec![LevelSet::new(["world", "world_nether", "world_the_end"])]
    }

    /// Returns the set the given world belongs to.
    ///
    /// Linear search through the configured sets in order; the first set
    /// containing the world wins. A world in no configured set resolves to
    /// a singleton set of itself.
    pub fn resolve_set(&self, world: &str) -> LevelSet {
        self.sets
            .iter()
            .find(|set| set.contains(world))
            .cloned()
            .unwrap_or_else(|| LevelSet::singleton(world))
    }

    /// All configured sets, for listing/reporting.
    pub fn all_sets(&self) -> &[LevelSet] {
        &self.sets
    }

    /// Re-reads the configuration from disk, replacing the cached list.
    pub fn reload(&mut self) {
        self.sets = read_or_create(&self.config_path);
    }
}

/// Reads the level-set document, creating the default one if the file does
/// not exist. A corrupt or unreadable file yields no configured sets, so
/// every world falls back to its singleton set.
fn read_or_create(config_path: &Path) -> Vec<LevelSet> {
    if !config_path.exists() {
        let document = LevelSetDocument {
            level_sets: LevelSetRegistry::default_sets(),
        };
        if let Err(e) = write_config(config_path, &document) {
            warn!(
                "Failed to write default level-set config {}: {}",
                config_path.display(),
                e
            );
        }
        return document.level_sets;
    }

    match fs::read_to_string(config_path) {
        Ok(json) => match serde_json::from_str::<LevelSetDocument>(&json) {
            Ok(document) => document.level_sets,
            Err(e) => {
                warn!(
                    "Failed to parse level-set config {}: {}",
                    config_path.display(),
                    e
                );
                Vec::new()
            }
        },
        Err(e) => {
            warn!(
                "Failed to read level-set config {}: {}",
                config_path.display(),
                e
            );
            Vec::new()
        }
    }
}

fn write_config(config_path: &Path, document: &LevelSetDocument) -> Result<(), std::io::Error> {
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(document)?;
    fs::write(config_path, json)
}
