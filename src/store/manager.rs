//! Filesystem-backed snapshot store
//!
//! This module provides the SnapshotStore struct which handles:
//! - Saving and loading snapshots at their canonical (world, player) path
//! - Writing timestamped backups and listing them newest-first
//! - Enumerating the worlds that have stored data
//!
//! All operations are best-effort: a failed write is logged and swallowed,
//! and a missing or corrupt file loads as the empty-default snapshot. No
//! store operation may abort a domain event handler.

use super::types::{BACKUP_TIMESTAMP_FORMAT, BackupRecord, StoreError};
use crate::snapshot::{PlayerSnapshot, codec};
use chrono::{Local, NaiveDateTime};
use log::warn;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory under the store root holding one subdirectory per world.
const WORLDS_DIR: &str = "worlds";

/// Reserved directory name under the worlds index for backup storage.
/// Never a valid world name.
const BACKUPS_DIR: &str = "backups";

/// Filesystem repository for player snapshots, keyed by (world, player id).
///
/// Layout under the store root:
///
/// ```text
/// <root>/worlds/<world>/<player_id>.json
/// <root>/worlds/backups/<world>/<player_id>/<YYYY.MM.DD.HH.mm.ss>.json
/// ```
///
/// The store owns the on-disk representation exclusively; every read or
/// write produces a fresh snapshot value. Access is single-threaded by the
/// host's scheduling model, so no locking is needed beyond creating parent
/// directories before writing.
pub struct SnapshotStore {
    root: PathBuf,
}

impl SnapshotStore {
    /// Creates a store rooted at the given directory. Directories are
    /// created lazily by the write paths, so this never touches the disk.
    pub fn new(root: impl AsRef<Path>) -> Self {
        SnapshotStore {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// The conventional store root inside the platform data directory.
    pub fn default_root() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("playervault")
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn worlds_dir(&self) -> PathBuf {
        self.root.join(WORLDS_DIR)
    }

    /// Canonical path for a player's snapshot in a world.
    fn snapshot_path(&self, world: &str, player_id: &str) -> PathBuf {
        self.worlds_dir()
            .join(world)
            .join(format!("{}.json", player_id))
    }

    /// Backup directory for a player in a world.
    fn backup_dir(&self, world: &str, player_id: &str) -> PathBuf {
        self.worlds_dir().join(BACKUPS_DIR).join(world).join(player_id)
    }

    /// Writes a snapshot to its canonical path, overwriting any prior one
    /// (last-writer-wins). Failures are logged, not propagated.
    ///
    /// Returns the canonical path the snapshot belongs at.
    pub fn save(&self, world: &str, player_id: &str, snapshot: &PlayerSnapshot) -> PathBuf {
        let path = self.snapshot_path(world, player_id);

        if let Err(e) = write_document(&path, &codec::encode(snapshot)) {
            warn!("Failed to save snapshot for {} in {}: {}", player_id, world, e);
        }

        path
    }

    /// Reads the snapshot at the canonical path for (world, player).
    ///
    /// A missing file yields the empty-default snapshot silently; an
    /// unreadable or corrupt file does the same with a warning. This is what
    /// makes "never saved" and "explicitly emptied" indistinguishable.
    pub fn load(&self, world: &str, player_id: &str) -> PlayerSnapshot {
        let path = self.snapshot_path(world, player_id);

        if !path.exists() {
            return PlayerSnapshot::empty();
        }

        match read_document(&path) {
            Ok(document) => codec::decode(&document),
            Err(e) => {
                warn!(
                    "Failed to read snapshot for {} in {}, treating as empty: {}",
                    player_id, world, e
                );
                PlayerSnapshot::empty()
            }
        }
    }

    /// Whether a snapshot file exists for (world, player). The load path
    /// never needs this, but callers that care about "never saved" can ask.
    pub fn has_snapshot(&self, world: &str, player_id: &str) -> bool {
        self.snapshot_path(world, player_id).exists()
    }

    /// Writes a timestamped backup copy of the snapshot.
    ///
    /// The filename is the current local time at seconds resolution; two
    /// backups within the same second collide and the last one wins.
    pub fn backup(&self, world: &str, player_id: &str, snapshot: &PlayerSnapshot) -> PathBuf {
        self.backup_at(world, player_id, snapshot, Local::now().naive_local())
    }

    fn backup_at(
        &self,
        world: &str,
        player_id: &str,
        snapshot: &PlayerSnapshot,
        saved_at: NaiveDateTime,
    ) -> PathBuf {
        let filename = format!("{}.json", saved_at.format(BACKUP_TIMESTAMP_FORMAT));
        let path = self.backup_dir(world, player_id).join(filename);

        if let Err(e) = write_document(&path, &codec::encode(snapshot)) {
            warn!(
                "Failed to write backup for {} in {}: {}",
                player_id, world, e
            );
        }

        path
    }

    /// Lists a player's backups for a world, newest first.
    ///
    /// `range_start..range_end` are indices into the newest-first sequence;
    /// an absent `range_end` means "to the oldest available". Files whose
    /// name does not parse as a backup timestamp are silently skipped, and
    /// entries that fail to read are skipped with a warning.
    pub fn list_backups(
        &self,
        world: &str,
        player_id: &str,
        range_start: usize,
        range_end: Option<usize>,
    ) -> Vec<BackupRecord> {
        let dir = self.backup_dir(world, player_id);

        let Ok(entries) = fs::read_dir(&dir) else {
            return Vec::new();
        };

        let mut stamped: Vec<(NaiveDateTime, PathBuf)> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let path = entry.path();
                let stem = path.file_stem()?.to_str()?;
                let saved_at = NaiveDateTime::parse_from_str(stem, BACKUP_TIMESTAMP_FORMAT).ok()?;
                Some((saved_at, path))
            })
            .collect();

        // The fixed-width timestamp format makes filename order and
        // chronological order agree; newest first for browsing.
        stamped.sort_by(|a, b| b.0.cmp(&a.0));

        let end = range_end.unwrap_or(stamped.len()).min(stamped.len());
        let start = range_start.min(end);

        stamped[start..end]
            .iter()
            .filter_map(|(saved_at, path)| match read_document(path) {
                Ok(document) => Some(BackupRecord::new(codec::decode(&document), *saved_at)),
                Err(e) => {
                    warn!("Skipping unreadable backup {}: {}", path.display(), e);
                    None
                }
            })
            .collect()
    }

    /// Enumerates the worlds that have stored snapshot data: every
    /// top-level directory under the worlds index except the reserved
    /// backups directory.
    pub fn list_managed_worlds(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(self.worlds_dir()) else {
            return Vec::new();
        };

        let mut worlds: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name != BACKUPS_DIR)
            .collect();

        worlds.sort();
        worlds
    }
}

/// Writes a JSON document, creating any missing parent directories first.
fn write_document(path: &Path, document: &Value) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(document)?;
    fs::write(path, json)?;
    Ok(())
}

/// Reads a JSON document from a file.
fn read_document(path: &Path) -> Result<Value, StoreError> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}
