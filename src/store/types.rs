//! Store data types and error definitions

use crate::snapshot::PlayerSnapshot;
use chrono::NaiveDateTime;

/// Timestamp format used for backup filenames.
///
/// Fixed-width and seconds-resolution, so lexicographic filename order is
/// chronological order and two backups within the same second collide (the
/// later write wins, which is accepted).
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y.%m.%d.%H.%M.%S";

/// A snapshot paired with the wall-clock time it was captured.
///
/// Created only by the backup path and never mutated afterwards. Records are
/// presented newest-first when browsing.
#[derive(Debug, Clone, PartialEq)]
pub struct BackupRecord {
    pub snapshot: PlayerSnapshot,
    pub saved_at: NaiveDateTime,
}

impl BackupRecord {
    pub fn new(snapshot: PlayerSnapshot, saved_at: NaiveDateTime) -> Self {
        BackupRecord { snapshot, saved_at }
    }

    /// The identity used for display and deduplication: the capture time at
    /// seconds resolution, in the backup filename format.
    pub fn display_id(&self) -> String {
        self.saved_at.format(BACKUP_TIMESTAMP_FORMAT).to_string()
    }
}

/// Error types for store operations.
///
/// These stay internal to the store: every public store operation is total
/// and converts failures into logged defaults per the engine's fire-and-
/// forget durability policy.
#[derive(Debug)]
pub enum StoreError {
    IoError(std::io::Error),
    SerializationError(serde_json::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::IoError(e) => write!(f, "IO error: {}", e),
            StoreError::SerializationError(e) => write!(f, "Serialization error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::IoError(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::SerializationError(err)
    }
}
