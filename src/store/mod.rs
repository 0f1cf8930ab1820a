//! Snapshot persistence on the local filesystem
//!
//! - `types`: backup records and store error types
//! - `manager`: the SnapshotStore repository

pub mod manager;
pub mod types;

pub use manager::SnapshotStore;
pub use types::{BACKUP_TIMESTAMP_FORMAT, BackupRecord, StoreError};
