use crate::{
    domain::{board::Lane, calendar::Event, record::Record},
    error::Result,
    seed::Seed,
    state::Session,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[cfg(feature = "file-storage")]
pub mod file_storage;

/// One-way dump of a session's data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub export_id: Uuid,
    pub exported_at: DateTime<Utc>,
    pub records: Vec<Record>,
    pub lanes: Vec<Lane>,
    pub events: Vec<Event>,
}

impl Snapshot {
    /// Captures the current records, lanes and events
    pub fn capture(session: &Session) -> Self {
        Self {
            export_id: Uuid::new_v4(),
            exported_at: Utc::now(),
            records: session.directory().records().to_vec(),
            lanes: session.board().lanes().to_vec(),
            events: session.calendar().events().to_vec(),
        }
    }
}

/// Storage trait for seed data, exports and calendar imports
#[async_trait]
pub trait Storage: Send + Sync {
    /// Initializes the storage backend
    async fn initialize(&self) -> Result<()>;

    /// Loads the seed for a new session, falling back to the built-in data
    ///
    /// A seed that repeats an ID is rejected.
    async fn load_seed(&self) -> Result<Seed>;

    /// Writes a snapshot and returns where it went
    async fn export_snapshot(&self, snapshot: &Snapshot) -> Result<PathBuf>;

    /// Reads a JSON array of events from the given file
    async fn import_events(&self, path: &Path) -> Result<Vec<Event>>;

    /// Checks if the storage directory exists
    async fn is_initialized(&self) -> bool;
}
