//! Team and player persistence.
//!
//! Records live as JSON Lines files under `<data_dir>/store/`. Match data is
//! fetched fresh for every computation and never written here.

mod jsonl;
mod repository;

pub use jsonl::{EntityType, JsonlReader, JsonlWriter};
pub use repository::{JsonlTeamRepository, TeamRepository};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record not found: {0}")]
    NotFound(String),
}

/// Storage locations.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn store_dir(&self) -> PathBuf {
        self.data_dir.join("store")
    }

    pub fn entity_path(&self, entity: EntityType) -> PathBuf {
        self.store_dir().join(entity.filename())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}
