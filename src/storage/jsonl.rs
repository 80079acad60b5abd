//! JSON Lines files: one record per line.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use super::{StorageConfig, StorageError};

/// Record kinds kept in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Team,
    Player,
}

impl EntityType {
    pub fn filename(&self) -> &'static str {
        match self {
            EntityType::Team => "teams.jsonl",
            EntityType::Player => "players.jsonl",
        }
    }
}

/// Writes records of type `T` to one file.
pub struct JsonlWriter<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize> JsonlWriter<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    pub fn for_entity(config: &StorageConfig, entity: EntityType) -> Self {
        Self::new(config.entity_path(entity))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn create_parent(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Append one record, creating the file if needed.
    pub fn append(&self, record: &T) -> Result<(), StorageError> {
        self.create_parent()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut out = BufWriter::new(file);
        writeln!(out, "{}", serde_json::to_string(record)?)?;
        out.flush()?;

        debug!(path = ?self.path, "Appended record");
        Ok(())
    }

    /// Replace the file contents with `records`.
    ///
    /// Writes to a sibling temp file first and renames it over the target,
    /// so readers never observe a half-written file.
    pub fn write_all(&self, records: &[T]) -> Result<usize, StorageError> {
        self.create_parent()?;

        let tmp = self.path.with_extension("jsonl.tmp");
        {
            let mut out = BufWriter::new(File::create(&tmp)?);
            for record in records {
                writeln!(out, "{}", serde_json::to_string(record)?)?;
            }
            out.flush()?;
        }
        fs::rename(&tmp, &self.path)?;

        debug!(path = ?self.path, count = records.len(), "Rewrote records");
        Ok(records.len())
    }
}

/// Reads records of type `T` from one file.
pub struct JsonlReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    pub fn for_entity(config: &StorageConfig, entity: EntityType) -> Self {
        Self::new(config.entity_path(entity))
    }

    /// All parseable records. A missing file reads as empty; malformed lines
    /// are logged and skipped.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let mut records = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(&line) {
                Ok(record) => records.push(record),
                Err(e) => warn!(path = ?self.path, line = index + 1, "Skipping malformed record: {}", e),
            }
        }

        Ok(records)
    }

    pub fn read_where<F>(&self, predicate: F) -> Result<Vec<T>, StorageError>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self.read_all()?.into_iter().filter(predicate).collect())
    }
}
