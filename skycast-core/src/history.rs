//! Persisted search history: past city names plus the last snapshot.
//!
//! Two JSON files in one directory, loaded once at startup and rewritten on
//! every mutation. Writes are single-threaded, last-write-wins.

use anyhow::{Context, Result};
use serde::{Serialize, de::DeserializeOwned};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::config;
use crate::model::{HistoryRecord, Snapshot};

const CITIES_FILE: &str = "search_history.json";
const SNAPSHOT_FILE: &str = "last_snapshot.json";

#[derive(Debug)]
pub struct HistoryStore {
    dir: PathBuf,
    record: HistoryRecord,
}

impl HistoryStore {
    /// Open the store in the platform data directory.
    pub fn open_default() -> Result<Self> {
        let dirs = config::project_dirs()?;
        Self::open(dirs.data_dir())
    }

    /// Open the store in the given directory. Absent files yield an empty
    /// city list and no snapshot.
    pub fn open(dir: &Path) -> Result<Self> {
        let record = HistoryRecord {
            cities: read_json(&dir.join(CITIES_FILE))?.unwrap_or_default(),
            last_snapshot: read_json(&dir.join(SNAPSHOT_FILE))?,
        };

        Ok(Self { dir: dir.to_path_buf(), record })
    }

    pub fn record(&self) -> &HistoryRecord {
        &self.record
    }

    /// Record a successful search: add the city unless already present
    /// (exact, case-sensitive match), overwrite the last snapshot, persist
    /// both files.
    pub fn record_search(&mut self, city: &str, snapshot: &Snapshot) -> Result<()> {
        if !self.record.cities.iter().any(|c| c == city) {
            self.record.cities.push(city.to_owned());
        }
        self.record.last_snapshot = Some(snapshot.clone());

        self.persist_cities()?;
        write_json(&self.dir.join(SNAPSHOT_FILE), snapshot)?;

        tracing::debug!(city, "recorded search");
        Ok(())
    }

    /// Remove one city from the history; the last snapshot is left alone.
    /// Returns whether the city was present.
    pub fn remove_city(&mut self, city: &str) -> Result<bool> {
        let before = self.record.cities.len();
        self.record.cities.retain(|c| c != city);
        let removed = self.record.cities.len() != before;

        if removed {
            self.persist_cities()?;
            tracing::debug!(city, "removed city from history");
        }
        Ok(removed)
    }

    /// Drop the city list and the last snapshot, in memory and on disk.
    pub fn clear(&mut self) -> Result<()> {
        self.record = HistoryRecord::default();
        remove_if_present(&self.dir.join(CITIES_FILE))?;
        remove_if_present(&self.dir.join(SNAPSHOT_FILE))?;

        tracing::debug!("history cleared");
        Ok(())
    }

    fn persist_cities(&self) -> Result<()> {
        write_json(&self.dir.join(CITIES_FILE), &self.record.cities)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let value = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    Ok(Some(value))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create data directory: {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;

    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn remove_if_present(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}
