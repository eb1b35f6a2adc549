use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use uuid::Uuid;

use crate::errors::{DockError, Result};
use crate::models::{GameEntry, GamePayload};
use crate::services::size_scanner::scan_path_size;
use crate::utils::file::FileManager;

/// Durable CRUD over the catalog document. Mutations are serialized through
/// an internal lock and persisted with a full-document atomic replace before
/// the call returns; reads take no lock and see either the old or the new
/// document.
pub struct LibraryStore {
    files: FileManager,
    write_guard: Mutex<()>,
}

impl LibraryStore {
    pub fn new(files: FileManager) -> Self {
        Self {
            files,
            write_guard: Mutex::new(()),
        }
    }

    /// Full catalog, most recently updated first. A missing or empty document
    /// is an empty catalog; a malformed one is an error, never silently
    /// discarded.
    pub fn load(&self) -> Result<Vec<GameEntry>> {
        let mut catalog = self.read_catalog()?;
        catalog.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(catalog)
    }

    pub fn create(&self, payload: GamePayload) -> Result<GameEntry> {
        let _guard = self.lock_writer()?;
        let mut catalog = self.read_catalog()?;

        let mut entry = entry_from_payload(payload, None)?;
        entry.id = Uuid::new_v4().to_string();
        entry.added_at = Utc::now();
        entry.updated_at = entry.added_at;

        catalog.push(entry.clone());
        self.persist(&catalog)?;
        tracing::info!("created catalog entry {} ({})", entry.id, entry.title);
        Ok(entry)
    }

    pub fn update(&self, id: &str, payload: GamePayload) -> Result<GameEntry> {
        let _guard = self.lock_writer()?;
        let mut catalog = self.read_catalog()?;

        let existing = catalog
            .iter_mut()
            .find(|game| game.id == id)
            .ok_or_else(|| DockError::NotFound(format!("Game {id} not found")))?;

        let mut entry = entry_from_payload(payload, Some(existing.clone()))?;
        entry.id = existing.id.clone();
        entry.added_at = existing.added_at;
        entry.updated_at = Utc::now();
        *existing = entry.clone();

        self.persist(&catalog)?;
        Ok(entry)
    }

    pub fn remove(&self, id: &str) -> Result<()> {
        let _guard = self.lock_writer()?;
        let mut catalog = self.read_catalog()?;

        let initial_len = catalog.len();
        catalog.retain(|game| game.id != id);
        if catalog.len() == initial_len {
            return Err(DockError::NotFound(format!("Game {id} not found")));
        }

        self.persist(&catalog)?;
        tracing::info!("removed catalog entry {id}");
        Ok(())
    }

    fn read_catalog(&self) -> Result<Vec<GameEntry>> {
        let path = self.files.library_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        Ok(serde_json::from_str(&content)?)
    }

    fn persist(&self, catalog: &[GameEntry]) -> Result<()> {
        let document = serde_json::to_string_pretty(catalog)?;
        self.files
            .write_atomic(&self.files.library_path(), document.as_bytes())?;
        Ok(())
    }

    fn lock_writer(&self) -> Result<std::sync::MutexGuard<'_, ()>> {
        self.write_guard
            .lock()
            .map_err(|_| DockError::Config("library writer lock poisoned".to_string()))
    }
}

/// Builds the stored entry from a payload, reusing the existing record's
/// identity fields on update. Size resolution: explicit override, else a
/// best-effort scan of the archive or install path, else whatever the entry
/// already had.
fn entry_from_payload(payload: GamePayload, existing: Option<GameEntry>) -> Result<GameEntry> {
    let GamePayload {
        title,
        version,
        archive_path,
        install_path,
        executable_path,
        repacker,
        tags,
        status,
        notes,
        checksum,
        color,
        size_override,
    } = payload;

    let title = title.trim();
    if title.is_empty() {
        return Err(DockError::Validation("title cannot be empty".to_string()));
    }

    let now = Utc::now();
    let mut entry = existing.unwrap_or(GameEntry {
        id: String::new(),
        title: String::new(),
        version: None,
        archive_path: None,
        install_path: None,
        executable_path: None,
        repacker: None,
        tags: Vec::new(),
        status: Default::default(),
        notes: None,
        checksum: None,
        color: None,
        size_bytes: None,
        added_at: now,
        updated_at: now,
    });

    let archive_path = archive_path.and_then(non_empty);
    let install_path = install_path.and_then(non_empty);

    entry.title = title.to_string();
    entry.version = version.and_then(non_empty);
    entry.archive_path = archive_path.clone();
    entry.install_path = install_path.clone();
    entry.executable_path = executable_path.and_then(non_empty);
    entry.repacker = repacker.and_then(non_empty);
    entry.tags = normalize_tags(tags);
    entry.status = status;
    entry.notes = notes.and_then(non_empty);
    entry.checksum = checksum.and_then(non_empty);
    entry.color = color.and_then(non_empty);

    if let Some(size) = size_override.or_else(|| {
        archive_path
            .as_ref()
            .or(install_path.as_ref())
            .and_then(|path| scan_path_size(Path::new(path)).ok())
    }) {
        entry.size_bytes = Some(size);
    }

    Ok(entry)
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Splits comma-separated values, trims, drops empties and deduplicates while
/// keeping first-seen order.
fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut parsed: Vec<String> = Vec::new();

    for tag in tags {
        for value in tag.split(',') {
            let trimmed = value.trim();
            if !trimmed.is_empty() && !parsed.iter().any(|seen| seen == trimmed) {
                parsed.push(trimmed.to_string());
            }
        }
    }

    parsed
}
