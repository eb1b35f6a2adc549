use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Install lifecycle of a catalog entry. The store never transitions this on
/// its own; only explicit user-driven updates change it.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum InstallStatus {
    #[default]
    NotInstalled,
    Downloading,
    Installed,
    Archived,
}

/// One tracked title in the catalog document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameEntry {
    pub id: String,
    pub title: String,
    pub version: Option<String>,
    pub archive_path: Option<String>,
    pub install_path: Option<String>,
    pub executable_path: Option<String>,
    pub repacker: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: InstallStatus,
    pub notes: Option<String>,
    pub checksum: Option<String>,
    pub color: Option<String>,
    #[serde(default)]
    pub size_bytes: Option<u64>,
    pub added_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Mutable fields of a [`GameEntry`], as submitted by the UI for both create
/// and update calls. `id`, `added_at` and `updated_at` are never caller-set.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GamePayload {
    pub title: String,
    pub version: Option<String>,
    pub archive_path: Option<String>,
    pub install_path: Option<String>,
    pub executable_path: Option<String>,
    pub repacker: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub status: InstallStatus,
    pub notes: Option<String>,
    pub checksum: Option<String>,
    pub color: Option<String>,
    pub size_override: Option<u64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Queued,
    InProgress,
    Completed,
    Error,
}

impl TaskStatus {
    /// Status only ever moves forward along queued -> in-progress ->
    /// {completed | error}.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }
}

/// One queued or running transfer. Lives only in the manager's in-memory
/// registry; the catalog, not the transfer log, survives restarts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadTask {
    pub id: String,
    pub url: String,
    pub destination: String,
    pub file_name: String,
    pub status: TaskStatus,
    pub bytes_received: u64,
    pub total_bytes: Option<u64>,
    pub error: Option<String>,
}

/// Descriptor returned by `queue_download` before the transfer starts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadQueued {
    pub id: String,
    pub file_name: String,
    pub destination: String,
}
