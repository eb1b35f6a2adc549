use tokio::sync::broadcast;

use crate::errors::Result;
use crate::events::DownloadEvent;
use crate::models::{DownloadQueued, DownloadTask};
use crate::AppState;

/// Validates and registers a transfer, returning its descriptor immediately.
/// Failures after this point are surfaced only through `download-error`
/// events, never as a rejected call.
pub async fn queue_download(
    state: &AppState,
    url: String,
    destination: String,
    file_name: Option<String>,
) -> Result<DownloadQueued> {
    state.downloads.queue(&url, &destination, file_name)
}

/// Snapshot of every task queued during this process's lifetime.
pub async fn list_downloads(state: &AppState) -> Result<Vec<DownloadTask>> {
    Ok(state.downloads.tasks())
}

/// One receiver per UI subscriber; lifecycle events fan out to all of them.
pub fn subscribe_downloads(state: &AppState) -> broadcast::Receiver<DownloadEvent> {
    state.downloads.subscribe()
}
