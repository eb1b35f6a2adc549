use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;
use tokio::sync::{broadcast, Semaphore};
use uuid::Uuid;

use crate::errors::{DockError, Result};
use crate::events::{
    DownloadCompleteEvent, DownloadErrorEvent, DownloadEvent, DownloadProgressEvent,
};
use crate::models::{DownloadQueued, DownloadTask, TaskStatus};

const DEFAULT_MAX_CONCURRENT_DOWNLOADS: usize = 4;
const MAX_CONCURRENT_DOWNLOADS: usize = 16;
const PROGRESS_INTERVAL: Duration = Duration::from_millis(150);

/// Executes user-queued file transfers concurrently and reports lifecycle
/// events over a broadcast channel. The registry lock is only ever held to
/// record a state transition, never across a network or disk operation.
#[derive(Clone)]
pub struct DownloadManager {
    client: reqwest::Client,
    registry: Arc<Mutex<HashMap<String, DownloadTask>>>,
    events: broadcast::Sender<DownloadEvent>,
    limiter: Arc<Semaphore>,
}

impl Default for DownloadManager {
    fn default() -> Self {
        Self::new()
    }
}

impl DownloadManager {
    pub fn new() -> Self {
        let connect_timeout_seconds = std::env::var("GAMEDOCK_HTTP_CONNECT_TIMEOUT_SECONDS")
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map(|value| value.clamp(1, 120))
            .unwrap_or(20);
        let max_concurrent = std::env::var("GAMEDOCK_MAX_CONCURRENT_DOWNLOADS")
            .ok()
            .and_then(|value| value.trim().parse::<usize>().ok())
            .map(|value| value.clamp(1, MAX_CONCURRENT_DOWNLOADS))
            .unwrap_or(DEFAULT_MAX_CONCURRENT_DOWNLOADS);

        // No total request timeout: transfers may legitimately run for hours.
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_seconds))
            .build()
            .unwrap_or_default();

        let (events, _) = broadcast::channel(256);

        Self {
            client,
            registry: Arc::new(Mutex::new(HashMap::new())),
            events,
            limiter: Arc::new(Semaphore::new(max_concurrent)),
        }
    }

    /// One receiver per UI subscriber; events fan out to all of them.
    pub fn subscribe(&self) -> broadcast::Receiver<DownloadEvent> {
        self.events.subscribe()
    }

    pub fn task(&self, id: &str) -> Option<DownloadTask> {
        self.registry.lock().ok()?.get(id).cloned()
    }

    pub fn tasks(&self) -> Vec<DownloadTask> {
        self.registry
            .lock()
            .map(|map| map.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Validates the request, registers a `queued` task and returns its
    /// descriptor immediately; the transfer itself runs as an independent
    /// spawned task and only ever reports back through events.
    pub fn queue(
        &self,
        url: &str,
        destination: &str,
        file_name: Option<String>,
    ) -> Result<DownloadQueued> {
        if url.trim().is_empty() {
            return Err(DockError::Validation("URL cannot be empty".to_string()));
        }
        url::Url::parse(url.trim())
            .map_err(|err| DockError::Validation(format!("malformed URL: {err}")))?;
        if destination.trim().is_empty() {
            return Err(DockError::Validation(
                "destination cannot be empty".to_string(),
            ));
        }

        let destination_dir = PathBuf::from(destination.trim());
        fs::create_dir_all(&destination_dir).map_err(|err| {
            DockError::Validation(format!(
                "destination {} is not usable: {err}",
                destination_dir.display()
            ))
        })?;

        let id = Uuid::new_v4().to_string();
        let file_name = file_name
            .filter(|name| !name.trim().is_empty())
            .or_else(|| infer_file_name(url))
            .unwrap_or_else(|| format!("download-{id}"));

        let task = DownloadTask {
            id: id.clone(),
            url: url.trim().to_string(),
            destination: destination_dir.to_string_lossy().to_string(),
            file_name: file_name.clone(),
            status: TaskStatus::Queued,
            bytes_received: 0,
            total_bytes: None,
            error: None,
        };
        self.with_task_map(|map| {
            map.insert(id.clone(), task.clone());
        })?;

        let manager = self.clone();
        let task_id = id.clone();
        let task_url = task.url.clone();
        let target = destination_dir.join(&file_name);
        let queued = DownloadQueued {
            id,
            file_name: file_name.clone(),
            destination: task.destination.clone(),
        };
        let destination_text = task.destination.clone();

        tokio::spawn(async move {
            match manager
                .run_transfer(&task_id, &task_url, &target, &file_name)
                .await
            {
                Ok(()) => {
                    let _ = manager.update_task(&task_id, |task| {
                        task.status = TaskStatus::Completed;
                    });
                    let _ = manager
                        .events
                        .send(DownloadEvent::Complete(DownloadCompleteEvent {
                            id: task_id.clone(),
                            file_name: file_name.clone(),
                            destination: destination_text.clone(),
                        }));
                    tracing::info!("download {task_id} completed into {destination_text}");
                }
                Err(err) => {
                    let message = err.to_string();
                    tracing::error!("download {task_id} failed: {message}");
                    let _ = manager.update_task(&task_id, |task| {
                        task.status = TaskStatus::Error;
                        task.error = Some(message.clone());
                    });
                    // The partially written file is deliberately left in
                    // place for manual inspection or external resume.
                    let _ = manager.events.send(DownloadEvent::Error(DownloadErrorEvent {
                        id: task_id.clone(),
                        file_name: file_name.clone(),
                        message,
                    }));
                }
            }
        });

        Ok(queued)
    }

    async fn run_transfer(
        &self,
        id: &str,
        url: &str,
        target: &Path,
        file_name: &str,
    ) -> Result<()> {
        let _permit = self
            .limiter
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| DockError::Config("download limiter closed".to_string()))?;

        let response = self.client.get(url).send().await?.error_for_status()?;
        let total = response.content_length();

        self.update_task(id, |task| {
            task.status = TaskStatus::InProgress;
            task.total_bytes = total;
        })?;

        let mut file = tokio::fs::File::create(target).await?;
        let mut stream = response.bytes_stream();
        let mut received: u64 = 0;
        // None until the first chunk, so the first progress report is never
        // held back by the throttle.
        let mut last_emit: Option<Instant> = None;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            received += chunk.len() as u64;

            self.update_task(id, |task| {
                task.bytes_received = received;
            })?;

            // Coalesced, but always ordered and monotonic for this task.
            if last_emit.map_or(true, |at| at.elapsed() >= PROGRESS_INTERVAL) {
                last_emit = Some(Instant::now());
                let _ = self
                    .events
                    .send(DownloadEvent::Progress(DownloadProgressEvent {
                        id: id.to_string(),
                        file_name: file_name.to_string(),
                        processed: received,
                        total,
                    }));
            }
        }

        file.flush().await?;

        if let Some(total) = total {
            if received < total {
                return Err(DockError::Config(format!(
                    "transfer ended after {received} of {total} bytes"
                )));
            }
        }

        let _ = self
            .events
            .send(DownloadEvent::Progress(DownloadProgressEvent {
                id: id.to_string(),
                file_name: file_name.to_string(),
                processed: received,
                total,
            }));

        Ok(())
    }

    fn update_task<F>(&self, id: &str, apply: F) -> Result<()>
    where
        F: FnOnce(&mut DownloadTask),
    {
        self.with_task_map(|map| {
            if let Some(task) = map.get_mut(id) {
                apply(task);
            }
        })
    }

    fn with_task_map<F, T>(&self, apply: F) -> Result<T>
    where
        F: FnOnce(&mut HashMap<String, DownloadTask>) -> T,
    {
        let mut map = self
            .registry
            .lock()
            .map_err(|_| DockError::Config("download registry lock poisoned".to_string()))?;
        Ok(apply(&mut map))
    }
}

/// Last path segment of the URL, if it has a non-empty one.
fn infer_file_name(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url.trim()).ok()?;
    let last = parsed.path_segments()?.last()?;
    if last.is_empty() {
        None
    } else {
        Some(last.to_string())
    }
}
