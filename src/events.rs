use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadProgressEvent {
    pub id: String,
    pub file_name: String,
    pub processed: u64,
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadCompleteEvent {
    pub id: String,
    pub file_name: String,
    pub destination: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadErrorEvent {
    pub id: String,
    pub file_name: String,
    pub message: String,
}

/// Lifecycle notification pushed from the download manager to every current
/// subscriber. Per task, progress values are monotonic and ordered; there is
/// no ordering guarantee across tasks.
#[derive(Debug, Clone)]
pub enum DownloadEvent {
    Progress(DownloadProgressEvent),
    Complete(DownloadCompleteEvent),
    Error(DownloadErrorEvent),
}

impl DownloadEvent {
    /// Wire channel name a UI bridge re-emits this event under.
    pub fn channel(&self) -> &'static str {
        match self {
            Self::Progress(_) => "download-progress",
            Self::Complete(_) => "download-complete",
            Self::Error(_) => "download-error",
        }
    }

    pub fn task_id(&self) -> &str {
        match self {
            Self::Progress(event) => &event.id,
            Self::Complete(event) => &event.id,
            Self::Error(event) => &event.id,
        }
    }
}
