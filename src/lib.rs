//! Backend core of a desktop catalog/launcher for locally-curated game
//! installations: a durable library store, a concurrent download manager and
//! a size scanner, exposed through a thin command/event bridge. The UI shell
//! maps the `commands` functions onto its own IPC surface and re-emits
//! [`events::DownloadEvent`]s under their wire channel names.

pub mod commands;
pub mod errors;
pub mod events;
pub mod logging;
pub mod models;
pub mod services;
pub mod utils;

use std::path::PathBuf;
use std::sync::Arc;

pub use errors::{DockError, Result};
pub use events::DownloadEvent;
pub use models::{DownloadQueued, DownloadTask, GameEntry, GamePayload, InstallStatus, TaskStatus};
pub use services::{DownloadManager, LibraryStore, PathOpener, ShellOpener};

use utils::file::FileManager;
use utils::paths::resolve_data_dir;

/// Everything the bridge needs, constructed once at process start and handed
/// by reference to every command. No module-level singletons.
#[derive(Clone)]
pub struct AppState {
    pub library: Arc<LibraryStore>,
    pub downloads: DownloadManager,
    pub opener: Arc<dyn PathOpener>,
}

impl AppState {
    pub fn new(data_dir: PathBuf) -> Self {
        Self::with_opener(data_dir, Arc::new(ShellOpener))
    }

    pub fn with_opener(data_dir: PathBuf, opener: Arc<dyn PathOpener>) -> Self {
        let files = FileManager::new(data_dir);
        Self {
            library: Arc::new(LibraryStore::new(files)),
            downloads: DownloadManager::new(),
            opener,
        }
    }

    /// Resolves the per-user data directory (`GAMEDOCK_ROOT_DIR` override,
    /// else the platform application-data location).
    pub fn from_env() -> Self {
        Self::new(resolve_data_dir())
    }
}
