use std::path::{Path, PathBuf};

use crate::errors::{DockError, Result};
use crate::services::size_scanner;
use crate::AppState;

/// Total byte size of a file or directory tree. Runs on the blocking pool so
/// large trees never stall catalog calls or in-flight transfers.
pub async fn scan_path_size(path: String) -> Result<u64> {
    tokio::task::spawn_blocking(move || size_scanner::scan_path_size(Path::new(&path)))
        .await
        .map_err(|err| DockError::Config(format!("size scan join error: {err}")))?
}

/// Opens the path with the OS default handler via the opener collaborator.
pub async fn open_path(state: &AppState, path: String) -> Result<()> {
    let resolved = PathBuf::from(&path);
    if !resolved.exists() {
        return Err(DockError::NotFound(format!("Path does not exist: {path}")));
    }
    state.opener.open(&resolved)
}
