use std::path::{Path, PathBuf};

fn ensure_dir(path: &Path) -> Option<PathBuf> {
    if path.as_os_str().is_empty() {
        return None;
    }
    if std::fs::create_dir_all(path).is_ok() {
        return Some(path.to_path_buf());
    }
    None
}

/// Per-user root for everything the core persists. `GAMEDOCK_ROOT_DIR` wins,
/// then the platform data directory, then the current directory.
pub fn resolve_root_dir() -> PathBuf {
    if let Ok(value) = std::env::var("GAMEDOCK_ROOT_DIR") {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            if let Some(dir) = ensure_dir(Path::new(trimmed)) {
                return dir;
            }
        }
    }

    if let Some(data) = dirs::data_dir() {
        if let Some(found) = ensure_dir(&data.join("gamedock")) {
            return found;
        }
    }

    if let Some(local) = dirs::data_local_dir() {
        if let Some(found) = ensure_dir(&local.join("gamedock")) {
            return found;
        }
    }

    PathBuf::from(".")
}

/// Directory holding the catalog document.
pub fn resolve_data_dir() -> PathBuf {
    let root = resolve_root_dir();
    let config = root.join("config");
    ensure_dir(&config).unwrap_or(root)
}

pub fn resolve_log_dir() -> PathBuf {
    if let Ok(value) = std::env::var("GAMEDOCK_LOG_DIR") {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            if let Some(dir) = ensure_dir(Path::new(trimmed)) {
                return dir;
            }
        }
    }

    let root = resolve_root_dir();
    let logs = root.join("logs");
    ensure_dir(&logs).unwrap_or(logs)
}
