use std::path::{Path, PathBuf};
use std::process::Command;

use crate::errors::{DockError, Result};

/// OS integration collaborator: opens a path with the platform's default
/// handler (file manager, archive tool, or process launch for executables).
/// The core only ever calls this synchronously and treats it as a black box.
pub trait PathOpener: Send + Sync {
    fn open(&self, path: &Path) -> Result<()>;
}

/// Native file dialog collaborator. Returns the picked path, or `None` when
/// the user cancelled. Implemented by the UI shell; the core never blocks on
/// it outside an explicit user action.
pub trait FileDialog: Send + Sync {
    fn pick_file(&self) -> Option<PathBuf>;
    fn pick_directory(&self) -> Option<PathBuf>;
}

/// Default [`PathOpener`] backed by the platform open command.
#[derive(Clone, Default)]
pub struct ShellOpener;

impl PathOpener for ShellOpener {
    fn open(&self, path: &Path) -> Result<()> {
        #[cfg(target_os = "windows")]
        let mut command = {
            let mut command = Command::new("cmd");
            command.args(["/C", "start", ""]).arg(path);
            command
        };
        #[cfg(target_os = "macos")]
        let mut command = {
            let mut command = Command::new("open");
            command.arg(path);
            command
        };
        #[cfg(all(unix, not(target_os = "macos")))]
        let mut command = {
            let mut command = Command::new("xdg-open");
            command.arg(path);
            command
        };

        let status = command.status()?;
        if !status.success() {
            return Err(DockError::Config(format!(
                "opener exited with {status} for {}",
                path.display()
            )));
        }
        Ok(())
    }
}
