use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const LIBRARY_FILE: &str = "library.json";

/// Filesystem anchor for the per-user application data directory. Owns the
/// location of the catalog document and the atomic-replace write discipline.
#[derive(Clone)]
pub struct FileManager {
    data_dir: PathBuf,
}

impl FileManager {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn library_path(&self) -> PathBuf {
        self.data_dir.join(LIBRARY_FILE)
    }

    /// Writes the full contents to a sibling temp file, fsyncs, then renames
    /// over the target. A crash at any point leaves either the previous valid
    /// document or the complete new one, never a truncated mix.
    pub fn write_atomic(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let temp_path = path.with_extension("tmp");
        if let Some(parent) = temp_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = File::create(&temp_path)?;
        file.write_all(contents)?;
        file.sync_all()?;
        drop(file);
        fs::rename(temp_path, path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atomic_write_replaces_previous_document() {
        let dir = tempfile::tempdir().expect("temp dir");
        let files = FileManager::new(dir.path().to_path_buf());
        let target = files.library_path();

        files.write_atomic(&target, b"first").expect("first write");
        assert_eq!(fs::read(&target).expect("read first"), b"first");

        files.write_atomic(&target, b"second").expect("second write");
        assert_eq!(fs::read(&target).expect("read second"), b"second");
        assert!(
            !target.with_extension("tmp").exists(),
            "temp file must not survive a completed write"
        );
    }

    #[test]
    fn interrupted_write_leaves_target_untouched() {
        let dir = tempfile::tempdir().expect("temp dir");
        let files = FileManager::new(dir.path().to_path_buf());
        let target = files.library_path();
        files.write_atomic(&target, b"valid").expect("seed write");

        // Simulate a crash after the temp file is written but before the
        // rename: the previous document must still be readable.
        fs::write(target.with_extension("tmp"), b"half-writ").expect("stage temp");
        assert_eq!(fs::read(&target).expect("read target"), b"valid");
    }
}
