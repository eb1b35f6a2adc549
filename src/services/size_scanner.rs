use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::errors::{DockError, Result};

/// Total byte footprint of a file or directory tree.
///
/// Regular file: its length. Directory: recursive sum of every regular file
/// reachable under it. Unreadable entries inside the tree are skipped and
/// counted rather than aborting the scan; the returned total is best-effort.
/// Symlinks are followed only while their resolved target stays under the
/// scan root, and no directory is entered twice, so link cycles terminate.
///
/// Blocking; callers on the async runtime go through
/// [`crate::commands::system::scan_path_size`] which runs it on the blocking
/// pool.
pub fn scan_path_size(path: &Path) -> Result<u64> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(DockError::NotFound(format!(
                "Path does not exist: {}",
                path.display()
            )));
        }
        Err(err) => return Err(err.into()),
    };

    if metadata.is_file() {
        return Ok(metadata.len());
    }

    if metadata.file_type().is_symlink() {
        // Root-level link: resolve it once and size whatever it points at.
        let resolved = fs::metadata(path)?;
        if resolved.is_file() {
            return Ok(resolved.len());
        }
    }

    let root = fs::canonicalize(path)?;
    let mut total: u64 = 0;
    let mut skipped: u64 = 0;
    let mut visited: HashSet<PathBuf> = HashSet::new();
    let mut stack: Vec<PathBuf> = vec![root.clone()];

    while let Some(dir) = stack.pop() {
        let canonical = match fs::canonicalize(&dir) {
            Ok(value) => value,
            Err(_) => {
                skipped += 1;
                continue;
            }
        };
        if !visited.insert(canonical) {
            continue;
        }

        let entries = match fs::read_dir(&dir) {
            Ok(value) => value,
            Err(_) => {
                skipped += 1;
                continue;
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(value) => value,
                Err(_) => {
                    skipped += 1;
                    continue;
                }
            };
            let entry_path = entry.path();
            let meta = match fs::symlink_metadata(&entry_path) {
                Ok(value) => value,
                Err(_) => {
                    skipped += 1;
                    continue;
                }
            };

            if meta.is_file() {
                total += meta.len();
            } else if meta.is_dir() {
                stack.push(entry_path);
            } else if meta.file_type().is_symlink() {
                match fs::canonicalize(&entry_path) {
                    // Targets that escape the scan root are not traversed.
                    Ok(resolved) if resolved.starts_with(&root) => {
                        match fs::metadata(&resolved) {
                            Ok(target) if target.is_file() => total += target.len(),
                            Ok(target) if target.is_dir() => stack.push(resolved),
                            Ok(_) => {}
                            Err(_) => skipped += 1,
                        }
                    }
                    Ok(_) => {}
                    Err(_) => skipped += 1,
                }
            }
        }
    }

    if skipped > 0 {
        tracing::warn!(
            "size scan of {} skipped {} unreadable entries",
            path.display(),
            skipped
        );
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_a_single_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let file = dir.path().join("archive.bin");
        fs::write(&file, vec![0_u8; 42]).expect("write file");

        assert_eq!(scan_path_size(&file).expect("scan file"), 42);
    }

    #[test]
    fn sums_nested_directory_tree() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(dir.path().join("a.bin"), vec![0_u8; 10]).expect("write a");
        fs::write(dir.path().join("b.bin"), vec![0_u8; 20]).expect("write b");
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).expect("create nested");
        fs::write(nested.join("c.bin"), vec![0_u8; 30]).expect("write c");

        assert_eq!(scan_path_size(dir.path()).expect("scan dir"), 60);
    }

    #[test]
    fn missing_path_is_not_found() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("gone");

        match scan_path_size(&missing) {
            Err(DockError::NotFound(_)) => {}
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn does_not_follow_links_escaping_the_scan_root() {
        let outside = tempfile::tempdir().expect("outside dir");
        fs::write(outside.path().join("big.bin"), vec![0_u8; 1000]).expect("write outside");

        let dir = tempfile::tempdir().expect("scan dir");
        fs::write(dir.path().join("inside.bin"), vec![0_u8; 5]).expect("write inside");
        std::os::unix::fs::symlink(outside.path(), dir.path().join("escape"))
            .expect("create symlink");

        assert_eq!(scan_path_size(dir.path()).expect("scan dir"), 5);
    }

    #[cfg(unix)]
    #[test]
    fn terminates_on_link_cycles_inside_the_root() {
        let dir = tempfile::tempdir().expect("scan dir");
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).expect("create nested");
        fs::write(nested.join("d.bin"), vec![0_u8; 7]).expect("write d");
        std::os::unix::fs::symlink(dir.path(), nested.join("loop")).expect("create cycle");

        assert_eq!(scan_path_size(dir.path()).expect("scan dir"), 7);
    }
}
