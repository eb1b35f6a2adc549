pub mod download_manager;
pub mod library_store;
pub mod opener;
pub mod size_scanner;

pub use download_manager::DownloadManager;
pub use library_store::LibraryStore;
pub use opener::{FileDialog, PathOpener, ShellOpener};
pub use size_scanner::scan_path_size;
