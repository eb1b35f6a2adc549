pub mod download;
pub mod library;
pub mod system;
