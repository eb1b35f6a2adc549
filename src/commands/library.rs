use crate::errors::{DockError, Result};
use crate::models::{GameEntry, GamePayload};
use crate::AppState;

// Store calls scan install trees and fsync the catalog document, so every
// wrapper hops to the blocking pool instead of pinning a runtime worker.

pub async fn load_library(state: &AppState) -> Result<Vec<GameEntry>> {
    let library = state.library.clone();
    tokio::task::spawn_blocking(move || library.load())
        .await
        .map_err(join_error)?
}

pub async fn add_game(state: &AppState, payload: GamePayload) -> Result<GameEntry> {
    let library = state.library.clone();
    tokio::task::spawn_blocking(move || library.create(payload))
        .await
        .map_err(join_error)?
}

pub async fn update_game(state: &AppState, id: String, payload: GamePayload) -> Result<GameEntry> {
    let library = state.library.clone();
    tokio::task::spawn_blocking(move || library.update(&id, payload))
        .await
        .map_err(join_error)?
}

pub async fn remove_game(state: &AppState, id: String) -> Result<()> {
    let library = state.library.clone();
    tokio::task::spawn_blocking(move || library.remove(&id))
        .await
        .map_err(join_error)?
}

fn join_error(err: tokio::task::JoinError) -> DockError {
    DockError::Config(format!("library task join error: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InstallStatus;
    use crate::services::FileDialog;
    use std::path::PathBuf;

    struct ScriptedDialog {
        file: Option<PathBuf>,
    }

    impl FileDialog for ScriptedDialog {
        fn pick_file(&self) -> Option<PathBuf> {
            self.file.clone()
        }

        fn pick_directory(&self) -> Option<PathBuf> {
            None
        }
    }

    #[tokio::test]
    async fn add_then_mark_installed_end_to_end() {
        let dir = tempfile::tempdir().expect("temp dir");
        let state = AppState::new(dir.path().join("data"));

        let created = add_game(
            &state,
            GamePayload {
                title: "Example".to_string(),
                status: InstallStatus::NotInstalled,
                ..GamePayload::default()
            },
        )
        .await
        .expect("add game");
        assert!(!created.id.is_empty());
        assert_eq!(created.added_at, created.updated_at);

        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        let updated = update_game(
            &state,
            created.id.clone(),
            GamePayload {
                title: "Example".to_string(),
                status: InstallStatus::Installed,
                size_override: Some(1_048_576),
                ..GamePayload::default()
            },
        )
        .await
        .expect("update game");
        assert_eq!(updated.status, InstallStatus::Installed);
        assert_eq!(updated.size_bytes, Some(1_048_576));
        assert!(updated.updated_at > updated.added_at);

        let library = load_library(&state).await.expect("load library");
        assert_eq!(library, vec![updated]);

        remove_game(&state, created.id).await.expect("remove game");
        assert!(load_library(&state).await.expect("reload").is_empty());
    }

    #[tokio::test]
    async fn store_errors_survive_the_blocking_hop() {
        let dir = tempfile::tempdir().expect("temp dir");
        let state = AppState::new(dir.path().join("data"));

        match add_game(
            &state,
            GamePayload {
                title: "   ".to_string(),
                ..GamePayload::default()
            },
        )
        .await
        {
            Err(crate::errors::DockError::Validation(_)) => {}
            other => panic!("expected Validation, got {other:?}"),
        }

        match update_game(&state, "no-such-id".to_string(), GamePayload::default()).await {
            Err(crate::errors::DockError::NotFound(_)) => {}
            other => panic!("expected NotFound, got {other:?}"),
        }
        assert!(load_library(&state).await.expect("load").is_empty());
    }

    #[tokio::test]
    async fn picked_archive_feeds_the_entry_and_its_size() {
        let dir = tempfile::tempdir().expect("temp dir");
        let archive = dir.path().join("example.rar");
        std::fs::write(&archive, vec![0_u8; 128]).expect("write archive");

        // The UI glue asks the dialog collaborator for a path and copies it
        // into the payload; the store scans it when no override is given.
        let dialog = ScriptedDialog {
            file: Some(archive.clone()),
        };
        let picked = dialog.pick_file().expect("picked path");

        let state = AppState::new(dir.path().join("data"));
        let created = add_game(
            &state,
            GamePayload {
                title: "Example".to_string(),
                archive_path: Some(picked.to_string_lossy().to_string()),
                ..GamePayload::default()
            },
        )
        .await
        .expect("add game");

        assert_eq!(created.size_bytes, Some(128));
        assert_eq!(
            created.archive_path.as_deref(),
            Some(archive.to_string_lossy().as_ref())
        );
    }
}
