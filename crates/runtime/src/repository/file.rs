//! File-based SessionRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use tactics_core::SessionSnapshot;

use super::traits::validate_session_id;
use super::{RepositoryError, Result, SessionRepository};

/// Stores each session as pretty-printed JSON in `session_{id}.json`.
///
/// Writes go to a temp file first and are renamed into place, so a crash
/// mid-save leaves the previous file intact.
pub struct FileSessionRepository {
    base_dir: PathBuf,
}

impl FileSessionRepository {
    /// Creates the repository, making `base_dir` if needed.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn session_path(&self, session_id: &str) -> PathBuf {
        self.base_dir.join(format!("session_{}.json", session_id))
    }
}

impl SessionRepository for FileSessionRepository {
    fn save(&self, session_id: &str, snapshot: &SessionSnapshot) -> Result<()> {
        validate_session_id(session_id)?;
        let path = self.session_path(session_id);
        let temp_path = path.with_extension("json.tmp");

        let bytes = serde_json::to_vec_pretty(snapshot)?;
        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!("Saved session {} to {}", session_id, path.display());
        Ok(())
    }

    fn load(&self, session_id: &str) -> Result<Option<SessionSnapshot>> {
        validate_session_id(session_id)?;
        let path = self.session_path(session_id);
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        let snapshot = serde_json::from_slice(&bytes)?;
        tracing::debug!("Loaded session {} from {}", session_id, path.display());
        Ok(Some(snapshot))
    }

    fn exists(&self, session_id: &str) -> bool {
        validate_session_id(session_id).is_ok() && self.session_path(session_id).exists()
    }

    fn delete(&self, session_id: &str) -> Result<()> {
        validate_session_id(session_id)?;
        let path = self.session_path(session_id);
        if path.exists() {
            fs::remove_file(&path)?;
            tracing::debug!("Deleted session {}", session_id);
        }
        Ok(())
    }

    fn list_sessions(&self) -> Result<Vec<String>> {
        let mut sessions = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if let Some(id) = path
                .file_name()
                .and_then(|s| s.to_str())
                .and_then(|name| name.strip_prefix("session_"))
                .and_then(|rest| rest.strip_suffix(".json"))
            {
                sessions.push(id.to_string());
            }
        }
        sessions.sort();
        Ok(sessions)
    }
}

impl std::fmt::Debug for FileSessionRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSessionRepository")
            .field("base_dir", &self.base_dir)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use tactics_core::{EncounterState, Grid};

    use super::*;

    fn snapshot(seed: u64) -> SessionSnapshot {
        SessionSnapshot::capture(&EncounterState::new(Grid::open(4, 4), seed))
    }

    #[test]
    fn save_load_delete() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSessionRepository::new(dir.path()).unwrap();

        assert_eq!(repo.load("alpha").unwrap(), None);
        repo.save("alpha", &snapshot(3)).unwrap();
        repo.save("beta", &snapshot(4)).unwrap();

        assert!(dir.path().join("session_alpha.json").exists());
        assert!(!dir.path().join("session_alpha.json.tmp").exists());
        assert_eq!(repo.load("alpha").unwrap(), Some(snapshot(3)));
        assert_eq!(repo.list_sessions().unwrap(), vec!["alpha", "beta"]);

        repo.delete("alpha").unwrap();
        assert!(!repo.exists("alpha"));
        assert_eq!(repo.list_sessions().unwrap(), vec!["beta"]);
    }

    #[test]
    fn new_creates_a_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("saves").join("tactics");
        let repo = FileSessionRepository::new(&nested).unwrap();

        assert_eq!(repo.base_dir(), nested.as_path());
        repo.save("first", &snapshot(5)).unwrap();
        assert!(repo.base_dir().join("session_first.json").is_file());
    }

    #[test]
    fn overwrite_replaces_previous_save() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSessionRepository::new(dir.path()).unwrap();
        repo.save("run", &snapshot(1)).unwrap();
        repo.save("run", &snapshot(2)).unwrap();
        assert_eq!(repo.load("run").unwrap().unwrap().seed, 2);
    }

    #[test]
    fn path_like_ids_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSessionRepository::new(dir.path()).unwrap();
        assert!(matches!(
            repo.save("../escape", &snapshot(1)),
            Err(RepositoryError::InvalidSessionId(_))
        ));
    }

    #[test]
    fn corrupted_file_is_a_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSessionRepository::new(dir.path()).unwrap();
        fs::write(dir.path().join("session_bad.json"), b"{ not json").unwrap();
        assert!(matches!(repo.load("bad"), Err(RepositoryError::Json(_))));
    }
}
