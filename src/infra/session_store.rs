//! Durable home of the session token: one small file, written atomically.

use std::{fs, io::ErrorKind};

use crate::{
    domain::identity::SessionToken,
    infra::{error::AppError, storage_layout::StorageLayout},
};

#[derive(Debug, Clone)]
pub struct SessionStore {
    layout: StorageLayout,
}

impl SessionStore {
    pub fn new(layout: StorageLayout) -> Self {
        Self { layout }
    }

    /// Reads the stored token. A missing or empty file is "signed out",
    /// not an error.
    pub fn load(&self) -> Result<Option<SessionToken>, AppError> {
        let path = self.layout.token_file();
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(source) if source.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(AppError::TokenRead { path, source }),
        };

        let token = raw.trim();
        if token.is_empty() {
            return Ok(None);
        }
        Ok(Some(SessionToken::new(token)))
    }

    /// Persists the token via tmp-file-and-rename so a crash mid-write
    /// never leaves a torn credential behind.
    pub fn save(&self, token: &SessionToken) -> Result<(), AppError> {
        self.layout.ensure_dirs()?;

        let path = self.layout.token_file();
        let tmp = path.with_extension("tmp");

        fs::write(&tmp, token.as_str()).map_err(|source| AppError::TokenWrite {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| AppError::TokenWrite { path, source })?;
        Ok(())
    }

    /// Removes the token. Idempotent; reports whether a file was actually
    /// deleted.
    pub fn clear(&self) -> Result<bool, AppError> {
        let path = self.layout.token_file();
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(source) if source.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(AppError::TokenRemove { path, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &std::path::Path) -> SessionStore {
        SessionStore::new(StorageLayout {
            config_dir: dir.join("drg"),
            session_dir: dir.join("drg").join("session"),
        })
    }

    #[test]
    fn load_returns_none_when_no_token_was_saved() {
        let dir = tempfile::tempdir().expect("tempdir must be creatable");
        let store = store_in(dir.path());

        assert!(store.load().expect("load must succeed").is_none());
    }

    #[test]
    fn save_then_load_round_trips_the_token() {
        let dir = tempfile::tempdir().expect("tempdir must be creatable");
        let store = store_in(dir.path());

        store
            .save(&SessionToken::new("a1b2c3d4"))
            .expect("save must succeed");

        let loaded = store.load().expect("load must succeed");
        assert_eq!(loaded, Some(SessionToken::new("a1b2c3d4")));
    }

    #[test]
    fn save_overwrites_the_previous_token() {
        let dir = tempfile::tempdir().expect("tempdir must be creatable");
        let store = store_in(dir.path());

        store.save(&SessionToken::new("old")).expect("save must succeed");
        store.save(&SessionToken::new("new")).expect("save must succeed");

        let loaded = store.load().expect("load must succeed");
        assert_eq!(loaded, Some(SessionToken::new("new")));
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir must be creatable");
        let store = store_in(dir.path());
        store.save(&SessionToken::new("a1b2c3")).expect("save must succeed");

        assert!(store.clear().expect("clear must succeed"));
        assert!(!store.clear().expect("second clear must succeed"));
        assert!(store.load().expect("load must succeed").is_none());
    }

    #[test]
    fn whitespace_only_file_reads_as_signed_out() {
        let dir = tempfile::tempdir().expect("tempdir must be creatable");
        let store = store_in(dir.path());
        store.save(&SessionToken::new("token")).expect("save must succeed");
        fs::write(store.layout.token_file(), "  \n").expect("file must be writable");

        assert!(store.load().expect("load must succeed").is_none());
    }
}
