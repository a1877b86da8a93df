//! On-disk persistence of the portal access token.
//!
//! The browser front-end kept the bearer token in local storage; the
//! library analog is a small JSON file inside the portal data directory
//! that survives across client instances.

use crate::storage::error::StorageError;
use log::info;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

const TOKEN_FILE_NAME: &str = "token.json";

/// A stored access token together with its scheme.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredToken {
    pub access_token: String,
    /// Token scheme as issued, normally "bearer".
    pub token_type: String,
}

pub(crate) struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(TOKEN_FILE_NAME),
        }
    }

    pub async fn save(&self, token: &StoredToken) -> Result<(), StorageError> {
        let payload =
            serde_json::to_vec_pretty(token).map_err(StorageError::TokenEncode)?;
        fs::write(&self.path, payload)
            .await
            .map_err(|e| StorageError::TokenWrite(self.path.clone(), e))?;
        info!("Stored access token at {:?}", self.path);
        Ok(())
    }

    /// Loads the persisted token, `None` when nobody has logged in yet.
    pub async fn load(&self) -> Result<Option<StoredToken>, StorageError> {
        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::TokenRead(self.path.clone(), e)),
        };
        let token = serde_json::from_slice(&raw)
            .map_err(|e| StorageError::TokenParse(self.path.clone(), e))?;
        Ok(Some(token))
    }

    /// Deletes the persisted token. Missing file counts as cleared.
    pub async fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::TokenDelete(self.path.clone(), e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> StoredToken {
        StoredToken {
            access_token: "abc.def.ghi".to_string(),
            token_type: "bearer".to_string(),
        }
    }

    #[tokio::test]
    async fn token_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path());

        assert!(store.load().await.unwrap().is_none());
        store.save(&token()).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(token()));
    }

    #[tokio::test]
    async fn clear_removes_token_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path());

        store.save(&token()).await.unwrap();
        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
        // Clearing again must not fail.
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn corrupt_token_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path());
        tokio::fs::write(dir.path().join(TOKEN_FILE_NAME), b"not json")
            .await
            .unwrap();

        let err = store.load().await.unwrap_err();
        assert!(matches!(err, StorageError::TokenParse(_, _)));
    }
}
