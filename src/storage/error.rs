use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to create directory '{0}'")]
    DirCreation(PathBuf, #[source] std::io::Error),

    #[error("Refusing to save file with unsafe path '{0}'")]
    UnsafePath(String),

    #[error("Failed to write downloaded data to '{0}'")]
    Write(PathBuf, #[source] std::io::Error),

    #[error("Failed to move completed download into place at '{0}'")]
    Persist(PathBuf, #[source] tempfile::PersistError),

    #[error("Failed to read token file '{0}'")]
    TokenRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to write token file '{0}'")]
    TokenWrite(PathBuf, #[source] std::io::Error),

    #[error("Failed to delete token file '{0}'")]
    TokenDelete(PathBuf, #[source] std::io::Error),

    #[error("Token file '{0}' is not valid JSON")]
    TokenParse(PathBuf, #[source] serde_json::Error),

    #[error("Failed to encode token")]
    TokenEncode(#[source] serde_json::Error),
}
