//! Typed failures of the storage layer. All errors surface to the
//! immediate caller; nothing is retried or masked here.

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("invalid backend location: {0}")]
    InvalidUri(#[from] url::ParseError),
    #[error("unsupported backend scheme: {scheme}")]
    UnsupportedBackend { scheme: String },
    #[error("cannot list backups: {0}")]
    Listing(String),
}
