use thiserror::Error;

/// Failure taxonomy of the store. Input-validation variants carry enough
/// context for an operator-facing message; everything disk-shaped wraps the
/// underlying error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("family name cannot be blank")]
    BlankName,
    #[error("photo rejected: {0}")]
    InvalidPhoto(String),
    #[error("no family with number {0}")]
    UnknownFamily(u32),
    #[error("configuration invalid: {0}")]
    InvalidConfig(String),
    #[error("storage location unavailable: {0}")]
    Environment(String),
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("backup archive failed: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
