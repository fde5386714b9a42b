use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("archive is missing manifest.json")]
    MissingManifest,

    #[error("manifest.json is malformed: {0}")]
    MalformedManifest(#[from] serde_json::Error),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
