use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    ImageProcessing(#[from] image::ImageError),

    #[error("PNG optimization error: {0}")]
    PngOptimization(String),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("File too large: {0} bytes. Maximum allowed: {1} bytes")]
    FileTooLarge(u64, u64),

    #[error("Unsupported media: {0}")]
    UnsupportedMedia(String),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to create output directory: {0}")]
    DirectoryCreationFailed(PathBuf),

    #[error("No media files found in input path: {0}")]
    NoMediaFilesFound(String),

    #[error("Walkdir error: {0}")]
    WalkdirError(#[from] walkdir::Error),

    #[error("Invalid virtual file name: {0:?}")]
    InvalidFileName(String),

    #[error("Failed to load transcoding engine: {0}")]
    EngineLoad(String),

    #[error("Transcoding engine is not loaded")]
    EngineNotLoaded,

    #[error("Transcoding failed ({status}): {stderr}")]
    EngineRun { status: String, stderr: String },

    #[error("A batch is already in flight")]
    BatchInFlight,

    #[error("Index {0} out of range for batch of {1} items")]
    IndexOutOfRange(usize, usize),

    #[error("Nothing to archive: the batch is empty")]
    EmptyArchive,

    #[error("Batch file count limit exceeded: {0} files, maximum allowed {1}")]
    BatchFileLimitExceeded(usize, usize),
}

pub type Result<T> = std::result::Result<T, MediaError>;
