use std::{io, num::TryFromIntError, path::PathBuf};

use favbooru_common::{post::error::PostError, reqwest, tokio::task::JoinError};
use thiserror::Error;

#[allow(clippy::enum_variant_names)]
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Failed to access file: {source}")]
    IOError {
        #[from]
        source: io::Error,
    },

    #[error("Failed to create destination directory. error: {message}")]
    DirCreationError { message: String },

    #[error("Connection Error: {0}")]
    ConnectionError(#[from] reqwest::Error),

    #[error("Source server returned status {status}")]
    RemoteFileNotFound { status: u16 },

    #[error("Error while fetching chunk: {message}")]
    ChunkDownloadFail { message: String },

    #[error("Refusing to replace existing file {}", path.display())]
    TargetExists { path: PathBuf },

    #[error("Int conversion failed (maybe size is too large?)")]
    IntConversion(#[from] TryFromIntError),

    #[error("Invalid post data: {0}")]
    PostError(#[from] PostError),

    #[error("Background task failed: {0}")]
    TaskError(#[from] JoinError),
}
