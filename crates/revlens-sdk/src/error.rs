use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("config error in {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    #[error("no revision before {revision} of {item}")]
    NoPreviousRevision { item: String, revision: String },

    #[error("store error: {0}")]
    Store(#[from] revlens_store::StoreError),

    #[error("parse error: {0}")]
    Parse(#[from] revlens_decompose::ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SdkResult<T> = Result<T, SdkError>;
