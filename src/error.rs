use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure raised by the tag tokenizer. Reaching the end of the stream is not an error.
#[derive(Error, Debug)]
pub enum TokenizeError {
    /// The underlying byte stream failed mid-read.
    #[error("read error: {0}")]
    Read(#[from] io::Error),
}

/// Tokenizer failure carrying whatever the handler had collected before it.
#[derive(Error, Debug)]
#[error("{source}")]
pub struct PartialExtraction<T: std::fmt::Debug> {
    pub record: T,
    #[source]
    pub source: TokenizeError,
}

/// Coarse classification of a [`CollectError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Input,
    Fetch,
    Tokenize,
    Serialization,
}

#[derive(Error, Debug)]
pub enum CollectError {
    #[error("expected exactly one path or URL argument, got {0}")]
    ArgumentCount(usize),

    #[error("stat {}: no such file or directory", path.display())]
    MissingFile { path: PathBuf },

    #[error("open {}: {source}", path.display())]
    OpenFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("failed to fetch {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("error reading URL: {url} ~ ({status})")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to tokenize document: {0}")]
    Tokenize(#[from] TokenizeError),

    #[error("failed to serialize record: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CollectError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ArgumentCount(_) | Self::MissingFile { .. } | Self::OpenFile { .. } => {
                ErrorKind::Input
            }
            Self::Client(_) | Self::Request { .. } | Self::Status { .. } => ErrorKind::Fetch,
            Self::Tokenize(_) => ErrorKind::Tokenize,
            Self::Serialization(_) => ErrorKind::Serialization,
        }
    }
}

impl<T: std::fmt::Debug> From<PartialExtraction<T>> for CollectError {
    fn from(partial: PartialExtraction<T>) -> Self {
        tracing::debug!("discarding partial record: {:?}", partial.record);
        Self::Tokenize(partial.source)
    }
}
