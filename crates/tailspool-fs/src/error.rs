use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to create temp file '{path}': {source}")]
    Create { path: PathBuf, source: io::Error },

    #[error("failed to read '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write '{path}': {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to sync '{path}': {source}")]
    Sync { path: PathBuf, source: io::Error },

    #[error("failed to remove '{path}': {source}")]
    Remove { path: PathBuf, source: io::Error },

    #[error("failed to move '{from}' to '{to}': {source}")]
    Promote {
        from:   PathBuf,
        to:     PathBuf,
        source: io::Error,
    },

    #[error("retry limit exceeded moving '{from}' to '{to}'")]
    RetryLimitExceeded { from: PathBuf, to: PathBuf },
}

impl Error {
    /// The underlying I/O error, if the failure came from the OS.
    pub fn io_source(&self) -> Option<&io::Error> {
        match self {
            Self::Create { source, .. }
            | Self::Read { source, .. }
            | Self::Write { source, .. }
            | Self::Sync { source, .. }
            | Self::Remove { source, .. }
            | Self::Promote { source, .. } => Some(source),
            Self::RetryLimitExceeded { .. } => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.io_source()
            .is_some_and(|e| e.kind() == io::ErrorKind::NotFound)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
