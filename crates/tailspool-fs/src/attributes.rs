use std::path::Path;
use std::time::SystemTime;

use crate::{Error, Result};

/// Snapshot of the metadata callers care about for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileAttributes {
    pub len:      u64,
    pub modified: Option<SystemTime>,
    pub readonly: bool,
}

impl From<std::fs::Metadata> for FileAttributes {
    fn from(meta: std::fs::Metadata) -> Self {
        Self {
            len:      meta.len(),
            modified: meta.modified().ok(),
            readonly: meta.permissions().readonly(),
        }
    }
}

pub fn attributes(path: impl AsRef<Path>) -> Result<FileAttributes> {
    let path = path.as_ref();
    std::fs::metadata(path)
        .map(FileAttributes::from)
        .map_err(|e| Error::Read {
            path:   path.to_path_buf(),
            source: e,
        })
}
