use std::path::PathBuf;

use crate::State;

#[derive(Debug, thiserror::Error)]
pub enum HandleError {
    #[error(transparent)]
    Fs(#[from] tailspool_fs::Error),

    #[error("cannot {op} a handle that is {state}")]
    InvalidState { op: &'static str, state: State },

    #[error("handle lock poisoned for '{path}'")]
    Poisoned { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, HandleError>;
