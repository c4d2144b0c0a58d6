use std::fmt;
use std::path::PathBuf;

/// Lifecycle of a [`TempFileHandle`](crate::TempFileHandle).
///
/// `Open` is the only state that accepts reads and writes; the other three are
/// terminal and never lead back to `Open`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum State {
    Open,
    Closed,
    Finalized,
    Deleted,
}

impl State {
    pub fn is_open(self) -> bool {
        self == Self::Open
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Finalized => "finalized",
            Self::Deleted => "deleted",
        })
    }
}

/// What [`TempFileHandle::finalize`](crate::TempFileHandle::finalize) did with the temp file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FinalizeOutcome {
    /// The temp file now lives at this destination path.
    Promoted(PathBuf),
    /// The suffix did not look like a managed temp name, so the file was deleted instead.
    Discarded,
}

impl FinalizeOutcome {
    pub fn is_promoted(&self) -> bool {
        matches!(self, Self::Promoted(_))
    }
}
