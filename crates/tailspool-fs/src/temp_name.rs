use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

/// Length of a hyphenated textual UUID, e.g. `67e55044-10b1-426f-9247-bb680e5fe0c8`.
pub const UUID_LEN: usize = uuid::fmt::Hyphenated::LENGTH;

/// The unique suffix that turns a destination path into its temp sibling.
///
/// `video.mp4` becomes `video.mp4.<suffix>`. The suffix is also the only
/// marker used to decide whether a temp file may be promoted.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TempName(String);

impl TempName {
    /// Fresh random suffix (UUID v4, hyphenated).
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().hyphenated().to_string())
    }

    /// Wrap an arbitrary suffix without validating it.
    pub fn from_raw(suffix: impl Into<String>) -> Self {
        Self(suffix.into())
    }

    /// Ownership heuristic: a managed suffix has exactly the textual UUID length.
    pub fn is_well_formed(&self) -> bool {
        self.0.len() == UUID_LEN
    }

    /// Stricter than [`is_well_formed`](Self::is_well_formed): the suffix must parse as a UUID.
    pub fn is_uuid(&self) -> bool {
        self.is_well_formed() && uuid::Uuid::try_parse(&self.0).is_ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `destination` with `.` and this suffix appended to its file name.
    pub fn sibling_of(&self, destination: impl AsRef<Path>) -> PathBuf {
        let mut raw = OsString::from(destination.as_ref().as_os_str());
        raw.push(".");
        raw.push(&self.0);
        PathBuf::from(raw)
    }

    /// Recover the suffix from `candidate` if it is a temp sibling of `destination`.
    ///
    /// Only the file name is compared; the parent directories must match exactly.
    pub fn strip_from(destination: &Path, candidate: &Path) -> Option<Self> {
        if destination.parent() != candidate.parent() {
            return None;
        }
        let base = destination.file_name()?.to_str()?;
        let name = candidate.file_name()?.to_str()?;
        let suffix = name.strip_prefix(base)?.strip_prefix('.')?;
        if suffix.is_empty() {
            return None;
        }
        Some(Self::from_raw(suffix))
    }
}

impl fmt::Display for TempName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl AsRef<str> for TempName {
    fn as_ref(&self) -> &str { &self.0 }
}
