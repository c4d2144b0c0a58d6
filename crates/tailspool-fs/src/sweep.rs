use std::path::{Path, PathBuf};

use crate::{Error, Result, TempName};

/// Remove temp siblings of `destination` left behind by handles that never finished.
///
/// Only files named `<destination>.<uuid>` are touched. Returns the removed paths.
/// A file that cannot be removed is logged and skipped.
pub fn sweep_orphans(destination: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let destination = destination.as_ref();
    let parent = match destination.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let entries = std::fs::read_dir(parent).map_err(|e| Error::Read {
        path:   parent.to_path_buf(),
        source: e,
    })?;

    // Compare against a destination rooted the same way as the directory entries.
    let anchored = parent.join(destination.file_name().unwrap_or_default());

    let mut removed = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::Read {
            path:   parent.to_path_buf(),
            source: e,
        })?;
        let candidate = entry.path();

        let owned = TempName::strip_from(&anchored, &candidate).is_some_and(|name| name.is_uuid());
        if !owned || !entry.file_type().is_ok_and(|t| t.is_file()) {
            continue;
        }

        match std::fs::remove_file(&candidate) {
            Ok(()) => {
                tracing::debug!(path = %candidate.display(), "removed orphaned temp file");
                removed.push(candidate);
            }
            Err(e) => {
                tracing::warn!(path = %candidate.display(), error = %e, "failed to remove orphaned temp file");
            }
        }
    }

    Ok(removed)
}
