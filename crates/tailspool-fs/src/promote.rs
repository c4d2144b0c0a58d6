use std::io;
use std::path::Path;

use crate::{Error, Result};

/// Ceiling for the Windows retry delay.
pub const MAX_RETRY_DELAY_MS: u64 = 1000;

#[derive(Clone, Copy, Debug)]
pub struct PromoteOptions {
    retry_count:    u32,
    retry_delay_ms: u64,
    sync_parent:    bool,
}

impl Default for PromoteOptions {
    fn default() -> Self { Self::new() }
}

impl PromoteOptions {
    pub fn new() -> Self {
        Self {
            retry_count:    16,
            retry_delay_ms: 8,
            sync_parent:    true,
        }
    }

    /// Attempts made by the Windows move before giving up. Ignored on Unix.
    pub fn retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count;
        self
    }

    /// Initial delay between Windows move attempts; doubles after each failure,
    /// capped at [`MAX_RETRY_DELAY_MS`].
    pub fn retry_delay_ms(mut self, retry_delay_ms: u64) -> Self {
        self.retry_delay_ms = retry_delay_ms;
        self
    }

    /// Fsync the destination's parent directory after the rename. Unix only.
    pub fn sync_parent(mut self, sync_parent: bool) -> Self {
        self.sync_parent = sync_parent;
        self
    }

    pub fn get_retry_count(&self) -> u32 { self.retry_count }

    pub fn get_retry_delay_ms(&self) -> u64 { self.retry_delay_ms }

    pub fn get_sync_parent(&self) -> bool { self.sync_parent }
}

/// Move `from` over `to`, destroying whatever was at `to` first.
///
/// There is no backup of the previous destination: the last promote wins.
/// The destination is removed before the rename, so between the two steps
/// nothing exists at `to`. If the rename then fails, the old destination is
/// already gone and `from` is left in place.
pub fn promote_file(
    from: impl AsRef<Path>,
    to: impl AsRef<Path>,
    options: PromoteOptions,
) -> Result<()> {
    let from = from.as_ref();
    let to = to.as_ref();

    if remove_if_exists(to)? {
        tracing::debug!(path = %to.display(), "removed previous destination");
    }

    rename(from, to, options)?;

    #[cfg(unix)]
    if options.get_sync_parent() {
        sync_parent_dir(to)?;
    }

    Ok(())
}

/// Remove a file, treating "already gone" as success.
///
/// Returns whether a file was actually removed.
pub fn remove_if_exists(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::Remove {
            path:   path.to_path_buf(),
            source: e,
        }),
    }
}

#[cfg(not(windows))]
fn rename(from: &Path, to: &Path, _options: PromoteOptions) -> Result<()> {
    std::fs::rename(from, to).map_err(|e| Error::Promote {
        from:   from.to_path_buf(),
        to:     to.to_path_buf(),
        source: e,
    })
}

#[cfg(windows)]
fn rename(from: &Path, to: &Path, options: PromoteOptions) -> Result<()> {
    use std::os::windows::prelude::OsStrExt;
    use std::thread;
    use std::time::Duration;
    use windows::Win32::Storage::FileSystem::{
        MOVEFILE_REPLACE_EXISTING, MOVEFILE_WRITE_THROUGH, MoveFileExW,
    };
    use windows::core::PCWSTR;

    if !from.exists() {
        return Err(Error::Promote {
            from:   from.to_path_buf(),
            to:     to.to_path_buf(),
            source: io::Error::from(io::ErrorKind::NotFound),
        });
    }

    let from_wide: Vec<u16> = from
        .as_os_str()
        .encode_wide()
        .chain(std::iter::once(0))
        .collect();
    let to_wide: Vec<u16> = to
        .as_os_str()
        .encode_wide()
        .chain(std::iter::once(0))
        .collect();

    let mut delay = options.get_retry_delay_ms();

    for attempt in 0..options.get_retry_count() {
        let result = unsafe {
            MoveFileExW(
                PCWSTR::from_raw(from_wide.as_ptr()),
                PCWSTR::from_raw(to_wide.as_ptr()),
                MOVEFILE_REPLACE_EXISTING | MOVEFILE_WRITE_THROUGH,
            )
        };

        if result.is_ok() {
            return Ok(());
        }

        if attempt + 1 < options.get_retry_count() {
            tracing::debug!(attempt, from = %from.display(), "move failed, retrying");
            thread::sleep(Duration::from_millis(delay));
            delay = next_delay(delay);
        }
    }

    Err(Error::RetryLimitExceeded {
        from: from.to_path_buf(),
        to:   to.to_path_buf(),
    })
}

#[cfg_attr(not(windows), allow(dead_code))]
fn next_delay(delay: u64) -> u64 {
    delay.saturating_mul(2).min(MAX_RETRY_DELAY_MS)
}

#[cfg(unix)]
fn sync_parent_dir(path: &Path) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::File::open(parent)
        .and_then(|dir| dir.sync_all())
        .map_err(|e| Error::Sync {
            path:   parent.to_path_buf(),
            source: e,
        })
}
