use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tailspool_fs::{FileAttributes, TempName};

use crate::{FinalizeOutcome, HandleError, Options, Result, State};

#[derive(Debug)]
struct Channels {
    read:  Option<File>,
    write: Option<File>,
    state: State,
}

impl Channels {
    fn reader(&mut self, op: &'static str) -> Result<&mut File> {
        let state = self.state;
        match (state, self.read.as_mut()) {
            (State::Open, Some(file)) => Ok(file),
            _ => Err(HandleError::InvalidState { op, state }),
        }
    }

    fn writer(&mut self, op: &'static str) -> Result<&mut File> {
        let state = self.state;
        match (state, self.write.as_mut()) {
            (State::Open, Some(file)) => Ok(file),
            _ => Err(HandleError::InvalidState { op, state }),
        }
    }

    fn release(&mut self) {
        self.read = None;
        self.write = None;
    }
}

/// A temp file that one producer appends to while consumers read ranges of it,
/// promoted to its destination once the transfer is complete.
///
/// The file lives next to the destination as `<destination>.<uuid>`. Every
/// read, append and sync goes through one mutex, so a reader sees the file
/// either before or after a given append, never halfway through it.
///
/// Share it between threads with `Arc`. Call exactly one of
/// [`finalize`](Self::finalize) or [`delete_file`](Self::delete_file) when the
/// transfer ends; the channels are released on drop either way.
#[derive(Debug)]
pub struct TempFileHandle {
    destination: PathBuf,
    name:        TempName,
    temp_path:   PathBuf,
    options:     Options,
    inner:       Mutex<Channels>,
}

impl TempFileHandle {
    pub fn open(destination: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(destination, Options::new())
    }

    pub fn open_with(destination: impl AsRef<Path>, options: Options) -> Result<Self> {
        Self::open_named(destination, TempName::generate(), options)
    }

    /// Open with a caller-chosen suffix instead of a fresh UUID.
    ///
    /// If a file already exists under that name the handle binds to it as-is.
    pub fn open_named(
        destination: impl AsRef<Path>,
        name: TempName,
        options: Options,
    ) -> Result<Self> {
        let destination = destination.as_ref().to_path_buf();
        let temp_path = name.sibling_of(&destination);

        let write = open_write_channel(&temp_path)?;
        let read = File::open(&temp_path).map_err(|e| create_error(&temp_path, e))?;

        tracing::debug!(path = %temp_path.display(), "opened temp file");

        Ok(Self {
            destination,
            name,
            temp_path,
            options,
            inner: Mutex::new(Channels {
                read:  Some(read),
                write: Some(write),
                state: State::Open,
            }),
        })
    }

    pub fn destination(&self) -> &Path { &self.destination }

    pub fn temp_path(&self) -> &Path { &self.temp_path }

    pub fn name(&self) -> &TempName { &self.name }

    pub fn options(&self) -> Options { self.options }

    pub fn state(&self) -> State { self.lock_or_recover().state }

    /// Metadata of the temp file, or `None` if it cannot be queried (e.g. deleted).
    pub fn attributes(&self) -> Option<FileAttributes> {
        match tailspool_fs::attributes(&self.temp_path) {
            Ok(attrs) => Some(attrs),
            Err(e) => {
                tracing::debug!(path = %self.temp_path.display(), error = %e, "attribute lookup failed");
                None
            }
        }
    }

    /// Current length of the temp file; 0 when it is absent.
    pub fn size(&self) -> u64 { self.attributes().map_or(0, |attrs| attrs.len) }

    /// Read up to `length` bytes starting at `offset`.
    ///
    /// An offset at or past the end yields an empty buffer: the bytes have not
    /// arrived yet, which is not an error.
    pub fn read_data(&self, offset: u64, length: usize) -> Result<Vec<u8>> {
        let mut channels = self.lock()?;
        let file = channels.reader("read")?;
        let read_err = |source| tailspool_fs::Error::Read {
            path: self.temp_path.clone(),
            source,
        };

        let len = file.metadata().map_err(read_err)?.len();
        if offset >= len || length == 0 {
            return Ok(Vec::new());
        }
        let available = (len - offset).min(length as u64);

        file.seek(SeekFrom::Start(offset)).map_err(read_err)?;
        let mut buf = Vec::with_capacity(available as usize);
        file.take(available)
            .read_to_end(&mut buf)
            .map_err(read_err)?;

        Ok(buf)
    }

    /// Append `data` at the current end of the temp file.
    pub fn append(&self, data: &[u8]) -> Result<()> {
        let mut channels = self.lock()?;
        let file = channels.writer("append")?;

        file.seek(SeekFrom::End(0))
            .and_then(|_| file.write_all(data))
            .map_err(|source| tailspool_fs::Error::Write {
                path: self.temp_path.clone(),
                source,
            })?;

        Ok(())
    }

    /// Flush everything appended so far to durable storage.
    pub fn synchronize(&self) -> Result<()> {
        let mut channels = self.lock()?;
        let file = channels.writer("synchronize")?;
        self.sync(file)
    }

    /// Promote the temp file to the destination, replacing anything already there.
    ///
    /// A temp name that does not have the shape of a generated suffix is not
    /// ours to promote: the file is deleted and [`FinalizeOutcome::Discarded`]
    /// is returned with the destination untouched. If the move itself fails the
    /// handle ends up [`State::Closed`] and the temp file stays on disk for
    /// [`delete_file`](Self::delete_file).
    pub fn finalize(&self) -> Result<FinalizeOutcome> {
        let mut channels = self.lock()?;
        if !channels.state.is_open() {
            return Err(HandleError::InvalidState {
                op:    "finalize",
                state: channels.state,
            });
        }

        if self.options.get_sync_on_finalize() {
            self.sync(channels.writer("finalize")?)?;
        }
        channels.release();
        channels.state = State::Closed;

        if !self.name.is_well_formed() {
            tracing::warn!(path = %self.temp_path.display(), "temp suffix is not a generated name, discarding");
            tailspool_fs::remove_if_exists(&self.temp_path)?;
            channels.state = State::Deleted;
            return Ok(FinalizeOutcome::Discarded);
        }

        tailspool_fs::promote_file(
            &self.temp_path,
            &self.destination,
            self.options.get_promote(),
        )?;
        channels.state = State::Finalized;

        tracing::info!(
            from = %self.temp_path.display(),
            to = %self.destination.display(),
            "promoted temp file"
        );

        Ok(FinalizeOutcome::Promoted(self.destination.clone()))
    }

    /// Release both channels. The file stays on disk. Safe to call repeatedly.
    pub fn close(&self) {
        let mut channels = self.lock_or_recover();
        channels.release();
        if channels.state.is_open() {
            channels.state = State::Closed;
            tracing::debug!(path = %self.temp_path.display(), "closed temp file");
        }
    }

    /// Abort: release the channels and remove the temp file.
    ///
    /// Allowed while open or after [`close`](Self::close); a file that is
    /// already gone counts as deleted.
    pub fn delete_file(&self) -> Result<()> {
        let mut channels = self.lock()?;
        match channels.state {
            State::Open | State::Closed => {}
            state => return Err(HandleError::InvalidState { op: "delete", state }),
        }

        channels.release();
        channels.state = State::Closed;

        if tailspool_fs::remove_if_exists(&self.temp_path)? {
            tracing::debug!(path = %self.temp_path.display(), "deleted temp file");
        }
        channels.state = State::Deleted;
        Ok(())
    }

    fn sync(&self, file: &File) -> Result<()> {
        file.sync_all().map_err(|source| tailspool_fs::Error::Sync {
            path: self.temp_path.clone(),
            source,
        })?;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Channels>> {
        self.inner.lock().map_err(|_| HandleError::Poisoned {
            path: self.temp_path.clone(),
        })
    }

    fn lock_or_recover(&self) -> MutexGuard<'_, Channels> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for TempFileHandle {
    fn drop(&mut self) {
        let still_on_disk = self.temp_path.exists();
        let channels = self.inner.get_mut().unwrap_or_else(PoisonError::into_inner);
        channels.release();
        if still_on_disk && channels.state.is_open() {
            channels.state = State::Closed;
            tracing::debug!(path = %self.temp_path.display(), "closed temp file on drop");
        }
    }
}

fn open_write_channel(path: &Path) -> Result<File> {
    match OpenOptions::new().append(true).create_new(true).open(path) {
        Ok(file) => Ok(file),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            tracing::warn!(
                path = %path.display(),
                "temp file already exists, existing content may cause inconsistent reads"
            );
            OpenOptions::new()
                .append(true)
                .open(path)
                .map_err(|e| create_error(path, e))
        }
        Err(e) => Err(create_error(path, e)),
    }
}

fn create_error(path: &Path, source: io::Error) -> HandleError {
    tailspool_fs::Error::Create {
        path: path.to_path_buf(),
        source,
    }
    .into()
}
