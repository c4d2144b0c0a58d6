//! Temp-file-backed buffer for in-progress downloads.
//!
//! A [`TempFileHandle`] owns one temp file next to its destination. A producer
//! appends bytes as they arrive, consumers read arbitrary ranges at the same
//! time, and when the transfer is done the file is promoted over the
//! destination in one move.
//!
//! # Key Features
//!
//! - **Serialized I/O**: one mutex per handle; reads never see a half-written append
//! - **Eager open**: both channels are acquired at construction, so failures surface there
//! - **Atomic placement**: finalize replaces the destination via `tailspool-fs::promote_file`
//! - **Typed errors**: every fallible call returns [`Result`]; nothing is swallowed
//!
//! # Example
//!
//! ```no_run
//! use tailspool::{FinalizeOutcome, TempFileHandle};
//!
//! let handle = TempFileHandle::open("/var/cache/player/episode.mp4")?;
//! handle.append(b"first chunk")?;
//! let head = handle.read_data(0, 5)?;
//! assert_eq!(head, b"first");
//!
//! match handle.finalize()? {
//!     FinalizeOutcome::Promoted(path) => println!("saved to {}", path.display()),
//!     FinalizeOutcome::Discarded => println!("temp file discarded"),
//! }
//! # Ok::<(), tailspool::HandleError>(())
//! ```

mod error;
mod handle;
mod options;
mod state;

pub use error::{HandleError, Result};
pub use handle::TempFileHandle;
pub use options::Options;
pub use state::{FinalizeOutcome, State};

pub use tailspool_fs::{FileAttributes, PromoteOptions, TempName, sweep_orphans};
