//! Filesystem primitives behind `tailspool`.
//!
//! - [`TempName`] - the unique suffix that names a temp sibling of a destination
//! - [`promote_file`] - remove-then-move of a finished temp file over its destination
//! - [`sweep_orphans`] - cleanup of temp siblings a crashed process left behind
//! - [`attributes`] - metadata snapshot for progress reporting

mod attributes;
mod error;
mod promote;
mod sweep;
mod temp_name;

pub use attributes::{FileAttributes, attributes};
pub use error::{Error, Result};
pub use promote::{MAX_RETRY_DELAY_MS, PromoteOptions, promote_file, remove_if_exists};
pub use sweep::sweep_orphans;
pub use temp_name::{TempName, UUID_LEN};
