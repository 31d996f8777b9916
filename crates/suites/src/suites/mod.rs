//! The filesystem race scenarios.
//!
//! Four suites race a single atomic operation and expect exactly one winner.
//! `open_during_create_mt` races readers against one creator, and
//! `bonnie64_mt` stresses overlapping reads and writes on one file.

mod bonnie64;
mod directory_create;
mod directory_removal;
mod file_create;
mod file_rename;
mod open_during_create;

pub use bonnie64::{Bonnie64Context, Bonnie64Suite};
pub use directory_create::DirectoryCreateSuite;
pub use directory_removal::DirectoryRemovalSuite;
pub use file_create::FileCreateSuite;
pub use file_rename::{FileRenameContext, FileRenameSuite};
pub use open_during_create::{OpenDuringCreateContext, OpenDuringCreateSuite};

use crate::scratch::Scratch;
use crate::slots::ResultSlots;
use crate::suite::RegisteredSuite;
use mtfs_core::{Errno, Result};
use std::path::PathBuf;

/// All builtin suites in registration order.
pub fn builtin() -> Vec<Box<dyn RegisteredSuite>> {
    vec![
        Box::new(FileCreateSuite),
        Box::new(DirectoryCreateSuite),
        Box::new(DirectoryRemovalSuite),
        Box::new(FileRenameSuite),
        Box::new(OpenDuringCreateSuite),
        Box::new(Bonnie64Suite),
    ]
}

/// State shared by the single-target race suites.
#[derive(Debug)]
pub struct RaceContext {
    /// Per-run directory holding the target
    pub scratch: Scratch,
    /// Path every thread operates on
    pub target: PathBuf,
    /// One errno per thread
    pub results: ResultSlots<Errno>,
}

impl RaceContext {
    /// Context whose target is `scratch/<target>`.
    ///
    /// On error `scratch` is dropped, which removes it.
    pub fn new(scratch: Scratch, target: &str, thread_count: usize) -> Result<Self> {
        let results = ResultSlots::new(thread_count)?;
        let target = scratch.join(target);
        Ok(Self {
            scratch,
            target,
            results,
        })
    }

    /// Record the outcome of thread `id`.
    pub fn record(&self, id: usize, code: Errno) -> Result<()> {
        self.results.record(id, code)?;
        Ok(())
    }
}
