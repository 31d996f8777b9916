use super::RaceContext;
use crate::classify::{Pattern, Verdict};
use crate::scratch::Scratch;
use crate::suite::{Suite, SuiteEnv};
use mtfs_core::{Errno, Error, Result};
use std::fs::{self, File};
use std::path::PathBuf;

/// Every thread renames the same existing file to the same destination.
///
/// One rename succeeds; every other thread sees `ENOENT` for the source.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileRenameSuite;

/// Race context plus the rename destination.
#[derive(Debug)]
pub struct FileRenameContext {
    /// Source file in `race.target`
    pub race: RaceContext,
    /// Destination path inside the same scratch directory
    pub destination: PathBuf,
}

impl Suite for FileRenameSuite {
    type Context = FileRenameContext;

    fn name(&self) -> &'static str {
        "file_rename_mt"
    }

    fn setup(&self, env: &SuiteEnv<'_>) -> Result<FileRenameContext> {
        let scratch = Scratch::create(&env.params.work_dir, self.name())?;
        let race = RaceContext::new(scratch, "source", env.thread_count)?;
        File::create(&race.target)
            .map_err(|e| Error::io(format!("creating {}", race.target.display()), e))?;
        let destination = race.scratch.join("renamed");
        Ok(FileRenameContext { race, destination })
    }

    fn action(&self, ctx: &FileRenameContext, id: usize) -> Result<()> {
        let renamed = fs::rename(&ctx.race.target, &ctx.destination);
        ctx.race.record(id, Errno::of(&renamed))
    }

    fn aggregate(&self, ctx: &FileRenameContext) -> Result<Option<Verdict>> {
        let pattern = Pattern::ExactlyOneWinner {
            contention: Errno::ENOENT,
        };
        Ok(Some(pattern.classify(ctx.race.results.codes())))
    }

    fn teardown(&self, ctx: FileRenameContext) -> Result<()> {
        ctx.race.scratch.close()
    }
}
