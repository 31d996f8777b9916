use super::RaceContext;
use crate::classify::{Pattern, Verdict};
use crate::scratch::Scratch;
use crate::suite::{Suite, SuiteEnv};
use mtfs_core::{Errno, Error, Result};
use std::fs;

/// Every thread runs `rmdir` on one pre-existing empty directory.
///
/// One removal succeeds; every other thread sees `ENOENT`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryRemovalSuite;

impl Suite for DirectoryRemovalSuite {
    type Context = RaceContext;

    fn name(&self) -> &'static str {
        "directory_removal_mt"
    }

    fn setup(&self, env: &SuiteEnv<'_>) -> Result<RaceContext> {
        let scratch = Scratch::create(&env.params.work_dir, self.name())?;
        let ctx = RaceContext::new(scratch, "target", env.thread_count)?;
        fs::create_dir(&ctx.target)
            .map_err(|e| Error::io(format!("creating {}", ctx.target.display()), e))?;
        Ok(ctx)
    }

    fn action(&self, ctx: &RaceContext, id: usize) -> Result<()> {
        let removed = fs::remove_dir(&ctx.target);
        ctx.record(id, Errno::of(&removed))
    }

    fn aggregate(&self, ctx: &RaceContext) -> Result<Option<Verdict>> {
        let pattern = Pattern::ExactlyOneWinner {
            contention: Errno::ENOENT,
        };
        Ok(Some(pattern.classify(ctx.results.codes())))
    }

    fn teardown(&self, ctx: RaceContext) -> Result<()> {
        ctx.scratch.close()
    }
}
