use super::RaceContext;
use crate::classify::{Pattern, Verdict};
use crate::scratch::Scratch;
use crate::suite::{Suite, SuiteEnv};
use mtfs_core::{Errno, Result};
use std::fs::OpenOptions;
use std::os::unix::fs::OpenOptionsExt;

/// Every thread creates the same file with `O_CREAT | O_EXCL`.
///
/// Exactly one creation succeeds; every other thread sees `EEXIST`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileCreateSuite;

impl Suite for FileCreateSuite {
    type Context = RaceContext;

    fn name(&self) -> &'static str {
        "file_create_mt"
    }

    fn setup(&self, env: &SuiteEnv<'_>) -> Result<RaceContext> {
        let scratch = Scratch::create(&env.params.work_dir, self.name())?;
        RaceContext::new(scratch, "target", env.thread_count)
    }

    fn action(&self, ctx: &RaceContext, id: usize) -> Result<()> {
        let created = OpenOptions::new()
            .write(true)
            .create_new(true)
            .mode(0o600)
            .open(&ctx.target);
        ctx.record(id, Errno::of(&created))
    }

    fn aggregate(&self, ctx: &RaceContext) -> Result<Option<Verdict>> {
        let pattern = Pattern::ExactlyOneWinner {
            contention: Errno::EEXIST,
        };
        Ok(Some(pattern.classify(ctx.results.codes())))
    }

    fn teardown(&self, ctx: RaceContext) -> Result<()> {
        ctx.scratch.close()
    }
}
