use super::RaceContext;
use crate::classify::{Pattern, Verdict};
use crate::scratch::Scratch;
use crate::suite::{Suite, SuiteEnv};
use mtfs_core::{Errno, Result};
use std::fs::DirBuilder;
use std::os::unix::fs::DirBuilderExt;

/// Every thread runs `mkdir` on the same path; one wins, the rest get `EEXIST`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryCreateSuite;

impl Suite for DirectoryCreateSuite {
    type Context = RaceContext;

    fn name(&self) -> &'static str {
        "directory_create_mt"
    }

    fn setup(&self, env: &SuiteEnv<'_>) -> Result<RaceContext> {
        let scratch = Scratch::create(&env.params.work_dir, self.name())?;
        RaceContext::new(scratch, "target", env.thread_count)
    }

    fn action(&self, ctx: &RaceContext, id: usize) -> Result<()> {
        let created = DirBuilder::new().mode(0o700).create(&ctx.target);
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
