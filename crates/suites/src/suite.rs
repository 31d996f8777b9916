//! The suite contract.
//!
//! A suite is a stateless description of one race scenario. All mutable
//! state for a run lives in its `Context`, created by `setup`, shared
//! read-only with every `action`, read by `aggregate` and consumed by
//! `teardown`.
//!
//! [`RegisteredSuite`] erases the context type so heterogeneous suites can
//! share one registry; it is implemented for every [`Suite`].

use crate::classify::Verdict;
use crate::runner::{run_suite, SuiteReport};
use mtfs_concurrency::Orchestrator;
use mtfs_core::{Result, SuiteParams};

/// How `action` is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuiteKind {
    /// `action(ctx, 0)` runs once on the calling thread
    Single,
    /// `action(ctx, id)` runs on `thread_count` barrier-synchronized threads
    MultiThreaded,
}

/// Inputs to `setup`.
#[derive(Debug, Clone, Copy)]
pub struct SuiteEnv<'a> {
    /// Number of result slots to allocate
    pub thread_count: usize,
    /// Tuning knobs and work directory
    pub params: &'a SuiteParams,
}

/// One race scenario.
pub trait Suite: Send + Sync {
    /// Per-run state.
    type Context: Send + Sync;

    /// Unique, non-empty name used for lookup and logging.
    fn name(&self) -> &'static str;

    /// Execution shape; multi-threaded unless overridden.
    fn kind(&self) -> SuiteKind {
        SuiteKind::MultiThreaded
    }

    /// Allocate result slots and create fixtures.
    ///
    /// On error nothing runs; resources already created are released when
    /// the partially built context is dropped.
    fn setup(&self, env: &SuiteEnv<'_>) -> Result<Self::Context>;

    /// The racy unit of work for thread `id`. Records its outcome in slot `id`.
    fn action(&self, ctx: &Self::Context, id: usize) -> Result<()>;

    /// Classify the recorded outcomes. `None` means nothing to check.
    fn aggregate(&self, _ctx: &Self::Context) -> Result<Option<Verdict>> {
        Ok(None)
    }

    /// Remove every external side effect of the run.
    fn teardown(&self, ctx: Self::Context) -> Result<()> {
        drop(ctx);
        Ok(())
    }
}

/// Object-safe view of a [`Suite`] for the registry.
pub trait RegisteredSuite: Send + Sync {
    /// Suite name.
    fn name(&self) -> &'static str;

    /// Execution shape.
    fn kind(&self) -> SuiteKind;

    /// Setup, act, aggregate and tear down once.
    fn run(&self, env: &SuiteEnv<'_>, orchestrator: &Orchestrator) -> Result<SuiteReport>;
}

impl<S: Suite> RegisteredSuite for S {
    fn name(&self) -> &'static str {
        Suite::name(self)
    }

    fn kind(&self) -> SuiteKind {
        Suite::kind(self)
    }

    fn run(&self, env: &SuiteEnv<'_>, orchestrator: &Orchestrator) -> Result<SuiteReport> {
        run_suite(self, env, orchestrator)
    }
}
