//! End-to-end harness tests
//!
//! Drives the public facade the way the binary does: build a configuration,
//! resolve it against the builtin registry, run it, map the outcome to an
//! exit errno.
//!
//! - **Happy path** - every builtin suite passes and cleans up
//! - **Failure path** - launch failures, invariant violations and setup
//!   errors stop the run with the right errno and still tear down
//! - **Custom suites** - third-party suites plug into the same registry
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test harness
//! ```

#[path = "../common/mod.rs"]
mod common;

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use common::*;
use mtfs::suites::RaceContext;
use mtfs::{
    run, Errno, Error, Orchestrator, Pattern, Registry, Scratch, Suite, SuiteEnv, SuiteKind,
    SuiteSelection, Verdict,
};
use parking_lot::Mutex;
use tempfile::TempDir;

// ============================================================================
// Happy path
// ============================================================================

mod happy_path {
    use super::*;

    #[test]
    fn test_all_suites_pass() {
        let dir = TempDir::new().unwrap();
        let config = run_config(&dir, 12, SuiteSelection::All);

        let summary = run(&config, &Registry::builtin(), &Orchestrator::new()).unwrap();
        assert_eq!(summary.len(), 6);
        for report in &summary.reports {
            let fan_out = report.fan_out.unwrap();
            assert_eq!(fan_out.launched, 12, "{}", report.suite);
            assert_eq!(fan_out.completed, 12, "{}", report.suite);
            assert!(report.verdict.unwrap().passed, "{}", report.suite);
        }
        assert!(leftovers(&dir).is_empty());
    }

    #[test]
    fn test_repeated_runs_reuse_nothing() {
        let dir = TempDir::new().unwrap();
        let mut config = run_config(&dir, 8, SuiteSelection::parse("file_create_mt"));
        config.run_count = 25;

        let summary = run(&config, &Registry::builtin(), &Orchestrator::new()).unwrap();
        assert_eq!(summary.len(), 25);
        assert!(summary
            .reports
            .iter()
            .all(|r| r.verdict.unwrap().tally.ok == 1));
        assert!(leftovers(&dir).is_empty());
    }
}

// ============================================================================
// Failure path
// ============================================================================

mod failure_path {
    use super::*;

    #[test]
    fn test_partial_launch_fails_and_cleans_up() {
        let dir = TempDir::new().unwrap();
        let config = run_config(&dir, 10, SuiteSelection::parse("file_create_mt"));
        let orchestrator = Orchestrator::with_spawner(FailingSpawner { fail_at: 4 });

        let err = run(&config, &Registry::builtin(), &orchestrator).unwrap_err();
        assert!(matches!(err, Error::Spawn { thread: 4, .. }));
        assert_eq!(err.errno(), Errno::EAGAIN);
        assert!(leftovers(&dir).is_empty());
    }

    #[test]
    fn test_run_all_stops_at_first_failure() {
        let dir = TempDir::new().unwrap();
        let mut config = run_config(&dir, 3, SuiteSelection::All);
        config.params.work_dir = dir.path().join("missing");

        let err = run(&config, &Registry::builtin(), &Orchestrator::new()).unwrap_err();
        match &err {
            Error::Io { context, .. } => assert!(context.contains("scratch")),
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(err.errno(), Errno::ENOENT);
    }

    #[test]
    fn test_unallocatable_thread_count_fails_every_suite() {
        let dir = TempDir::new().unwrap();
        let params = params_in(&dir);
        let env = SuiteEnv {
            thread_count: usize::MAX,
            params: &params,
        };
        let orchestrator = Orchestrator::new();

        for suite in Registry::builtin().iter() {
            let err = suite.run(&env, &orchestrator).unwrap_err();
            assert!(
                matches!(err, Error::OutOfMemory { .. }),
                "{}: {:?}",
                suite.name(),
                err
            );
            assert_eq!(err.errno(), Errno::ENOMEM);
        }
        assert!(leftovers(&dir).is_empty());
    }

    #[test]
    fn test_zero_threads_rejected_before_anything_runs() {
        let dir = TempDir::new().unwrap();
        let config = run_config(&dir, 0, SuiteSelection::All);

        let err = run(&config, &Registry::builtin(), &Orchestrator::new()).unwrap_err();
        assert!(matches!(err, Error::ZeroThreads));
        assert!(leftovers(&dir).is_empty());
    }
}

// ============================================================================
// Custom suites
// ============================================================================

/// Claims every thread won, which no one-winner race allows.
struct AlwaysWinsSuite;

impl Suite for AlwaysWinsSuite {
    type Context = RaceContext;

    fn name(&self) -> &'static str {
        "always_wins"
    }

    fn setup(&self, env: &SuiteEnv<'_>) -> mtfs::Result<RaceContext> {
        let scratch = Scratch::create(&env.params.work_dir, "always_wins")?;
        RaceContext::new(scratch, "target", env.thread_count)
    }

    fn action(&self, ctx: &RaceContext, id: usize) -> mtfs::Result<()> {
        ctx.record(id, Errno::SUCCESS)
    }

    fn aggregate(&self, ctx: &RaceContext) -> mtfs::Result<Option<Verdict>> {
        let pattern = Pattern::ExactlyOneWinner {
            contention: Errno::EEXIST,
        };
        Ok(Some(pattern.classify(ctx.results.codes())))
    }

    fn teardown(&self, ctx: RaceContext) -> mtfs::Result<()> {
        ctx.scratch.close()
    }
}

/// Writes a file once on the calling thread and remembers who ran it.
struct SingleShotSuite {
    calls: AtomicUsize,
    seen: Mutex<Vec<PathBuf>>,
}

impl Suite for SingleShotSuite {
    type Context = RaceContext;

    fn name(&self) -> &'static str {
        "single_shot"
    }

    fn kind(&self) -> SuiteKind {
        SuiteKind::Single
    }

    fn setup(&self, env: &SuiteEnv<'_>) -> mtfs::Result<RaceContext> {
        let scratch = Scratch::create(&env.params.work_dir, "single_shot")?;
        RaceContext::new(scratch, "out", 1)
    }

    fn action(&self, ctx: &RaceContext, id: usize) -> mtfs::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().push(ctx.target.clone());
        let written = fs::write(&ctx.target, b"once");
        ctx.record(id, Errno::of(&written))
    }

    fn aggregate(&self, ctx: &RaceContext) -> mtfs::Result<Option<Verdict>> {
        Ok(Some(Pattern::BulkConsistency.classify(ctx.results.codes())))
    }

    fn teardown(&self, ctx: RaceContext) -> mtfs::Result<()> {
        ctx.scratch.close()
    }
}

mod custom_suites {
    use super::*;

    #[test]
    fn test_invariant_violation_maps_to_eproto() {
        let dir = TempDir::new().unwrap();
        let mut registry = Registry::new();
        registry.register(AlwaysWinsSuite).unwrap();

        let config = run_config(&dir, 4, SuiteSelection::All);
        let err = run(&config, &registry, &Orchestrator::new()).unwrap_err();
        assert!(matches!(err, Error::InvariantViolated { ref suite, .. } if suite == "always_wins"));
        assert_eq!(err.errno(), Errno::EPROTO);
        assert!(leftovers(&dir).is_empty());
    }

    #[test]
    fn test_single_suite_runs_once_regardless_of_thread_count() {
        let dir = TempDir::new().unwrap();
        let suite = SingleShotSuite {
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        };
        let params = params_in(&dir);
        let env = SuiteEnv {
            thread_count: 50,
            params: &params,
        };

        let report = mtfs::run_suite(&suite, &env, &Orchestrator::new()).unwrap();
        assert!(report.fan_out.is_none());
        assert_eq!(suite.calls.load(Ordering::SeqCst), 1);
        assert_eq!(suite.seen.lock().len(), 1);
        assert!(leftovers(&dir).is_empty());
    }

    #[test]
    fn test_builtin_plus_custom_keeps_order() {
        let mut registry = Registry::builtin();
        registry.register(AlwaysWinsSuite).unwrap();
        assert_eq!(registry.len(), 7);
        assert_eq!(registry.names().last(), Some("always_wins"));

        let dup = registry.register(AlwaysWinsSuite).unwrap_err();
        assert!(matches!(dup, Error::Config(_)));
    }
}
