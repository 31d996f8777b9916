//! Suite execution.
//!
//! [`run_suite`] drives one suite through
//! `setup → action(s) → aggregate → teardown`. Teardown runs whenever setup
//! succeeded, whatever happened in between; the first error wins.
//!
//! [`run`] is the top-level loop: `run_count` passes over the selected
//! suites, stopping at the first failure.

use crate::classify::Verdict;
use crate::registry::Registry;
use crate::suite::{Suite, SuiteEnv, SuiteKind};
use mtfs_concurrency::{FanOutReport, Orchestrator};
use mtfs_core::{Error, Result, RunConfig, SuiteSelection};
use tracing::{error, info, instrument};

/// Outcome of one successful suite run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteReport {
    /// Suite name
    pub suite: &'static str,
    /// Worker accounting, for multi-threaded suites
    pub fan_out: Option<FanOutReport>,
    /// Classifier output, when the suite aggregates
    pub verdict: Option<Verdict>,
}

/// Every suite run of a successful invocation, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Per-suite reports
    pub reports: Vec<SuiteReport>,
}

impl RunSummary {
    /// Number of suite runs executed.
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// True when nothing ran (zero runs requested).
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

fn log_failure(suite: &str, step: &str, e: &Error) {
    error!(suite, errno = %e.errno(), error = %e, "error in suite {}", step);
}

fn run_action<S: Suite + ?Sized>(suite: &S, ctx: &S::Context, id: usize) -> Result<()> {
    suite.action(ctx, id).map_err(|e| {
        error!(
            suite = suite.name(),
            thread = id,
            errno = %e.errno(),
            error = %e,
            "error in suite action"
        );
        e
    })
}

fn execute<S: Suite + ?Sized>(
    suite: &S,
    ctx: &S::Context,
    env: &SuiteEnv<'_>,
    orchestrator: &Orchestrator,
) -> Result<SuiteReport> {
    let name = suite.name();

    let fan_out = match suite.kind() {
        SuiteKind::Single => {
            run_action(suite, ctx, 0)?;
            None
        }
        SuiteKind::MultiThreaded => {
            // Action errors are logged per thread and do not stop siblings
            let report = orchestrator
                .fan_out(name, env.thread_count, |id| {
                    let _ = run_action(suite, ctx, id);
                })
                .map_err(|e| {
                    log_failure(name, "orchestration", &e);
                    e
                })?;
            Some(report)
        }
    };

    let verdict = suite.aggregate(ctx).map_err(|e| {
        log_failure(name, "aggregation", &e);
        e
    })?;

    if let Some(verdict) = verdict {
        if verdict.passed {
            info!(suite = name, tally = %verdict.tally, "Success!");
        } else {
            error!(
                suite = name,
                expected = %verdict.pattern,
                tally = %verdict.tally,
                "invariant violated"
            );
        }
        verdict.into_result(name)?;
    }

    Ok(SuiteReport {
        suite: name,
        fan_out,
        verdict,
    })
}

/// Run one suite once.
#[instrument(skip_all, fields(suite = suite.name()))]
pub fn run_suite<S: Suite + ?Sized>(
    suite: &S,
    env: &SuiteEnv<'_>,
    orchestrator: &Orchestrator,
) -> Result<SuiteReport> {
    let name = suite.name();
    info!(suite = name, threads = env.thread_count, "running suite");

    let ctx = suite.setup(env).map_err(|e| {
        log_failure(name, "setup", &e);
        e
    })?;

    let outcome = execute(suite, &ctx, env, orchestrator);

    let teardown = suite.teardown(ctx).map_err(|e| {
        log_failure(name, "teardown", &e);
        e
    });

    let report = outcome?;
    teardown?;
    Ok(report)
}

/// Execute `config` against `registry`.
///
/// Validates the configuration, resolves the selection, then runs
/// `run_count` passes. The first failing suite run stops everything and its
/// error is returned.
pub fn run(
    config: &RunConfig,
    registry: &Registry,
    orchestrator: &Orchestrator,
) -> Result<RunSummary> {
    config.validate()?;
    let selected = registry.select(&config.selection)?;

    let target = match &config.selection {
        SuiteSelection::All => "all suites",
        SuiteSelection::Named(_) => selected.first().map(|s| s.name()).unwrap_or("no suite"),
    };
    info!(
        "Launching {} with {} runs of {} threads",
        target, config.run_count, config.thread_count
    );

    let env = SuiteEnv {
        thread_count: config.thread_count,
        params: &config.params,
    };

    let mut summary = RunSummary::default();
    for run_idx in 0..config.run_count {
        for suite in &selected {
            let report = suite.run(&env, orchestrator).map_err(|e| {
                error!(
                    suite = suite.name(),
                    run = run_idx,
                    errno = %e.errno(),
                    "suite run failed, stopping"
                );
                e
            })?;
            summary.reports.push(report);
        }
    }
    Ok(summary)
}
