//! Suites and suite execution for the filesystem race harness
//!
//! - Suite / RegisteredSuite: the setup, action, aggregate, teardown contract
//! - ResultSlots: write-once per-thread outcome arena
//! - Pattern / Verdict: outcome classification
//! - Registry: ordered, name-addressable suite collection
//! - run / run_suite: the driver loop
//! - suites: the six builtin filesystem race scenarios

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod classify;
pub mod registry;
pub mod runner;
pub mod scratch;
pub mod slots;
pub mod suite;
pub mod suites;

pub use classify::{Pattern, Tally, Verdict};
pub use registry::Registry;
pub use runner::{run, run_suite, RunSummary, SuiteReport};
pub use scratch::Scratch;
pub use slots::ResultSlots;
pub use suite::{RegisteredSuite, Suite, SuiteEnv, SuiteKind};
