//! mtfs - synchronized multi-threaded filesystem race harness
//!
//! Fires N threads at one filesystem operation at the same instant and
//! checks that the outcome distribution matches the operation's atomicity
//! guarantee (one `O_EXCL` creator wins, everyone else sees `EEXIST`, ...).
//!
//! # Quick Start
//!
//! ```ignore
//! use mtfs::{run, Orchestrator, Registry, RunConfig, SuiteSelection};
//!
//! let config = RunConfig {
//!     thread_count: 64,
//!     selection: SuiteSelection::parse("file_create_mt"),
//!     ..RunConfig::default()
//! };
//! let summary = run(&config, &Registry::builtin(), &Orchestrator::new())?;
//! ```
//!
//! # Architecture
//!
//! - `mtfs-core`: errno codes, error hierarchy, run configuration
//! - `mtfs-concurrency`: rendezvous barrier and thread orchestrator
//! - `mtfs-suites`: suite contract, classifier, registry, driver, builtin suites

pub use mtfs_concurrency::*;
pub use mtfs_core::*;
pub use mtfs_suites::*;
