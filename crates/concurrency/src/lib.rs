//! Concurrency layer for the race harness
//!
//! This crate implements the synchronized fan-out used by every
//! multi-threaded suite:
//! - Barrier: single-cycle, cancellable N-party rendezvous
//! - WorkerSpawner: seam over scoped thread creation
//! - Orchestrator: spawns N workers, releases them together, joins them all

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod barrier;
pub mod orchestrator;
pub mod spawner;

pub use barrier::{Barrier, BarrierWaitResult};
pub use orchestrator::{FanOutReport, Orchestrator};
pub use spawner::{OsThreadSpawner, WorkerBody, WorkerExit, WorkerSpawner};
