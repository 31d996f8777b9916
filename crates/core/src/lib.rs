//! Core types for the filesystem race harness
//!
//! This crate defines the foundational types used throughout the system:
//! - Errno: raw OS error codes recorded by racing workers
//! - Error: error hierarchy, each variant mapped to an exit errno
//! - RunConfig / SuiteParams: immutable run configuration

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod errno;
pub mod error;

pub use config::{
    parse_count, Bonnie64Params, OpenDuringCreateParams, RunConfig, SuiteParams, SuiteSelection,
    DEFAULT_RUN_COUNT, DEFAULT_THREAD_COUNT,
};
pub use errno::Errno;
pub use error::{BarrierError, Error, Result, SlotError};
