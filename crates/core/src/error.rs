//! Error types for the harness
//!
//! Every failure that can stop a run is an [`Error`]. Each variant maps to an
//! errno through [`Error::errno`], which the binary uses as its exit status.
//! Per-thread action outcomes are *not* errors: they are data recorded in
//! result slots and judged by the classifier.

use crate::errno::Errno;
use std::io;
use thiserror::Error;

/// Result type alias for harness operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the rendezvous barrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BarrierError {
    /// A barrier needs at least one party
    #[error("barrier requires at least one party")]
    ZeroParties,

    /// The barrier was cancelled before the cohort was complete
    #[error("barrier cancelled")]
    Cancelled,

    /// The single release cycle already completed
    #[error("barrier of {parties} parties already released")]
    Exhausted {
        /// Party count of the exhausted barrier
        parties: usize,
    },
}

/// Errors raised when recording into per-thread result slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SlotError {
    /// Thread id outside `0..len`
    #[error("slot {index} out of range for {len} slots")]
    OutOfRange {
        /// Offending index
        index: usize,
        /// Number of slots
        len: usize,
    },

    /// A thread recorded its outcome twice
    #[error("slot {index} already recorded")]
    AlreadyRecorded {
        /// Offending index
        index: usize,
    },
}

/// Error types for the harness
#[derive(Debug, Error)]
pub enum Error {
    /// Wrong number of command-line arguments
    #[error("usage: {0}")]
    Usage(String),

    /// A numeric argument did not parse
    #[error("invalid {what}: {value:?}")]
    InvalidNumber {
        /// Which argument
        what: &'static str,
        /// Raw text
        value: String,
    },

    /// A numeric argument does not fit
    #[error("{what} out of range: {value:?}")]
    NumberOutOfRange {
        /// Which argument
        what: &'static str,
        /// Raw text
        value: String,
    },

    /// A run needs at least one thread
    #[error("thread count must be at least 1")]
    ZeroThreads,

    /// Suite lookup failed
    #[error("suite not found: {0}")]
    UnknownSuite(String),

    /// Invalid suite parameters or config file
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error during setup, teardown or fixture verification
    #[error("{context}: {source}")]
    Io {
        /// What was being done
        context: String,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Barrier construction or use failed
    #[error("barrier error: {0}")]
    Barrier(#[from] BarrierError),

    /// Spawning a worker thread failed
    #[error("creation of thread {thread} for {label} failed: {source}")]
    Spawn {
        /// Suite or group label
        label: String,
        /// Worker id that could not be started
        thread: usize,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// A worker panicked and could not be joined cleanly
    #[error("error joining thread {thread} for {label}: worker panicked")]
    WorkerPanicked {
        /// Suite or group label
        label: String,
        /// Worker id
        thread: usize,
    },

    /// Per-thread bookkeeping for the requested thread count cannot be allocated
    #[error("cannot allocate {what} for {count} threads")]
    OutOfMemory {
        /// What was being allocated
        what: &'static str,
        /// Requested element count
        count: usize,
    },

    /// Result-slot misuse
    #[error("result slot error: {0}")]
    Slot(#[from] SlotError),

    /// The observed outcome distribution broke the suite's invariant
    #[error("invariant violated for suite {suite}: {summary}")]
    InvariantViolated {
        /// Suite name
        suite: String,
        /// Human-readable tally
        summary: String,
    },
}

impl Error {
    /// Wrap an I/O error with a short description of the failed step.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Error::Io {
            context: context.into(),
            source,
        }
    }

    /// True for errors detected before any suite runs.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::Usage(_)
                | Error::InvalidNumber { .. }
                | Error::NumberOutOfRange { .. }
                | Error::ZeroThreads
                | Error::UnknownSuite(_)
                | Error::Config(_)
        )
    }

    /// The errno reported as process exit status.
    pub fn errno(&self) -> Errno {
        match self {
            Error::Usage(_) | Error::ZeroThreads | Error::Config(_) | Error::Barrier(_) => {
                Errno::EINVAL
            }
            Error::InvalidNumber { .. } | Error::UnknownSuite(_) => Errno::ENOENT,
            Error::NumberOutOfRange { .. } => Errno::ERANGE,
            Error::Io { source, .. } => Errno::from_io(source),
            Error::Spawn { source, .. } => source
                .raw_os_error()
                .map(Errno::new)
                .unwrap_or(Errno::EAGAIN),
            Error::WorkerPanicked { .. } => Errno::ECANCELED,
            Error::OutOfMemory { .. } => Errno::ENOMEM,
            Error::Slot(_) => Errno::EFAULT,
            Error::InvariantViolated { .. } => Errno::EPROTO,
        }
    }
}
