//! Run configuration
//!
//! [`RunConfig`] is built once from the command line and never mutated.
//! Suite tuning knobs live in [`SuiteParams`], which can be loaded from a
//! TOML file:
//!
//! ```toml
//! # Directory in which each suite run creates its scratch directory
//! work_dir = "."
//!
//! [open_during_create]
//! attempts_per_thread = 100
//!
//! [bonnie64]
//! file_size = 8388608
//! buffer_size = 16384
//! iterations = 4000
//! update_every = 10
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::num::IntErrorKind;
use std::path::{Path, PathBuf};

/// Workers launched per multi-threaded suite when not specified.
pub const DEFAULT_THREAD_COUNT: usize = 500;
/// Runs of the selected suite(s) when not specified.
pub const DEFAULT_RUN_COUNT: u64 = 1;

/// Which suites a run covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuiteSelection {
    /// Every registered suite, in registration order
    All,
    /// One suite, by canonical name
    Named(String),
}

impl SuiteSelection {
    /// Parse a suite argument. `all` matches case-insensitively.
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("all") {
            SuiteSelection::All
        } else {
            SuiteSelection::Named(raw.to_string())
        }
    }
}

/// Parameters of the open-during-create suite.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct OpenDuringCreateParams {
    /// Open attempts made by every thread
    pub attempts_per_thread: usize,
}

impl Default for OpenDuringCreateParams {
    fn default() -> Self {
        Self {
            attempts_per_thread: 100,
        }
    }
}

/// Parameters of the bonnie64 I/O stress suite.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Bonnie64Params {
    /// Size of the shared file in bytes
    pub file_size: u64,
    /// Block size used for chunked I/O and random seeks
    pub buffer_size: usize,
    /// Seek/read iterations per thread
    pub iterations: usize,
    /// Every n-th iteration rewrites the block it read
    pub update_every: usize,
}

impl OpenDuringCreateParams {
    /// Reject an attempt count that would never create the file.
    pub fn validate(&self) -> Result<()> {
        if self.attempts_per_thread == 0 {
            return Err(Error::Config(
                "open_during_create.attempts_per_thread must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Bonnie64Params {
    fn default() -> Self {
        Self {
            file_size: 8 * 1024 * 1024,
            buffer_size: 16384,
            iterations: 4000,
            update_every: 10,
        }
    }
}

impl Bonnie64Params {
    /// Number of whole blocks in the file, `0` when `buffer_size` is `0`.
    pub fn block_count(&self) -> u64 {
        self.file_size
            .checked_div(self.buffer_size as u64)
            .unwrap_or(0)
    }

    /// Reject sizes the chunked phases and the stress loop cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.buffer_size == 0 {
            return Err(Error::Config(
                "bonnie64.buffer_size must be at least 1".to_string(),
            ));
        }
        if self.block_count() == 0 {
            return Err(Error::Config(format!(
                "bonnie64.file_size ({}) must hold at least one {}-byte block",
                self.file_size, self.buffer_size
            )));
        }
        if self.update_every == 0 {
            return Err(Error::Config(
                "bonnie64.update_every must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Tuning knobs shared by all suites.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct SuiteParams {
    /// Parent directory of every scratch directory
    pub work_dir: PathBuf,
    /// open_during_create_mt knobs
    pub open_during_create: OpenDuringCreateParams,
    /// bonnie64_mt knobs
    pub bonnie64: Bonnie64Params,
}

impl Default for SuiteParams {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("."),
            open_during_create: OpenDuringCreateParams::default(),
            bonnie64: Bonnie64Params::default(),
        }
    }
}

impl SuiteParams {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let params: SuiteParams =
            toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::io(format!("reading {}", path.display()), e))?;
        Self::from_toml_str(&content)
    }

    /// Reject parameter combinations no suite can run with.
    pub fn validate(&self) -> Result<()> {
        self.open_during_create.validate()?;
        self.bonnie64.validate()
    }
}

/// Everything a run needs, parsed once at start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Workers per multi-threaded suite run
    pub thread_count: usize,
    /// Times the selection is executed
    pub run_count: u64,
    /// Suites covered by each run
    pub selection: SuiteSelection,
    /// Suite tuning knobs
    pub params: SuiteParams,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            thread_count: DEFAULT_THREAD_COUNT,
            run_count: DEFAULT_RUN_COUNT,
            selection: SuiteSelection::All,
            params: SuiteParams::default(),
        }
    }
}

impl RunConfig {
    /// A zero-thread run is rejected up front; a zero-run run is a no-op.
    pub fn validate(&self) -> Result<()> {
        if self.thread_count == 0 {
            return Err(Error::ZeroThreads);
        }
        self.params.validate()
    }
}

/// Parse a non-negative decimal count that must fit in 64 bits.
///
/// The text must be digits only; surrounding whitespace is rejected.
pub fn parse_count(what: &'static str, raw: &str) -> Result<u64> {
    raw.parse::<u64>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow => Error::NumberOutOfRange {
            what,
            value: raw.to_string(),
        },
        _ => Error::InvalidNumber {
            what,
            value: raw.to_string(),
        },
    })
}
