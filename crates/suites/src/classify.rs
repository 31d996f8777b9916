//! Outcome classification.
//!
//! Turns the bag of per-thread error codes from one suite run into a
//! pass/fail [`Verdict`]. Every suite expresses its check as one of three
//! [`Pattern`]s instead of hand-counting codes.

use mtfs_core::{Errno, Error, Result};
use std::fmt;

/// Counts of observed codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tally {
    /// Successful calls
    pub ok: usize,
    /// Calls that saw the expected contention code
    pub contention: usize,
    /// Everything else, including slots nobody wrote
    pub invalid: usize,
}

impl Tally {
    /// Count `codes`, treating `contention` (if any) as an expected loss.
    pub fn count<I>(codes: I, contention: Option<Errno>) -> Self
    where
        I: IntoIterator<Item = Errno>,
    {
        let mut tally = Tally::default();
        for code in codes {
            if code.is_success() {
                tally.ok += 1;
            } else if Some(code) == contention {
                tally.contention += 1;
            } else {
                tally.invalid += 1;
            }
        }
        tally
    }

    /// Number of codes counted.
    pub fn total(&self) -> usize {
        self.ok + self.contention + self.invalid
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ok, {} contention, {} invalid",
            self.ok, self.contention, self.invalid
        )
    }
}

/// The invariant a suite expects its codes to satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// One success; every other code equals `contention`
    ExactlyOneWinner {
        /// Code the losers must see (EEXIST, ENOENT, ...)
        contention: Errno,
    },
    /// Only successes and `absent`, with at least one success
    ManyValidPlusOneMutation {
        /// Code for "not created yet"
        absent: Errno,
    },
    /// Every code is a success
    BulkConsistency,
}

impl Pattern {
    fn contention(self) -> Option<Errno> {
        match self {
            Pattern::ExactlyOneWinner { contention } => Some(contention),
            Pattern::ManyValidPlusOneMutation { absent } => Some(absent),
            Pattern::BulkConsistency => None,
        }
    }

    /// Classify `codes` against this pattern.
    pub fn classify<I>(self, codes: I) -> Verdict
    where
        I: IntoIterator<Item = Errno>,
    {
        let tally = Tally::count(codes, self.contention());
        let passed = match self {
            Pattern::ExactlyOneWinner { .. } => {
                tally.ok == 1 && tally.contention + 1 == tally.total()
            }
            Pattern::ManyValidPlusOneMutation { .. } => tally.invalid == 0 && tally.ok >= 1,
            Pattern::BulkConsistency => tally.invalid == 0,
        };
        Verdict {
            pattern: self,
            tally,
            passed,
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::ExactlyOneWinner { contention } => {
                write!(f, "exactly one winner, losers see {}", contention)
            }
            Pattern::ManyValidPlusOneMutation { absent } => {
                write!(f, "success or {} only, at least one success", absent)
            }
            Pattern::BulkConsistency => write!(f, "every thread succeeds"),
        }
    }
}

/// Outcome of classifying one suite run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    /// Pattern checked
    pub pattern: Pattern,
    /// Observed counts
    pub tally: Tally,
    /// Whether the invariant held
    pub passed: bool,
}

impl Verdict {
    /// `Ok(self)` when passed, `InvariantViolated` otherwise.
    pub fn into_result(self, suite: &str) -> Result<Self> {
        if self.passed {
            Ok(self)
        } else {
            Err(Error::InvariantViolated {
                suite: suite.to_string(),
                summary: format!("expected {}, got {}", self.pattern, self.tally),
            })
        }
    }
}
