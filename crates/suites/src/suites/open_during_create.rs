use crate::classify::{Pattern, Verdict};
use crate::scratch::Scratch;
use crate::slots::ResultSlots;
use crate::suite::{Suite, SuiteEnv};
use mtfs_core::{Errno, Result};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use tracing::error;

/// Written by the creator so readers race against a non-empty file.
const PAYLOAD: &[u8] =
    b"AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAABBBBBBBBBBBBBBBBBBBBBBCCCCCCCCCCCCCCCCCCDDDDDDDDDDDDDDDDDDEEEEEEEEEEEEEFFFFFFFFFFFFFFFFFf";

/// Readers repeatedly open a path while one thread creates it.
///
/// Thread `N/2` creates the file at its attempt `A/2`; every other attempt
/// opens read-only. Each attempt must either succeed or see `ENOENT`, and the
/// creation itself guarantees at least one success.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenDuringCreateSuite;

/// Per-run state for [`OpenDuringCreateSuite`].
#[derive(Debug)]
pub struct OpenDuringCreateContext {
    /// Per-run directory holding the target
    pub scratch: Scratch,
    /// File being created and opened
    pub target: PathBuf,
    /// Attempts made by every thread
    pub attempts: usize,
    /// Thread that performs the creation
    pub creator: usize,
    /// One code per attempt, per thread
    pub results: ResultSlots<Vec<Errno>>,
}

impl OpenDuringCreateContext {
    fn creates(&self, id: usize, attempt: usize) -> bool {
        id == self.creator && attempt == self.attempts / 2
    }

    /// Every code in thread order; a thread that never recorded contributes
    /// `attempts` copies of `NOT_RUN`.
    pub fn codes(&self) -> impl Iterator<Item = Errno> + '_ {
        self.results.iter().flat_map(move |slot| match slot {
            Some(codes) => codes.clone(),
            None => vec![Errno::NOT_RUN; self.attempts],
        })
    }
}

fn create_with_payload(path: &Path) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(PAYLOAD)
}

impl Suite for OpenDuringCreateSuite {
    type Context = OpenDuringCreateContext;

    fn name(&self) -> &'static str {
        "open_during_create_mt"
    }

    fn setup(&self, env: &SuiteEnv<'_>) -> Result<OpenDuringCreateContext> {
        env.params.open_during_create.validate()?;
        let scratch = Scratch::create(&env.params.work_dir, self.name())?;
        let results = ResultSlots::new(env.thread_count)?;
        let target = scratch.join("target");
        Ok(OpenDuringCreateContext {
            scratch,
            target,
            attempts: env.params.open_during_create.attempts_per_thread,
            creator: env.thread_count / 2,
            results,
        })
    }

    fn action(&self, ctx: &OpenDuringCreateContext, id: usize) -> Result<()> {
        let codes = (0..ctx.attempts)
            .map(|attempt| {
                if ctx.creates(id, attempt) {
                    Errno::of(&create_with_payload(&ctx.target))
                } else {
                    Errno::of(&File::open(&ctx.target))
                }
            })
            .collect();
        ctx.results.record(id, codes)?;
        Ok(())
    }

    fn aggregate(&self, ctx: &OpenDuringCreateContext) -> Result<Option<Verdict>> {
        for (id, slot) in ctx.results.iter().enumerate() {
            let Some(codes) = slot else {
                error!(suite = self.name(), thread = id, "thread recorded nothing");
                continue;
            };
            for code in codes {
                if !code.is_success() && *code != Errno::ENOENT {
                    error!(suite = self.name(), thread = id, errno = %code, "unexpected open result");
                }
            }
        }

        let pattern = Pattern::ManyValidPlusOneMutation {
            absent: Errno::ENOENT,
        };
        Ok(Some(pattern.classify(ctx.codes())))
    }

    fn teardown(&self, ctx: OpenDuringCreateContext) -> Result<()> {
        ctx.scratch.close()
    }
}
