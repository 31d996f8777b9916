//! Shared test utilities for the root integration suites.
//!
//! Import via `mod common;` from any test's main.rs.

#![allow(dead_code)]

use std::fs;
use std::io;
use std::thread::{Scope, ScopedJoinHandle};

use mtfs::{
    Bonnie64Params, OsThreadSpawner, RunConfig, SuiteParams, SuiteSelection, WorkerBody,
    WorkerExit, WorkerSpawner,
};
use tempfile::TempDir;

// ============================================================================
// Configuration
// ============================================================================

/// Suite parameters rooted in `dir`, with a bonnie64 file small enough for CI.
pub fn params_in(dir: &TempDir) -> SuiteParams {
    SuiteParams {
        work_dir: dir.path().to_path_buf(),
        bonnie64: Bonnie64Params {
            file_size: 32 * 1024,
            buffer_size: 2048,
            iterations: 100,
            update_every: 10,
        },
        ..SuiteParams::default()
    }
}

/// A run of `selection` with `threads` workers, once.
pub fn run_config(dir: &TempDir, threads: usize, selection: SuiteSelection) -> RunConfig {
    RunConfig {
        thread_count: threads,
        run_count: 1,
        selection,
        params: params_in(dir),
    }
}

/// Names of whatever is left in `dir`.
pub fn leftovers(dir: &TempDir) -> Vec<String> {
    fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

// ============================================================================
// Spawners
// ============================================================================

/// Spawns real threads until worker `fail_at`, which fails with EAGAIN.
pub struct FailingSpawner {
    pub fail_at: usize,
}

impl WorkerSpawner for FailingSpawner {
    fn spawn<'scope, 'env>(
        &self,
        scope: &'scope Scope<'scope, 'env>,
        label: &str,
        id: usize,
        body: WorkerBody<'scope>,
    ) -> io::Result<ScopedJoinHandle<'scope, WorkerExit>> {
        if id == self.fail_at {
            return Err(io::Error::from_raw_os_error(libc::EAGAIN));
        }
        OsThreadSpawner::new().spawn(scope, label, id, body)
    }
}
