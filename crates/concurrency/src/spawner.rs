//! Worker thread creation.
//!
//! The orchestrator never calls `thread::Builder` directly; it goes through a
//! [`WorkerSpawner`] so that launch failures can be injected in tests.

use std::io;
use std::thread::{Builder, Scope, ScopedJoinHandle};

/// How a worker thread finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerExit {
    /// Passed the barrier and ran its work
    Completed,
    /// Released by a cancelled barrier without running its work
    Cancelled,
}

/// The closure a worker thread runs.
pub type WorkerBody<'scope> = Box<dyn FnOnce() -> WorkerExit + Send + 'scope>;

/// Starts one scoped worker thread.
pub trait WorkerSpawner: Send + Sync {
    /// Spawn worker `id` of group `label` inside `scope`.
    fn spawn<'scope, 'env>(
        &self,
        scope: &'scope Scope<'scope, 'env>,
        label: &str,
        id: usize,
        body: WorkerBody<'scope>,
    ) -> io::Result<ScopedJoinHandle<'scope, WorkerExit>>;
}

/// Spawns real OS threads named `mtfs-<label>-<id>`.
#[derive(Debug, Clone, Default)]
pub struct OsThreadSpawner {
    stack_size: Option<usize>,
}

impl OsThreadSpawner {
    /// Spawner with the platform default stack size.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `bytes` of stack per worker.
    pub fn with_stack_size(bytes: usize) -> Self {
        Self {
            stack_size: Some(bytes),
        }
    }
}

impl WorkerSpawner for OsThreadSpawner {
    fn spawn<'scope, 'env>(
        &self,
        scope: &'scope Scope<'scope, 'env>,
        label: &str,
        id: usize,
        body: WorkerBody<'scope>,
    ) -> io::Result<ScopedJoinHandle<'scope, WorkerExit>> {
        let mut builder = Builder::new().name(format!("mtfs-{}-{}", label, id));
        if let Some(bytes) = self.stack_size {
            builder = builder.stack_size(bytes);
        }
        builder.spawn_scoped(scope, body)
    }
}
