//! Barrier-synchronized fan-out of one unit of work across N threads.
//!
//! Every worker blocks on a shared [`Barrier`] and only runs its work once the
//! whole cohort has arrived, so the racy call is issued by all threads as
//! close to simultaneously as the scheduler allows.
//!
//! ## Launch failures
//!
//! If worker `k` cannot be spawned, the barrier is cancelled. Workers
//! `0..k` are parked on it and return without running their work. Every
//! started worker is joined before `fan_out` returns; none is detached.
//! The barrier is the only cancellation checkpoint: a worker that already
//! passed it runs to completion.

use crate::barrier::Barrier;
use crate::spawner::{OsThreadSpawner, WorkerBody, WorkerExit, WorkerSpawner};
use mtfs_core::{Errno, Error, Result};
use std::thread;
use tracing::{debug, error, instrument, warn};

/// What happened to the workers of one fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FanOutReport {
    /// Workers actually started
    pub launched: usize,
    /// Workers that passed the barrier and ran their work
    pub completed: usize,
    /// Workers released by cancellation
    pub cancelled: usize,
}

/// Runs work across a barrier-synchronized cohort of threads.
pub struct Orchestrator {
    spawner: Box<dyn WorkerSpawner>,
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::with_spawner(OsThreadSpawner::new())
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator").finish_non_exhaustive()
    }
}

impl Orchestrator {
    /// Orchestrator backed by real OS threads.
    pub fn new() -> Self {
        Self::default()
    }

    /// Orchestrator using a custom spawner.
    pub fn with_spawner(spawner: impl WorkerSpawner + 'static) -> Self {
        Self {
            spawner: Box::new(spawner),
        }
    }

    /// Run `work(id)` for every `id` in `0..workers`, each on its own thread,
    /// all released together by a barrier.
    ///
    /// # Errors
    ///
    /// - `Barrier(ZeroParties)` when `workers == 0`.
    /// - `OutOfMemory` when handles for `workers` threads cannot be allocated;
    ///   nothing is spawned.
    /// - `Spawn` for the first worker that could not be started.
    /// - `WorkerPanicked` for the first worker whose join failed.
    ///
    /// A spawn failure takes precedence over join failures. In every case all
    /// started workers have been joined.
    #[instrument(skip(self, work))]
    pub fn fan_out<F>(&self, label: &str, workers: usize, work: F) -> Result<FanOutReport>
    where
        F: Fn(usize) + Sync,
    {
        let barrier = Barrier::new(workers)?;
        let barrier = &barrier;
        let work = &work;

        debug!(label, workers, "launching workers");

        thread::scope(|scope| -> Result<FanOutReport> {
            let mut handles = Vec::new();
            handles
                .try_reserve_exact(workers)
                .map_err(|_| Error::OutOfMemory {
                    what: "worker handles",
                    count: workers,
                })?;
            let mut launch_error = None;

            for id in 0..workers {
                let body: WorkerBody<'_> = Box::new(move || match barrier.wait() {
                    Ok(_) => {
                        work(id);
                        WorkerExit::Completed
                    }
                    Err(_) => WorkerExit::Cancelled,
                });

                match self.spawner.spawn(scope, label, id, body) {
                    Ok(handle) => handles.push(handle),
                    Err(source) => {
                        error!(
                            label,
                            thread = id,
                            errno = %Errno::from_io(&source),
                            "creation of worker thread failed"
                        );
                        launch_error = Some(Error::Spawn {
                            label: label.to_string(),
                            thread: id,
                            source,
                        });
                        break;
                    }
                }
            }

            if launch_error.is_some() && barrier.cancel() {
                warn!(
                    label,
                    started = handles.len(),
                    "cancelling started workers at the barrier"
                );
            }

            let mut report = FanOutReport {
                launched: handles.len(),
                ..FanOutReport::default()
            };
            let mut join_error = None;

            for (id, handle) in handles.into_iter().enumerate() {
                match handle.join() {
                    Ok(WorkerExit::Completed) => report.completed += 1,
                    Ok(WorkerExit::Cancelled) => report.cancelled += 1,
                    Err(_) => {
                        error!(label, thread = id, "error joining worker thread");
                        join_error.get_or_insert(Error::WorkerPanicked {
                            label: label.to_string(),
                            thread: id,
                        });
                    }
                }
            }

            match launch_error.or(join_error) {
                Some(e) => Err(e),
                None => Ok(report),
            }
        })
    }
}
