//! Concurrent/Multi-threaded Tests for mtfs-concurrency
//!
//! These tests exercise the barrier and orchestrator with real threads:
//!
//! 1. **Rendezvous** - nobody passes before the whole cohort arrives
//! 2. **Partial launch** - a spawn failure cancels and joins started workers
//! 3. **Stress** - large cohorts and repeated fan-outs do not hang or leak
//!
//! ## Running These Tests
//!
//! ```bash
//! cargo test --test concurrent_tests
//! ```

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, Scope, ScopedJoinHandle};
use std::time::Duration;

use mtfs_concurrency::{
    Barrier, FanOutReport, Orchestrator, OsThreadSpawner, WorkerBody, WorkerExit, WorkerSpawner,
};
use mtfs_core::{Errno, Error};
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

/// Spawns real threads until `fail_at`, then reports EAGAIN.
struct FailingSpawner {
    fail_at: usize,
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

// ============================================================================
// SECTION 1: Rendezvous
// ============================================================================

mod rendezvous {
    use super::*;

    /// N-1 arrivals never return; the Nth releases everyone.
    #[test]
    fn test_n_minus_one_waits_never_return() {
        for parties in [2usize, 3, 7] {
            let barrier = Arc::new(Barrier::new(parties).unwrap());
            let returned = Arc::new(AtomicUsize::new(0));

            let handles: Vec<_> = (0..parties - 1)
                .map(|_| {
                    let b = Arc::clone(&barrier);
                    let r = Arc::clone(&returned);
                    thread::spawn(move || {
                        let result = b.wait().unwrap();
                        r.fetch_add(1, Ordering::SeqCst);
                        result
                    })
                })
                .collect();

            while barrier.arrived() < parties - 1 {
                thread::sleep(Duration::from_millis(1));
            }
            thread::sleep(Duration::from_millis(30));
            assert_eq!(returned.load(Ordering::SeqCst), 0, "parties={}", parties);

            assert!(barrier.wait().unwrap().is_leader());
            for h in handles {
                assert!(!h.join().unwrap().is_leader());
            }
            assert_eq!(returned.load(Ordering::SeqCst), parties - 1);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        /// Any cohort size releases every participant with exactly one leader.
        #[test]
        fn prop_exactly_one_leader(parties in 1usize..24) {
            let barrier = Barrier::new(parties).unwrap();
            let leaders = AtomicUsize::new(0);
            thread::scope(|scope| {
                for _ in 0..parties {
                    scope.spawn(|| {
                        if barrier.wait().unwrap().is_leader() {
                            leaders.fetch_add(1, Ordering::SeqCst);
                        }
                    });
                }
            });
            prop_assert_eq!(leaders.load(Ordering::SeqCst), 1);
            prop_assert_eq!(barrier.arrived(), parties);
        }
    }
}

// ============================================================================
// SECTION 2: Partial launch failure
// ============================================================================

mod partial_launch {
    use super::*;

    #[test]
    fn test_spawn_failure_cancels_and_joins_started_workers() {
        let ran = AtomicUsize::new(0);
        let orchestrator = Orchestrator::with_spawner(FailingSpawner { fail_at: 5 });

        let result = orchestrator.fan_out("partial", 10, |_| {
            ran.fetch_add(1, Ordering::SeqCst);
        });

        match result {
            Err(err @ Error::Spawn { .. }) => {
                assert_eq!(err.errno(), Errno::EAGAIN);
                if let Error::Spawn { label, thread, .. } = err {
                    assert_eq!(label, "partial");
                    assert_eq!(thread, 5);
                }
            }
            other => panic!("expected Spawn error, got {:?}", other),
        }
        // No started worker got past the barrier
        assert_eq!(ran.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_spawn_failure_on_first_worker() {
        let orchestrator = Orchestrator::with_spawner(FailingSpawner { fail_at: 0 });
        let result = orchestrator.fan_out("first", 3, |_| {});
        assert!(matches!(result, Err(Error::Spawn { thread: 0, .. })));
    }

    #[test]
    fn test_failure_index_beyond_cohort_is_harmless() {
        let orchestrator = Orchestrator::with_spawner(FailingSpawner { fail_at: 99 });
        let report = orchestrator.fan_out("whole", 4, |_| {}).unwrap();
        assert_eq!(
            report,
            FanOutReport {
                launched: 4,
                completed: 4,
                cancelled: 0
            }
        );
    }
}

// ============================================================================
// SECTION 3: Stress
// ============================================================================

mod stress {
    use super::*;

    #[test]
    fn test_large_cohort() {
        let counter = AtomicUsize::new(0);
        let report = Orchestrator::new()
            .fan_out("large", 256, |_| {
                counter.fetch_add(1, Ordering::Relaxed);
            })
            .unwrap();
        assert_eq!(counter.load(Ordering::Relaxed), 256);
        assert_eq!(report.completed, 256);
    }

    #[test]
    fn test_repeated_fan_outs_use_fresh_barriers() {
        let orchestrator = Orchestrator::new();
        let counter = AtomicUsize::new(0);
        for _ in 0..20 {
            orchestrator
                .fan_out("repeat", 8, |_| {
                    counter.fetch_add(1, Ordering::Relaxed);
                })
                .unwrap();
        }
        assert_eq!(counter.load(Ordering::Relaxed), 160);
    }

    #[test]
    fn test_slots_partitioned_by_id() {
        // Each worker writes only its own slot; no lock needed
        let slots: Vec<AtomicUsize> = (0..64).map(|_| AtomicUsize::new(usize::MAX)).collect();
        Orchestrator::new()
            .fan_out("slots", 64, |id| {
                slots[id].store(id * 2, Ordering::Relaxed);
            })
            .unwrap();
        for (id, slot) in slots.iter().enumerate() {
            assert_eq!(slot.load(Ordering::Relaxed), id * 2);
        }
    }
}
