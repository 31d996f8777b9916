//! Single-cycle rendezvous barrier.
//!
//! Blocks every participant until all `parties` have arrived, then releases
//! them together. The last arriver is told it was the leader. Unlike
//! `std::sync::Barrier` it can be cancelled, which is how the orchestrator
//! releases a partial cohort when not every worker could be started.

use mtfs_core::BarrierError;
use parking_lot::{Condvar, Mutex};

/// How a successful `wait` ended for one participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarrierWaitResult {
    /// The arrival that completed the cohort
    Leader,
    /// Any other arrival
    Follower,
}

impl BarrierWaitResult {
    /// True for the arrival that released everyone.
    pub fn is_leader(self) -> bool {
        matches!(self, BarrierWaitResult::Leader)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Gathering,
    Released,
    Cancelled,
}

struct State {
    arrived: usize,
    phase: Phase,
}

/// N-party barrier used for exactly one release cycle.
pub struct Barrier {
    parties: usize,
    state: Mutex<State>,
    released: Condvar,
}

impl Barrier {
    /// Create a barrier for `parties` participants.
    ///
    /// # Errors
    ///
    /// `BarrierError::ZeroParties` when `parties == 0`.
    pub fn new(parties: usize) -> Result<Self, BarrierError> {
        if parties == 0 {
            return Err(BarrierError::ZeroParties);
        }
        Ok(Self {
            parties,
            state: Mutex::new(State {
                arrived: 0,
                phase: Phase::Gathering,
            }),
            released: Condvar::new(),
        })
    }

    /// Party count fixed at construction.
    pub fn parties(&self) -> usize {
        self.parties
    }

    /// Participants that have called `wait` so far.
    pub fn arrived(&self) -> usize {
        self.state.lock().arrived
    }

    /// True once `cancel` took effect.
    pub fn is_cancelled(&self) -> bool {
        self.state.lock().phase == Phase::Cancelled
    }

    /// Block until all parties have arrived.
    ///
    /// # Errors
    ///
    /// - `Cancelled` if the barrier is cancelled before or while waiting.
    /// - `Exhausted` if called after the release cycle completed.
    pub fn wait(&self) -> Result<BarrierWaitResult, BarrierError> {
        let mut state = self.state.lock();
        match state.phase {
            Phase::Gathering => {}
            Phase::Released => {
                return Err(BarrierError::Exhausted {
                    parties: self.parties,
                })
            }
            Phase::Cancelled => return Err(BarrierError::Cancelled),
        }

        state.arrived += 1;
        if state.arrived == self.parties {
            state.phase = Phase::Released;
            self.released.notify_all();
            return Ok(BarrierWaitResult::Leader);
        }

        // Spurious wakeups loop back into wait
        loop {
            match state.phase {
                Phase::Gathering => self.released.wait(&mut state),
                Phase::Released => return Ok(BarrierWaitResult::Follower),
                Phase::Cancelled => return Err(BarrierError::Cancelled),
            }
        }
    }

    /// Wake every waiter with `Cancelled` and refuse later arrivals.
    ///
    /// Returns false if the cohort was already released; participants past
    /// the barrier are never interrupted.
    pub fn cancel(&self) -> bool {
        let mut state = self.state.lock();
        if state.phase != Phase::Gathering {
            return false;
        }
        state.phase = Phase::Cancelled;
        self.released.notify_all();
        true
    }
}

impl std::fmt::Debug for Barrier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Barrier")
            .field("parties", &self.parties)
            .field("arrived", &state.arrived)
            .field("phase", &state.phase)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_zero_parties_rejected() {
        assert!(matches!(Barrier::new(0), Err(BarrierError::ZeroParties)));
    }

    #[test]
    fn test_single_party_is_leader() {
        let barrier = Barrier::new(1).unwrap();
        assert_eq!(barrier.wait().unwrap(), BarrierWaitResult::Leader);
        assert_eq!(barrier.arrived(), 1);
    }

    #[test]
    fn test_wait_after_release_is_exhausted() {
        let barrier = Barrier::new(1).unwrap();
        barrier.wait().unwrap();
        assert_eq!(
            barrier.wait(),
            Err(BarrierError::Exhausted { parties: 1 })
        );
    }

    #[test]
    fn test_releases_all_with_one_leader() {
        let barrier = Arc::new(Barrier::new(8).unwrap());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let b = Arc::clone(&barrier);
                thread::spawn(move || b.wait().unwrap())
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let leaders = results.iter().filter(|r| r.is_leader()).count();
        assert_eq!(leaders, 1);
        assert_eq!(results.len(), 8);
    }

    #[test]
    fn test_short_cohort_blocks_until_last_arrival() {
        let barrier = Arc::new(Barrier::new(4).unwrap());
        let passed = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..3)
            .map(|_| {
                let b = Arc::clone(&barrier);
                let p = Arc::clone(&passed);
                thread::spawn(move || {
                    b.wait().unwrap();
                    p.fetch_add(1, Ordering::SeqCst);
                })
            })
            .collect();

        while barrier.arrived() < 3 {
            thread::sleep(Duration::from_millis(1));
        }
        thread::sleep(Duration::from_millis(50));
        assert_eq!(passed.load(Ordering::SeqCst), 0);

        assert_eq!(barrier.wait().unwrap(), BarrierWaitResult::Leader);
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(passed.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_cancel_wakes_waiters() {
        let barrier = Arc::new(Barrier::new(5).unwrap());
        let handles: Vec<_> = (0..2)
            .map(|_| {
                let b = Arc::clone(&barrier);
                thread::spawn(move || b.wait())
            })
            .collect();

        while barrier.arrived() < 2 {
            thread::sleep(Duration::from_millis(1));
        }
        assert!(barrier.cancel());
        assert!(barrier.is_cancelled());

        for h in handles {
            assert_eq!(h.join().unwrap(), Err(BarrierError::Cancelled));
        }
        // Late arrivals do not block
        assert_eq!(barrier.wait(), Err(BarrierError::Cancelled));
    }

    #[test]
    fn test_cancel_after_release_is_noop() {
        let barrier = Barrier::new(1).unwrap();
        barrier.wait().unwrap();
        assert!(!barrier.cancel());
        assert!(!barrier.is_cancelled());
    }
}
