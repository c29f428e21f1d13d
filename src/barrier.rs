use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tracing::debug;

/// Single-use rendezvous between the mapping and reducing phases.
///
/// Configured for a fixed number of participants; nobody returns from
/// [`PhaseBarrier::arrive_and_wait`] until all of them have arrived. Arrivals
/// are counted, not tracked per thread, so a participant that can no longer
/// wait (a panicking worker, or one that was never spawned) is accounted for
/// through [`Arrival`]'s drop or [`PhaseBarrier::forfeit`].
pub struct PhaseBarrier {
    participants: usize,
    arrived: Mutex<usize>,
    released: Condvar,
}

impl PhaseBarrier {
    pub fn new(participants: usize) -> Self {
        Self {
            participants,
            arrived: Mutex::new(0),
            released: Condvar::new(),
        }
    }

    pub fn participants(&self) -> usize {
        self.participants
    }

    pub fn arrived(&self) -> usize {
        *self.guard()
    }

    pub fn is_released(&self) -> bool {
        self.arrived() >= self.participants
    }

    fn guard(&self) -> MutexGuard<'_, usize> {
        self.arrived.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn count(&self, n: usize) -> MutexGuard<'_, usize> {
        let mut arrived = self.guard();
        *arrived = (*arrived + n).min(self.participants);
        if *arrived == self.participants {
            self.released.notify_all();
        }
        arrived
    }

    /// Arrive and block until every participant has arrived.
    pub fn arrive_and_wait(&self) {
        let start = Instant::now();
        let mut arrived = self.count(1);
        while *arrived < self.participants {
            arrived = self
                .released
                .wait(arrived)
                .unwrap_or_else(PoisonError::into_inner);
        }
        drop(arrived);
        debug!(
            wait_ms = start.elapsed().as_millis() as u64,
            "phase barrier released"
        );
    }

    /// Count `n` participants as arrived without blocking.
    pub fn forfeit(&self, n: usize) {
        drop(self.count(n));
    }

    /// One-shot arrival token. Dropping it unused counts as arriving.
    pub fn arrival(&self) -> Arrival<'_> {
        Arrival {
            barrier: self,
            spent: false,
        }
    }
}

pub struct Arrival<'a> {
    barrier: &'a PhaseBarrier,
    spent: bool,
}

impl Arrival<'_> {
    pub fn wait(mut self) {
        self.spent = true;
        self.barrier.arrive_and_wait();
    }
}

impl Drop for Arrival<'_> {
    fn drop(&mut self) {
        if !self.spent {
            self.barrier.forfeit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_nobody_passes_before_everyone_arrives() {
        let barrier = Arc::new(PhaseBarrier::new(4));
        let passed = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..3)
            .map(|_| {
                let barrier = barrier.clone();
                let passed = passed.clone();
                thread::spawn(move || {
                    barrier.arrive_and_wait();
                    passed.fetch_add(1, Ordering::SeqCst);
                })
            })
            .collect();

        while barrier.arrived() < 3 {
            thread::sleep(Duration::from_millis(1));
        }
        thread::sleep(Duration::from_millis(20));
        assert_eq!(passed.load(Ordering::SeqCst), 0);
        assert!(!barrier.is_released());

        barrier.arrive_and_wait();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(passed.load(Ordering::SeqCst), 3);
        assert!(barrier.is_released());
    }

    #[test]
    fn test_forfeit_releases_waiters() {
        let barrier = Arc::new(PhaseBarrier::new(3));
        let waiter = {
            let barrier = barrier.clone();
            thread::spawn(move || barrier.arrive_and_wait())
        };
        barrier.forfeit(2);
        waiter.join().unwrap();
        assert_eq!(barrier.arrived(), 3);
    }

    #[test]
    fn test_dropped_arrival_counts() {
        let barrier = Arc::new(PhaseBarrier::new(2));
        let waiter = {
            let barrier = barrier.clone();
            thread::spawn(move || barrier.arrival().wait())
        };
        let panicking = {
            let barrier = barrier.clone();
            thread::spawn(move || {
                let _arrival = barrier.arrival();
                panic!("worker died before the barrier");
            })
        };
        assert!(panicking.join().is_err());
        waiter.join().unwrap();
        assert!(barrier.is_released());
    }

    #[test]
    fn test_single_participant_does_not_block() {
        let barrier = PhaseBarrier::new(1);
        barrier.arrival().wait();
        assert!(barrier.is_released());
    }
}
