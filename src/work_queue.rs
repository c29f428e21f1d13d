use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// FIFO of file ids shared by the mappers. Drained once, never refilled
/// after the mapping phase starts.
pub struct WorkQueue {
    pending: Mutex<VecDeque<usize>>,
}

impl WorkQueue {
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(VecDeque::new()),
        }
    }

    pub fn from_ids(ids: impl IntoIterator<Item = usize>) -> Self {
        Self {
            pending: Mutex::new(ids.into_iter().collect()),
        }
    }

    fn guard(&self) -> MutexGuard<'_, VecDeque<usize>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn enqueue(&self, id: usize) {
        self.guard().push_back(id);
    }

    /// Pop the front id, or `None` once the queue is drained.
    pub fn try_dequeue(&self) -> Option<usize> {
        self.guard().pop_front()
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }
}

impl Default for WorkQueue {
    fn default() -> Self {
        Self::new()
    }
}
