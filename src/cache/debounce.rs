use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use crate::scheduler::{Scheduler, TaskId};

/// Coalesces bursts of touches per key into one task after an idle window.
///
/// Every touch cancels the key's pending task and schedules a new one, so at
/// most one task per key is ever pending.
pub struct Debouncer<K> {
    scheduler: Box<dyn Scheduler<K>>,
    window: Duration,
    pending: HashMap<K, TaskId>,
}

impl<K: Clone + Eq + Hash> Debouncer<K> {
    pub fn new(scheduler: Box<dyn Scheduler<K>>, window: Duration) -> Self {
        Self {
            scheduler,
            window,
            pending: HashMap::new(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn touch(&mut self, key: K) {
        if let Some(previous) = self.pending.remove(&key) {
            self.scheduler.cancel(previous);
        }
        let id = self.scheduler.schedule(key.clone(), self.window);
        self.pending.insert(key, id);
    }

    pub fn cancel(&mut self, key: &K) -> bool {
        match self.pending.remove(key) {
            Some(id) => self.scheduler.cancel(id),
            None => false,
        }
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.contains_key(key)
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Keys whose idle window has elapsed.
    pub fn take_due(&mut self) -> Vec<K> {
        let due = self.scheduler.take_due();
        self.settle(due)
    }

    /// Every pending key, whether or not its window has elapsed.
    pub fn drain(&mut self) -> Vec<K> {
        let all = self.scheduler.drain();
        self.settle(all)
    }

    fn settle(&mut self, fired: Vec<(TaskId, K)>) -> Vec<K> {
        fired
            .into_iter()
            .filter(|(id, key)| {
                if self.pending.get(key) == Some(id) {
                    self.pending.remove(key);
                    true
                } else {
                    false
                }
            })
            .map(|(_, key)| key)
            .collect()
    }
}
