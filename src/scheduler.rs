//! Injectable time source and a cancellable delayed-task queue.
//!
//! The session never sets up timers of its own. It schedules keyed tasks on a
//! [`Scheduler`] and the host pumps due tasks with `Session::tick`. Tests drive
//! a [`ManualClock`] instead of sleeping.

use chrono::{DateTime, Utc};
use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(add_duration(self.now.get(), by));
    }

    pub fn set(&self, to: DateTime<Utc>) {
        self.now.set(to);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

/// `at + by`, saturating instead of panicking on overflow.
pub fn add_duration(at: DateTime<Utc>, by: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(by)
        .ok()
        .and_then(|delta| at.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Handle of a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

/// A cancellable delayed task queue carrying a payload per task.
pub trait Scheduler<K> {
    /// Run `payload` once `delay` has elapsed.
    fn schedule(&mut self, payload: K, delay: Duration) -> TaskId;

    /// Cancel a pending task. Returns false if it already ran or was cancelled.
    fn cancel(&mut self, id: TaskId) -> bool;

    /// Remove and return every task whose deadline has passed, earliest first.
    fn take_due(&mut self) -> Vec<(TaskId, K)>;

    /// Remove and return every pending task regardless of deadline.
    fn drain(&mut self) -> Vec<(TaskId, K)>;

    fn pending(&self) -> usize;
}

struct ScheduledTask<K> {
    due: DateTime<Utc>,
    payload: K,
}

/// [`Scheduler`] backed by an ordered map and an injected [`Clock`].
pub struct DelayQueue<K> {
    clock: Rc<dyn Clock>,
    next_id: u64,
    tasks: BTreeMap<TaskId, ScheduledTask<K>>,
}

impl<K> DelayQueue<K> {
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self {
            clock,
            next_id: 0,
            tasks: BTreeMap::new(),
        }
    }

    /// Deadline of the earliest pending task.
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        self.tasks.values().map(|task| task.due).min()
    }
}

impl<K> Scheduler<K> for DelayQueue<K> {
    fn schedule(&mut self, payload: K, delay: Duration) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        let due = add_duration(self.clock.now(), delay);
        self.tasks.insert(id, ScheduledTask { due, payload });
        id
    }

    fn cancel(&mut self, id: TaskId) -> bool {
        self.tasks.remove(&id).is_some()
    }

    fn take_due(&mut self) -> Vec<(TaskId, K)> {
        let now = self.clock.now();
        let mut due: Vec<TaskId> = self
            .tasks
            .iter()
            .filter(|(_, task)| task.due <= now)
            .map(|(id, _)| *id)
            .collect();
        due.sort_by_key(|id| (self.tasks[id].due, *id));

        due.into_iter()
            .filter_map(|id| self.tasks.remove(&id).map(|task| (id, task.payload)))
            .collect()
    }

    fn drain(&mut self) -> Vec<(TaskId, K)> {
        std::mem::take(&mut self.tasks)
            .into_iter()
            .map(|(id, task)| (id, task.payload))
            .collect()
    }

    fn pending(&self) -> usize {
        self.tasks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn setup() -> (ManualClock, DelayQueue<&'static str>) {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap());
        let queue = DelayQueue::new(Rc::new(clock.clone()));
        (clock, queue)
    }

    #[test]
    fn test_tasks_fire_only_after_delay() {
        let (clock, mut queue) = setup();
        queue.schedule("a", Duration::from_millis(500));

        assert!(queue.take_due().is_empty());
        clock.advance(Duration::from_millis(499));
        assert!(queue.take_due().is_empty());
        clock.advance(Duration::from_millis(1));

        let fired: Vec<_> = queue.take_due().into_iter().map(|(_, k)| k).collect();
        assert_eq!(fired, vec!["a"]);
        assert_eq!(queue.pending(), 0);
    }

    #[test]
    fn test_due_tasks_come_out_earliest_first() {
        let (clock, mut queue) = setup();
        queue.schedule("late", Duration::from_secs(2));
        queue.schedule("early", Duration::from_secs(1));
        clock.advance(Duration::from_secs(3));

        let fired: Vec<_> = queue.take_due().into_iter().map(|(_, k)| k).collect();
        assert_eq!(fired, vec!["early", "late"]);
    }

    #[test]
    fn test_cancel() {
        let (clock, mut queue) = setup();
        let id = queue.schedule("a", Duration::from_secs(1));
        assert!(queue.cancel(id));
        assert!(!queue.cancel(id));
        clock.advance(Duration::from_secs(5));
        assert!(queue.take_due().is_empty());
    }

    #[test]
    fn test_drain_ignores_deadlines() {
        let (_clock, mut queue) = setup();
        queue.schedule("a", Duration::from_secs(60));
        assert!(queue.next_deadline().is_some());
        assert_eq!(queue.drain().len(), 1);
        assert_eq!(queue.pending(), 0);
    }

    #[test]
    fn test_add_duration_saturates() {
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(add_duration(at, Duration::MAX), DateTime::<Utc>::MAX_UTC);
    }
}
