//! Fire-once wall-clock timers
//!
//! Tasks sit in a min-heap keyed by `(due_ms, seq)` so tasks due at the
//! same instant fire in scheduling order. Cancelled tasks are discarded
//! when they reach the front of the queue.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;

/// Shared flag that stops a scheduled task from firing
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, AtomicOrdering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(AtomicOrdering::SeqCst)
    }
}

#[derive(Debug)]
struct Task<T> {
    due_ms: u64,
    seq: u64,
    token: CancellationToken,
    payload: T,
}

impl<T> PartialEq for Task<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due_ms == other.due_ms && self.seq == other.seq
    }
}

impl<T> Eq for Task<T> {}

impl<T> PartialOrd for Task<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Task<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due_ms
            .cmp(&other.due_ms)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

#[derive(Debug)]
pub struct Scheduler<T> {
    queue: BinaryHeap<Reverse<Task<T>>>,
    next_seq: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            queue: BinaryHeap::new(),
            next_seq: 0,
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `payload` to fire at `due_ms`
    pub fn schedule(&mut self, due_ms: u64, payload: T) -> CancellationToken {
        let token = CancellationToken::new();
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(Task {
            due_ms,
            seq,
            token: token.clone(),
            payload,
        }));
        token
    }

    /// Pop every live task due at or before `now_ms`, earliest first
    pub fn take_due(&mut self, now_ms: u64) -> Vec<T> {
        let mut fired = Vec::new();
        while let Some(Reverse(task)) = self.queue.peek() {
            if task.due_ms > now_ms {
                break;
            }
            if let Some(Reverse(task)) = self.queue.pop() {
                if !task.token.is_cancelled() {
                    fired.push(task.payload);
                }
            }
        }
        fired
    }

    /// Due time of the earliest live task
    pub fn next_due(&self) -> Option<u64> {
        self.queue
            .iter()
            .filter(|Reverse(t)| !t.token.is_cancelled())
            .map(|Reverse(t)| t.due_ms)
            .min()
    }

    /// Number of tasks still able to fire
    pub fn pending(&self) -> usize {
        self.queue
            .iter()
            .filter(|Reverse(t)| !t.token.is_cancelled())
            .count()
    }

    /// Cancel and drop every queued task
    pub fn cancel_all(&mut self) {
        for Reverse(task) in self.queue.drain() {
            task.token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_due_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(300, "c");
        scheduler.schedule(100, "a");
        scheduler.schedule(200, "b");

        assert!(scheduler.take_due(50).is_empty());
        assert_eq!(scheduler.next_due(), Some(100));
        assert_eq!(scheduler.take_due(250), vec!["a", "b"]);
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.take_due(300), vec!["c"]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_same_due_time_keeps_schedule_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(10, 1);
        scheduler.schedule(10, 2);
        scheduler.schedule(10, 3);
        assert_eq!(scheduler.take_due(10), vec![1, 2, 3]);
    }

    #[test]
    fn test_cancelled_task_never_fires() {
        let mut scheduler = Scheduler::new();
        let token = scheduler.schedule(100, "cancelled");
        scheduler.schedule(100, "kept");

        token.cancel();
        assert!(token.is_cancelled());
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.take_due(1_000), vec!["kept"]);
    }

    #[test]
    fn test_cancel_all() {
        let mut scheduler = Scheduler::new();
        let a = scheduler.schedule(1, ());
        let b = scheduler.schedule(2, ());

        scheduler.cancel_all();
        assert!(a.is_cancelled());
        assert!(b.is_cancelled());
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(scheduler.next_due(), None);
        assert!(scheduler.take_due(u64::MAX).is_empty());
    }
}
