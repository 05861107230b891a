//! Tick-keyed delayed jobs with cancellation.
//!
//! Time is the HUD tick counter, so tests drive the scheduler with a fake
//! clock simply by choosing the `now` they pass in.

/// A job due at a given tick.
#[derive(Debug, Clone, PartialEq)]
struct Scheduled<T> {
    due: u64,
    seq: u64,
    job: T,
}

#[derive(Debug, Clone)]
pub struct DelayedCheckScheduler<T> {
    pending: Vec<Scheduled<T>>,
    next_seq: u64,
}

impl<T> Default for DelayedCheckScheduler<T> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            next_seq: 0,
        }
    }
}

impl<T: PartialEq> DelayedCheckScheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `job` at tick `due`. An identical pending job is moved to the
    /// new due tick instead of being queued twice.
    pub fn schedule(&mut self, due: u64, job: T) {
        self.pending.retain(|s| s.job != job);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Scheduled { due, seq, job });
    }

    /// Drop pending jobs matching `pred`. Returns how many were cancelled.
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> usize {
        let before = self.pending.len();
        self.pending.retain(|s| !pred(&s.job));
        before - self.pending.len()
    }

    /// Remove and return every job due at or before `now`, earliest first.
    pub fn pop_due(&mut self, now: u64) -> Vec<T> {
        let (mut due, rest): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|s| s.due <= now);
        self.pending = rest;
        due.sort_by_key(|s| (s.due, s.seq));
        due.into_iter().map(|s| s.job).collect()
    }

    pub fn is_pending(&self, job: &T) -> bool {
        self.pending.iter().any(|s| &s.job == job)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
