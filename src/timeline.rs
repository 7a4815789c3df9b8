//! A virtual clock for cooperative scheduling.
//!
//! Nothing here runs on its own. The owner schedules continuations with a delay and later calls
//! [`Timeline::pop_due`] while advancing the clock; continuations come back one at a time in due
//! order (ties in scheduling order), each tagged with the [`Generation`] it was scheduled under so
//! the owner can drop the ones a newer run has made stale.

use std::time::Duration;

/// Run counter used to invalidate continuations from superseded runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(u64);

impl Generation {
    /// The generation after this one.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

#[derive(Debug)]
struct Scheduled<C> {
    due: Duration,
    seq: u64,
    generation: Generation,
    continuation: C,
}

#[derive(Debug)]
pub(crate) struct Timeline<C> {
    now: Duration,
    seq: u64,
    pending: Vec<Scheduled<C>>,
}

impl<C> Default for Timeline<C> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            seq: 0,
            pending: Vec::new(),
        }
    }
}

impl<C> Timeline<C> {
    /// Time elapsed since the timeline was created.
    pub(crate) fn now(&self) -> Duration {
        self.now
    }

    pub(crate) fn schedule(&mut self, delay: Duration, generation: Generation, continuation: C) {
        self.pending.push(Scheduled {
            due: self.now.saturating_add(delay),
            seq: self.seq,
            generation,
            continuation,
        });
        self.seq += 1;
    }

    /// Time until the earliest pending continuation is due.
    pub(crate) fn until_next(&self) -> Option<Duration> {
        self.earliest()
            .map(|i| self.pending[i].due.saturating_sub(self.now))
    }

    /// Removes and returns the earliest continuation due at or before `until`, moving the clock to
    /// its due time. Returns `None` once nothing more is due; call [`Timeline::settle`] then.
    pub(crate) fn pop_due(&mut self, until: Duration) -> Option<(Generation, C)> {
        let index = self.earliest()?;
        if self.pending[index].due > until {
            return None;
        }
        let scheduled = self.pending.swap_remove(index);
        self.now = self.now.max(scheduled.due);
        Some((scheduled.generation, scheduled.continuation))
    }

    /// Moves the clock forward to `until` once every due continuation has been popped.
    pub(crate) fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    /// Drops every pending continuation regardless of generation.
    pub(crate) fn cancel_all(&mut self) {
        self.pending.clear();
    }

    fn earliest(&self) -> Option<usize> {
        self.pending
            .iter()
            .enumerate()
            .min_by_key(|(_, s)| (s.due, s.seq))
            .map(|(i, _)| i)
    }
}
