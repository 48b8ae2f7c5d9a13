//! Virtual timeline used to stagger playback and turn transitions.

use std::{collections::BTreeMap, time::Duration};

use simon_says_core::{Generation, TimerId};

/// Single-shot timer removed from the timeline when it came due.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fired<A> {
    /// Handle returned when the timer was scheduled.
    pub id: TimerId,
    /// Instant at which the timer came due.
    pub due: Duration,
    /// Generation that was current when the timer was scheduled.
    pub generation: Generation,
    /// Action carried by the timer.
    pub action: A,
}

#[derive(Clone, Debug)]
struct Scheduled<A> {
    generation: Generation,
    action: A,
}

/// Ordered queue of cancellable, single-shot delayed actions.
///
/// Time never advances on its own; callers drain due timers with
/// [`Timeline::pop_due`] and then settle the clock with
/// [`Timeline::advance_to`]. Timers sharing a due instant fire in the order
/// they were scheduled.
#[derive(Clone, Debug)]
pub struct Timeline<A> {
    now: Duration,
    next_timer_id: TimerId,
    entries: BTreeMap<(Duration, TimerId), Scheduled<A>>,
}

impl<A> Timeline<A> {
    /// Creates an empty timeline positioned at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_timer_id: TimerId::new(0),
            entries: BTreeMap::new(),
        }
    }

    /// Current position of the virtual clock.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of timers waiting to fire.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Instant at which the earliest pending timer comes due.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.entries.keys().next().map(|(due, _)| *due)
    }

    /// Schedules `action` to fire `delay` after the current instant.
    pub fn schedule(&mut self, delay: Duration, generation: Generation, action: A) -> TimerId {
        let id = self.next_timer_id;
        self.next_timer_id = TimerId::new(id.get().wrapping_add(1));
        let due = self.now.saturating_add(delay);
        let _ = self
            .entries
            .insert((due, id), Scheduled { generation, action });
        id
    }

    /// Cancels a pending timer, reporting whether it was still scheduled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let key = self.entries.keys().find(|(_, timer)| *timer == id).copied();
        match key {
            Some(key) => self.entries.remove(&key).is_some(),
            None => false,
        }
    }

    /// Cancels every pending timer, returning how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        dropped
    }

    /// Removes the earliest timer due at or before `until`.
    ///
    /// The clock moves to the timer's due instant so anything scheduled while
    /// handling it is offset from the exact moment it fired.
    pub fn pop_due(&mut self, until: Duration) -> Option<Fired<A>> {
        let (&(due, id), _) = self.entries.iter().next()?;
        if due > until {
            return None;
        }

        let scheduled = self.entries.remove(&(due, id))?;
        self.now = self.now.max(due);
        Some(Fired {
            id,
            due,
            generation: scheduled.generation,
            action: scheduled.action,
        })
    }

    /// Moves the clock forward to `until` without firing anything.
    pub fn advance_to(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}

impl<A> Default for Timeline<A> {
    fn default() -> Self {
        Self::new()
    }
}
