//! Deterministic timer queue.
//!
//! Widgets never sleep. They schedule a [`TimerEvent`] for a deadline and
//! the app fires due events when the host pumps it, so every delayed
//! transition can be exercised with a hand-driven clock.

use crate::dom::ElementId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// What a timer means when it fires. Routed by the app to the owning widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Initial delay before the consent banner appears.
    ConsentBannerDue,
    /// Next step of the consent banner's show/hide transition.
    ConsentBannerStep,
    ToastExpired(ElementId),
    CarouselAutoplay,
    CarouselResizeSettled,
    BlogFadeFinished,
    LocationSettled,
}

/// A timer popped from the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueTimer {
    pub id: TimerId,
    /// The instant the timer was due; follow-up timers are scheduled
    /// relative to it, not to the pump time.
    pub deadline_ms: i64,
    pub event: TimerEvent,
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    next_id: u64,
    pending: Vec<DueTimer>,
}

impl TimerQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now_ms: i64, delay_ms: u64, event: TimerEvent) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let delay = i64::try_from(delay_ms).unwrap_or(i64::MAX);
        self.pending.push(DueTimer {
            id,
            deadline_ms: now_ms.saturating_add(delay),
            event,
        });
        id
    }

    /// Cancels `id`; returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.id != id);
        self.pending.len() != before
    }

    /// Removes and returns the earliest timer due at `now_ms`. Ties fire in
    /// scheduling order.
    pub fn pop_due(&mut self, now_ms: i64) -> Option<DueTimer> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.deadline_ms <= now_ms)
            .min_by_key(|(_, t)| (t.deadline_ms, t.id))
            .map(|(i, _)| i)?;
        Some(self.pending.swap_remove(index))
    }

    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|t| t.id == id)
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<i64> {
        self.pending.iter().map(|t| t.deadline_ms).min()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
