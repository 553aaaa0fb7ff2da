use chrono::{DateTime, TimeZone, Utc};
use netfyber_core::KeyValueStore;

use crate::dom::{Dom, ElementId};
use crate::notify::{Notifier, ToastKind};
use crate::timer::{TimerEvent, TimerId, TimerQueue};

/// Everything a widget handler may touch while reacting to one event.
pub struct Ctx<'a> {
    pub dom: &'a mut dyn Dom,
    pub store: &'a mut dyn KeyValueStore,
    pub timers: &'a mut TimerQueue,
    pub notifier: &'a mut Notifier,
    /// Logical time of the event being handled, in epoch milliseconds.
    pub now_ms: i64,
}

impl Ctx<'_> {
    pub fn schedule(&mut self, delay_ms: u64, event: TimerEvent) -> TimerId {
        self.timers.schedule(self.now_ms, delay_ms, event)
    }

    /// Cancels the timer in `slot`, if any, and clears the slot.
    pub fn cancel(&mut self, slot: &mut Option<TimerId>) {
        if let Some(id) = slot.take() {
            self.timers.cancel(id);
        }
    }

    pub fn toast(&mut self, message: &str, kind: ToastKind) -> ElementId {
        self.notifier
            .show(&mut *self.dom, self.timers, self.now_ms, message, kind)
    }

    #[must_use]
    pub fn now_utc(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.now_ms)
            .single()
            .unwrap_or_default()
    }
}
