//! Toast notifications.
//!
//! At most one toast is on screen. Showing a new one replaces the previous
//! toast; each removes itself after the configured lifetime.

use crate::dom::{Dom, ElementId};
use crate::timer::{TimerEvent, TimerId, TimerQueue};

const TOAST_STYLE: [(&str, &str); 5] = [
    ("top", "20px"),
    ("right", "20px"),
    ("z-index", "9999"),
    ("min-width", "300px"),
    ("box-shadow", "0 5px 15px rgba(0,0,0,0.2)"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Info,
    Warning,
    Danger,
}

impl ToastKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ToastKind::Success => "success",
            ToastKind::Info => "info",
            ToastKind::Warning => "warning",
            ToastKind::Danger => "danger",
        }
    }
}

impl std::fmt::Display for ToastKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct Notifier {
    lifetime_ms: u64,
    current: Option<(ElementId, TimerId)>,
}

impl Notifier {
    #[must_use]
    pub fn new(lifetime_ms: u64) -> Self {
        Self {
            lifetime_ms,
            current: None,
        }
    }

    /// The toast currently on screen, if any.
    #[must_use]
    pub fn current(&self) -> Option<ElementId> {
        self.current.map(|(el, _)| el)
    }

    pub fn show(
        &mut self,
        dom: &mut dyn Dom,
        timers: &mut TimerQueue,
        now_ms: i64,
        message: &str,
        kind: ToastKind,
    ) -> ElementId {
        if let Some((previous, timer)) = self.current.take() {
            timers.cancel(timer);
            dom.remove(previous);
        }

        let toast = dom.create_element("div");
        dom.set_attr(
            toast,
            "class",
            &format!("alert alert-{kind} alert-dismissible fade show position-fixed"),
        );
        dom.set_attr(toast, "role", "alert");
        for (property, value) in TOAST_STYLE {
            dom.set_style(toast, property, value);
        }
        dom.set_text(toast, message);

        let close = dom.create_element("button");
        dom.set_attr(close, "type", "button");
        dom.set_attr(close, "class", "btn-close");
        dom.set_attr(close, "data-bs-dismiss", "alert");
        dom.append_child(toast, close);

        let body = dom.body();
        dom.append_child(body, toast);

        let timer = timers.schedule(now_ms, self.lifetime_ms, TimerEvent::ToastExpired(toast));
        self.current = Some((toast, timer));
        tracing::debug!(%kind, message, "toast shown");
        toast
    }

    /// Removes `toast` once its lifetime ends. A toast the visitor already
    /// dismissed is simply gone.
    pub fn expire(&mut self, dom: &mut dyn Dom, toast: ElementId) {
        if dom.is_connected(toast) {
            dom.remove(toast);
        }
        if self.current.is_some_and(|(el, _)| el == toast) {
            self.current = None;
        }
    }
}
