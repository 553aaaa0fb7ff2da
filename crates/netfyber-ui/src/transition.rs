//! Show/hide state machine for elements animated by a CSS class.
//!
//! ```text
//! Hidden --show--> Appearing --timer--> Shown --hide--> Disappearing --timer--> Hidden
//! ```
//!
//! Showing makes the element displayed, then adds the visible class one
//! tick later so the CSS transition runs. Hiding removes the class, then
//! drops `display` once the transition has had time to finish. Only the
//! timer moves `Appearing` and `Disappearing` forward.

use crate::context::Ctx;
use crate::dom::ElementId;
use crate::timer::{TimerEvent, TimerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Hidden,
    Appearing,
    Shown,
    Disappearing,
}

#[derive(Debug)]
pub struct ClassTransition {
    el: ElementId,
    visible_class: &'static str,
    reveal_tick_ms: u64,
    hide_ms: u64,
    step_event: TimerEvent,
    state: Visibility,
    pending: Option<TimerId>,
}

impl ClassTransition {
    #[must_use]
    pub fn new(
        el: ElementId,
        visible_class: &'static str,
        reveal_tick_ms: u64,
        hide_ms: u64,
        step_event: TimerEvent,
    ) -> Self {
        Self {
            el,
            visible_class,
            reveal_tick_ms,
            hide_ms,
            step_event,
            state: Visibility::Hidden,
            pending: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> Visibility {
        self.state
    }

    #[must_use]
    pub fn element(&self) -> ElementId {
        self.el
    }

    pub fn show(&mut self, ctx: &mut Ctx<'_>) {
        match self.state {
            Visibility::Appearing | Visibility::Shown => {}
            Visibility::Hidden | Visibility::Disappearing => {
                ctx.cancel(&mut self.pending);
                ctx.dom.set_style(self.el, "display", "block");
                self.state = Visibility::Appearing;
                self.pending = Some(ctx.schedule(self.reveal_tick_ms, self.step_event));
            }
        }
    }

    pub fn hide(&mut self, ctx: &mut Ctx<'_>) {
        match self.state {
            Visibility::Hidden | Visibility::Disappearing => {}
            Visibility::Appearing | Visibility::Shown => {
                ctx.cancel(&mut self.pending);
                ctx.dom.remove_class(self.el, self.visible_class);
                self.state = Visibility::Disappearing;
                self.pending = Some(ctx.schedule(self.hide_ms, self.step_event));
            }
        }
    }

    /// Advances the machine when its step timer fires.
    pub fn on_step(&mut self, ctx: &mut Ctx<'_>) {
        self.pending = None;
        match self.state {
            Visibility::Appearing => {
                ctx.dom.add_class(self.el, self.visible_class);
                self.state = Visibility::Shown;
            }
            Visibility::Disappearing => {
                ctx.dom.set_style(self.el, "display", "none");
                self.state = Visibility::Hidden;
            }
            Visibility::Hidden | Visibility::Shown => {}
        }
    }
}
