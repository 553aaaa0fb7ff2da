//! The plans carousel.
//!
//! One widget covers every variant the site has used: breakpoints, wrap
//! behavior, auto-play and the swipe threshold all come from
//! [`CarouselConfig`]. Navigation always recomputes from
//! [`CarouselState`], so repeated clicks while a transition is running
//! cannot push the index out of range.

mod gesture;
mod paging;

pub use gesture::{SwipeOutcome, SwipeTracker};
pub use paging::CarouselState;

use netfyber_core::CarouselConfig;

use crate::context::Ctx;
use crate::dom::ElementId;
use crate::event::{Event, Key};
use crate::timer::{TimerEvent, TimerId};

pub const TRACK_SELECTOR: &str = ".carrossel-planos";
pub const ITEM_SELECTOR: &str = ".carrossel-item";
pub const PREV_SELECTOR: &str = ".carrossel-anterior";
pub const NEXT_SELECTOR: &str = ".carrossel-proximo";
pub const INDICATORS_SELECTOR: &str = ".carrossel-indicadores";
pub const INDICATOR_CLASS: &str = "carrossel-indicador";
pub const ACTIVE_CLASS: &str = "ativo";

#[derive(Debug)]
pub struct CarouselWidget {
    cfg: CarouselConfig,
    track: ElementId,
    prev_button: Option<ElementId>,
    next_button: Option<ElementId>,
    indicator_strip: Option<ElementId>,
    indicators: Vec<ElementId>,
    state: CarouselState,
    swipe: SwipeTracker,
    autoplay: Option<TimerId>,
    resize: Option<TimerId>,
    destroyed: bool,
}

impl CarouselWidget {
    /// Binds to the carousel markup. Returns `None` when the page has no
    /// track or no items.
    pub fn mount(ctx: &mut Ctx<'_>, cfg: CarouselConfig) -> Option<Self> {
        let track = ctx.dom.query(TRACK_SELECTOR)?;
        let total = ctx.dom.query_all(ITEM_SELECTOR).len();
        if total == 0 {
            tracing::debug!("carousel markup has no items");
            return None;
        }

        let items_per_view = cfg.items_for_width(ctx.dom.viewport_width());
        let state = CarouselState::new(total, items_per_view, cfg.wrap_on_end);
        let mut widget = Self {
            track,
            prev_button: ctx.dom.query(PREV_SELECTOR),
            next_button: ctx.dom.query(NEXT_SELECTOR),
            indicator_strip: ctx.dom.query(INDICATORS_SELECTOR),
            indicators: Vec::new(),
            state,
            swipe: SwipeTracker::new(cfg.swipe_threshold_px),
            autoplay: None,
            resize: None,
            destroyed: false,
            cfg,
        };
        widget.build_indicators(ctx);
        widget.render(ctx);
        widget.restart_autoplay(ctx);
        tracing::debug!(total, items_per_view, "carousel mounted");
        Some(widget)
    }

    #[must_use]
    pub fn state(&self) -> &CarouselState {
        &self.state
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn next(&mut self, ctx: &mut Ctx<'_>) {
        self.navigate(ctx, CarouselState::next);
    }

    pub fn prev(&mut self, ctx: &mut Ctx<'_>) {
        self.navigate(ctx, CarouselState::prev);
    }

    pub fn go_to_slide(&mut self, ctx: &mut Ctx<'_>, page: usize) {
        self.navigate(ctx, |state| state.go_to(page));
    }

    /// Handles a host event. Returns `true` when the event belonged to the
    /// carousel.
    pub fn handle(&mut self, ctx: &mut Ctx<'_>, event: &Event) -> bool {
        if self.destroyed {
            return false;
        }
        match event {
            Event::Click(target) => self.on_click(ctx, *target),
            Event::KeyDown(Key::ArrowLeft) => {
                self.prev(ctx);
                true
            }
            Event::KeyDown(Key::ArrowRight) => {
                self.next(ctx);
                true
            }
            Event::PointerDown { target, x } if ctx.dom.contains(self.track, *target) => {
                self.swipe.begin(*x);
                ctx.dom.set_style(self.track, "transition", "none");
                true
            }
            Event::PointerMove { x } => match self.swipe.delta(*x) {
                Some(delta) => {
                    let transform = format!(
                        "translateX(calc({}% + {delta}px))",
                        self.state.translate_percent()
                    );
                    ctx.dom.set_style(self.track, "transform", &transform);
                    true
                }
                None => false,
            },
            Event::PointerUp { x } if self.swipe.is_dragging() => {
                ctx.dom.set_style(self.track, "transition", "");
                match self.swipe.finish(*x) {
                    SwipeOutcome::Forward => self.next(ctx),
                    SwipeOutcome::Backward => self.prev(ctx),
                    SwipeOutcome::SnapBack => self.render(ctx),
                }
                true
            }
            Event::PointerCancel if self.swipe.is_dragging() => {
                self.swipe.cancel();
                ctx.dom.set_style(self.track, "transition", "");
                self.render(ctx);
                true
            }
            Event::Resize => {
                ctx.cancel(&mut self.resize);
                self.resize =
                    Some(ctx.schedule(self.cfg.resize_debounce_ms, TimerEvent::CarouselResizeSettled));
                true
            }
            _ => false,
        }
    }

    pub fn on_timer(&mut self, ctx: &mut Ctx<'_>, event: TimerEvent) {
        if self.destroyed {
            return;
        }
        match event {
            TimerEvent::CarouselAutoplay => {
                self.autoplay = None;
                self.state.next();
                self.render(ctx);
                self.restart_autoplay(ctx);
            }
            TimerEvent::CarouselResizeSettled => {
                self.resize = None;
                let items_per_view = self.cfg.items_for_width(ctx.dom.viewport_width());
                if self.state.set_items_per_view(items_per_view) {
                    tracing::debug!(items_per_view, "carousel breakpoint changed");
                    self.build_indicators(ctx);
                    self.render(ctx);
                }
            }
            _ => {}
        }
    }

    /// Stops every timer. The widget ignores events afterwards.
    pub fn destroy(&mut self, ctx: &mut Ctx<'_>) {
        ctx.cancel(&mut self.autoplay);
        ctx.cancel(&mut self.resize);
        self.swipe.cancel();
        self.destroyed = true;
    }

    fn on_click(&mut self, ctx: &mut Ctx<'_>, target: ElementId) -> bool {
        let within = |button: Option<ElementId>| button.is_some_and(|b| ctx.dom.contains(b, target));
        let (on_prev, on_next) = (within(self.prev_button), within(self.next_button));
        if on_prev {
            self.prev(ctx);
            return true;
        }
        if on_next {
            self.next(ctx);
            return true;
        }
        match self.indicators.iter().position(|el| *el == target) {
            Some(page) => {
                self.go_to_slide(ctx, page);
                true
            }
            None => false,
        }
    }

    fn navigate(&mut self, ctx: &mut Ctx<'_>, step: impl FnOnce(&mut CarouselState)) {
        if self.destroyed {
            return;
        }
        step(&mut self.state);
        self.render(ctx);
        self.restart_autoplay(ctx);
    }

    fn restart_autoplay(&mut self, ctx: &mut Ctx<'_>) {
        ctx.cancel(&mut self.autoplay);
        if let Some(interval) = self.cfg.autoplay_interval_ms {
            self.autoplay = Some(ctx.schedule(interval, TimerEvent::CarouselAutoplay));
        }
    }

    fn build_indicators(&mut self, ctx: &mut Ctx<'_>) {
        let Some(strip) = self.indicator_strip else {
            return;
        };
        ctx.dom.clear_children(strip);
        self.indicators = (0..self.state.page_count())
            .map(|page| {
                let button = ctx.dom.create_element("button");
                ctx.dom.set_attr(button, "type", "button");
                ctx.dom.set_attr(button, "class", INDICATOR_CLASS);
                ctx.dom
                    .set_attr(button, "aria-label", &format!("Ir para slide {}", page + 1));
                ctx.dom.append_child(strip, button);
                button
            })
            .collect();
    }

    fn render(&self, ctx: &mut Ctx<'_>) {
        let transform = format!("translateX({}%)", self.state.translate_percent());
        ctx.dom.set_style(self.track, "transform", &transform);

        let active = self.state.current_page();
        for (page, indicator) in self.indicators.iter().enumerate() {
            if page == active {
                ctx.dom.add_class(*indicator, ACTIVE_CLASS);
            } else {
                ctx.dom.remove_class(*indicator, ACTIVE_CLASS);
            }
        }

        let wrap = self.state.wraps();
        let bounds = [
            (self.prev_button, !wrap && self.state.is_first_page()),
            (self.next_button, !wrap && self.state.is_last_page()),
        ];
        for (button, disabled) in bounds {
            if let Some(button) = button {
                ctx.dom.set_disabled(button, disabled);
                ctx.dom
                    .set_attr(button, "aria-disabled", if disabled { "true" } else { "false" });
            }
        }
    }
}

#[cfg(test)]
#[path = "widget_test.rs"]
mod tests;
