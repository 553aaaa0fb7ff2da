//! Page bootstrap: owns the widgets and routes host events and timers.
//!
//! There is no ambient state. The host builds one [`App`] per page load
//! with its document, storage and clock, calls [`App::start`], forwards
//! events to [`App::dispatch`] and drives time with [`App::advance_to`].

use netfyber_core::{build_ui_config, Clock, ConfigError, KeyValueStore, UiConfig};
use netfyber_geocode::GeocodeClient;

use crate::blog_filter::BlogFilterWidget;
use crate::carousel::CarouselWidget;
use crate::consent::{ConsentHooks, ConsentStore, TracingHooks};
use crate::context::Ctx;
use crate::dom::Dom;
use crate::error::UiError;
use crate::event::{Dispatch, Event};
use crate::form_guard::{self, SubmitOutcome};
use crate::location::{LocationError, LocationService, LocationWidget, PositionProvider, ReverseGeocoder};
use crate::notify::{Notifier, ToastKind};
use crate::scroll::{self, RevealOnScroll};
use crate::timer::{DueTimer, TimerEvent, TimerQueue};

const GENERIC_ERROR_MESSAGE: &str = "Ocorreu um erro inesperado. Tente novamente.";

/// Reads widget settings from the `data-*` attributes of `<body>`, e.g.
/// `data-carousel-wrap="true"`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidSetting`] for an attribute that does not
/// parse.
pub fn config_from_page(dom: &dyn Dom) -> Result<UiConfig, ConfigError> {
    let body = dom.body();
    build_ui_config(|key| dom.attr(body, &format!("data-{key}")))
}

/// Host-provided collaborators.
pub struct Services {
    pub position: Box<dyn PositionProvider>,
    /// Defaults to a [`GeocodeClient`] built from the location settings.
    pub geocoder: Option<Box<dyn ReverseGeocoder>>,
    /// Defaults to [`TracingHooks`].
    pub consent_hooks: Option<Box<dyn ConsentHooks>>,
}

impl Services {
    #[must_use]
    pub fn new(position: Box<dyn PositionProvider>) -> Self {
        Self {
            position,
            geocoder: None,
            consent_hooks: None,
        }
    }

    #[must_use]
    pub fn with_geocoder(mut self, geocoder: Box<dyn ReverseGeocoder>) -> Self {
        self.geocoder = Some(geocoder);
        self
    }

    #[must_use]
    pub fn with_consent_hooks(mut self, hooks: Box<dyn ConsentHooks>) -> Self {
        self.consent_hooks = Some(hooks);
        self
    }
}

struct Env<D, S> {
    dom: D,
    store: S,
    clock: Box<dyn Clock>,
    timers: TimerQueue,
    notifier: Notifier,
}

impl<D: Dom, S: KeyValueStore> Env<D, S> {
    fn ctx_at(&mut self, now_ms: i64) -> Ctx<'_> {
        Ctx {
            dom: &mut self.dom,
            store: &mut self.store,
            timers: &mut self.timers,
            notifier: &mut self.notifier,
            now_ms,
        }
    }

    fn ctx(&mut self) -> Ctx<'_> {
        let now_ms = self.clock.now_ms();
        self.ctx_at(now_ms)
    }
}

pub struct App<D, S> {
    env: Env<D, S>,
    cfg: UiConfig,
    consent: ConsentStore,
    location: LocationWidget,
    reveal: RevealOnScroll,
    carousel: Option<CarouselWidget>,
    blog: Option<BlogFilterWidget>,
}

impl<D: Dom, S: KeyValueStore> App<D, S> {
    /// # Errors
    ///
    /// Returns [`UiError::Geocode`] when no geocoder was supplied and the
    /// default client cannot be built from `cfg`.
    pub fn new(
        dom: D,
        store: S,
        clock: Box<dyn Clock>,
        cfg: UiConfig,
        services: Services,
    ) -> Result<Self, UiError> {
        let geocoder = match services.geocoder {
            Some(geocoder) => geocoder,
            None => Box::new(GeocodeClient::with_base_url(
                &cfg.location.geocoder_base_url,
                &cfg.location.accept_language,
                cfg.location.geocoder_timeout_secs,
            )?),
        };
        let hooks: Box<dyn ConsentHooks> = match services.consent_hooks {
            Some(hooks) => hooks,
            None => Box::new(TracingHooks),
        };

        let service = LocationService::new(cfg.location.clone(), services.position, geocoder);
        Ok(Self {
            consent: ConsentStore::new(cfg.consent.clone(), hooks),
            location: LocationWidget::new(service, cfg.location.settle_delay_ms),
            reveal: RevealOnScroll::default(),
            carousel: None,
            blog: None,
            env: Env {
                dom,
                store,
                clock,
                timers: TimerQueue::new(),
                notifier: Notifier::new(cfg.toast_ms),
            },
            cfg,
        })
    }

    /// Builds the app with settings read from the page body.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::Config`] for an invalid `data-*` setting, or any
    /// error from [`App::new`].
    pub fn from_page(
        dom: D,
        store: S,
        clock: Box<dyn Clock>,
        services: Services,
    ) -> Result<Self, UiError> {
        let cfg = config_from_page(&dom)?;
        Self::new(dom, store, clock, cfg, services)
    }

    /// Initializes the widgets for the page at `path`.
    pub fn start(&mut self, path: &str) {
        let mut ctx = self.env.ctx();
        self.consent.init(&mut ctx);
        self.location.init(&mut ctx);
        self.reveal = RevealOnScroll::mount(ctx.dom);

        if path == "/" || path.contains("/planos") {
            self.carousel = CarouselWidget::mount(&mut ctx, self.cfg.carousel.clone());
        }
        if path.contains("/blog") {
            self.blog = BlogFilterWidget::mount(&mut ctx, &self.cfg.blog);
        }
        tracing::info!(
            path,
            carousel = self.carousel.is_some(),
            blog = self.blog.is_some(),
            "site behavior started"
        );
    }

    /// Routes one host event to the widget that owns it.
    pub fn dispatch(&mut self, event: &Event) -> Dispatch {
        let mut ctx = self.env.ctx();
        match event {
            Event::Click(target) => {
                if let Some(action) = ConsentStore::action_for(&ctx, *target) {
                    // A failed save has already told the visitor.
                    if let Err(error) = self.consent.run_action(&mut ctx, action) {
                        tracing::warn!(%error, ?action, "consent action failed");
                    }
                    return Dispatch::PREVENT;
                }
                if self.carousel.as_mut().is_some_and(|c| c.handle(&mut ctx, event)) {
                    return Dispatch::CONTINUE;
                }
                if self.blog.as_mut().is_some_and(|b| b.handle(&mut ctx, event)) {
                    return Dispatch::CONTINUE;
                }
                scroll::smooth_scroll(ctx.dom, *target)
            }
            Event::Submit(form) => match form_guard::on_submit(ctx.dom, *form) {
                SubmitOutcome::Proceed => Dispatch::CONTINUE,
                SubmitOutcome::Blocked { .. } => Dispatch::PREVENT,
            },
            Event::KeyDown(_)
            | Event::PointerDown { .. }
            | Event::PointerMove { .. }
            | Event::PointerUp { .. }
            | Event::PointerCancel
            | Event::Resize => {
                if let Some(carousel) = self.carousel.as_mut() {
                    carousel.handle(&mut ctx, event);
                }
                Dispatch::CONTINUE
            }
            Event::Intersect { el, ratio } => {
                self.reveal.on_intersect(ctx.dom, *el, *ratio);
                Dispatch::CONTINUE
            }
            Event::Unmount => {
                self.shutdown();
                Dispatch::CONTINUE
            }
            Event::UncaughtError(message) => {
                self.report_error(&UiError::Host(message.clone()));
                Dispatch::CONTINUE
            }
        }
    }

    /// Fires every timer due at `now_ms`, then runs the location refresh if
    /// its settle delay elapsed.
    pub async fn advance_to(&mut self, now_ms: i64) {
        while let Some(due) = self.env.timers.pop_due(now_ms) {
            self.fire(due);
        }
        if self.location.take_refresh_due() {
            self.refresh_location().await;
        }
    }

    /// Resolves the visitor location now and updates the header label.
    pub async fn refresh_location(&mut self) {
        let Env {
            dom, store, clock, ..
        } = &mut self.env;
        match self.location.refresh(dom, store, &**clock).await {
            Ok(record) => tracing::debug!(label = %record.short_label(), "location updated"),
            Err(LocationError::Superseded) => {}
            Err(error) => tracing::debug!(%error, "location refresh ended without a place"),
        }
    }

    /// Logs `error` and tells the visitor something went wrong.
    pub fn report_error(&mut self, error: &dyn std::error::Error) {
        tracing::error!(%error, "unexpected error");
        self.env.ctx().toast(GENERIC_ERROR_MESSAGE, ToastKind::Danger);
    }

    /// Stops widget timers when the page goes away.
    pub fn shutdown(&mut self) {
        if let Some(carousel) = self.carousel.as_mut() {
            carousel.destroy(&mut self.env.ctx());
        }
    }

    fn fire(&mut self, due: DueTimer) {
        let mut ctx = self.env.ctx_at(due.deadline_ms);
        match due.event {
            TimerEvent::ConsentBannerDue | TimerEvent::ConsentBannerStep => {
                self.consent.on_timer(&mut ctx, due.event);
            }
            TimerEvent::ToastExpired(toast) => ctx.notifier.expire(ctx.dom, toast),
            TimerEvent::CarouselAutoplay | TimerEvent::CarouselResizeSettled => {
                if let Some(carousel) = self.carousel.as_mut() {
                    carousel.on_timer(&mut ctx, due.event);
                }
            }
            TimerEvent::BlogFadeFinished => {
                if let Some(blog) = self.blog.as_mut() {
                    blog.on_timer(&mut ctx, due.event);
                }
            }
            TimerEvent::LocationSettled => self.location.on_timer(&mut ctx, due.event),
        }
    }

    #[must_use]
    pub fn config(&self) -> &UiConfig {
        &self.cfg
    }

    #[must_use]
    pub fn dom(&self) -> &D {
        &self.env.dom
    }

    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.env.dom
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.env.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.env.store
    }

    #[must_use]
    pub fn consent(&self) -> &ConsentStore {
        &self.consent
    }

    #[must_use]
    pub fn carousel(&self) -> Option<&CarouselWidget> {
        self.carousel.as_ref()
    }

    #[must_use]
    pub fn blog_filter(&self) -> Option<&BlogFilterWidget> {
        self.blog.as_ref()
    }

    #[must_use]
    pub fn reveal(&self) -> &RevealOnScroll {
        &self.reveal
    }

    #[must_use]
    pub fn notifier(&self) -> &Notifier {
        &self.env.notifier
    }

    /// Deadline of the earliest pending timer; hosts sleep until then.
    #[must_use]
    pub fn next_deadline(&self) -> Option<i64> {
        self.env.timers.next_deadline()
    }
}
