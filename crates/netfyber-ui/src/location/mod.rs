//! Visitor location shown in the site header.

mod provider;
mod service;

pub use provider::{PositionError, PositionProvider, ReverseGeocoder};
pub use service::{LocationError, LocationService, RequestToken};

use netfyber_core::{Clock, KeyValueStore, LocationRecord};

use crate::context::Ctx;
use crate::dom::Dom;
use crate::timer::{TimerEvent, TimerId};

pub const LABEL_ID: &str = "user-location";

const LOADING_TEXT: &str = "Obtendo localização...";

fn error_text(error: LocationError) -> &'static str {
    match error {
        LocationError::PermissionDenied => "Permissão de localização negada",
        LocationError::PositionUnavailable => "Localização indisponível",
        LocationError::Timeout => "Tempo esgotado ao obter localização",
        LocationError::Unknown | LocationError::Superseded => {
            "Não foi possível obter sua localização"
        }
    }
}

pub struct LocationWidget {
    service: LocationService,
    settle_delay_ms: u64,
    settle: Option<TimerId>,
    refresh_due: bool,
}

impl LocationWidget {
    #[must_use]
    pub fn new(service: LocationService, settle_delay_ms: u64) -> Self {
        Self {
            service,
            settle_delay_ms,
            settle: None,
            refresh_due: false,
        }
    }

    #[must_use]
    pub fn service(&self) -> &LocationService {
        &self.service
    }

    /// Shows a fresh cached location right away and, unless the visitor
    /// has refused before, schedules a live request once the page settles.
    pub fn init(&mut self, ctx: &mut Ctx<'_>) {
        if let Some(record) = self.service.cached(ctx.store, ctx.now_ms) {
            show_record(ctx.dom, &record);
        }
        if LocationService::permission_denied(ctx.store) {
            tracing::debug!("location permission previously denied; not asking");
            return;
        }
        ctx.cancel(&mut self.settle);
        self.settle = Some(ctx.schedule(self.settle_delay_ms, TimerEvent::LocationSettled));
    }

    pub fn on_timer(&mut self, _ctx: &mut Ctx<'_>, event: TimerEvent) {
        if event == TimerEvent::LocationSettled {
            self.settle = None;
            self.refresh_due = true;
        }
    }

    /// Whether the settle delay has passed and a refresh should run.
    /// Clears the flag.
    pub fn take_refresh_due(&mut self) -> bool {
        std::mem::take(&mut self.refresh_due)
    }

    /// Resolves the location and writes the outcome into the header label.
    ///
    /// # Errors
    ///
    /// Returns the [`LocationError`] after the label already shows it; the
    /// caller only needs it for logging.
    pub async fn refresh(
        &mut self,
        dom: &mut dyn Dom,
        store: &mut dyn KeyValueStore,
        clock: &dyn Clock,
    ) -> Result<LocationRecord, LocationError> {
        set_label(dom, LOADING_TEXT);

        // The label is looked up again afterwards: the header may have been
        // re-rendered while the request was in flight.
        let result = self.service.get_current_location(store, clock).await;
        match &result {
            Ok(record) => show_record(dom, record),
            // A newer request owns the label.
            Err(LocationError::Superseded) => {}
            Err(error) => {
                tracing::info!(%error, "location unavailable");
                set_label(dom, error_text(*error));
            }
        }
        result
    }
}

fn set_label(dom: &mut dyn Dom, text: &str) {
    if let Some(label) = dom.by_id(LABEL_ID) {
        dom.set_text(label, text);
    }
}

fn show_record(dom: &mut dyn Dom, record: &LocationRecord) {
    set_label(dom, &record.short_label());
}
