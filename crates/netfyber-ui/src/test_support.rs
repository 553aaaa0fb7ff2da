use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use netfyber_core::{Coordinates, MemoryStore};
use netfyber_geocode::{GeocodeError, Place};

use crate::context::Ctx;
use crate::dom::MemoryDom;
use crate::location::{PositionError, PositionProvider, ReverseGeocoder};
use crate::notify::Notifier;
use crate::timer::{DueTimer, TimerQueue};

/// Owns everything a [`Ctx`] borrows, for driving one widget by hand.
pub(crate) struct Harness {
    pub dom: MemoryDom,
    pub store: MemoryStore,
    pub timers: TimerQueue,
    pub notifier: Notifier,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_dom(MemoryDom::default())
    }

    pub fn with_dom(dom: MemoryDom) -> Self {
        Self {
            dom,
            store: MemoryStore::new(),
            timers: TimerQueue::new(),
            notifier: Notifier::new(5_000),
        }
    }

    pub fn ctx(&mut self, now_ms: i64) -> Ctx<'_> {
        Ctx {
            dom: &mut self.dom,
            store: &mut self.store,
            timers: &mut self.timers,
            notifier: &mut self.notifier,
            now_ms,
        }
    }

    pub fn pop_due(&mut self, now_ms: i64) -> Option<DueTimer> {
        self.timers.pop_due(now_ms)
    }
}

/// Position source answering every request with the same result.
#[derive(Clone)]
pub(crate) struct FakePosition {
    result: Result<Coordinates, PositionError>,
    delay: Option<Duration>,
    pub calls: Rc<Cell<usize>>,
}

impl FakePosition {
    pub fn at(lat: f64, lon: f64) -> Self {
        Self::answering(Ok(Coordinates { lat, lon }))
    }

    pub fn failing(error: PositionError) -> Self {
        Self::answering(Err(error))
    }

    pub fn answering(result: Result<Coordinates, PositionError>) -> Self {
        Self {
            result,
            delay: None,
            calls: Rc::default(),
        }
    }

    /// Waits `delay` before answering.
    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait(?Send)]
impl PositionProvider for FakePosition {
    async fn current_position(&self, _timeout: Duration) -> Result<Coordinates, PositionError> {
        self.calls.set(self.calls.get() + 1);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.result
    }
}

/// Geocoder returning a fixed place, or a 503 when built with `None`.
#[derive(Clone)]
pub(crate) struct FakeGeocoder {
    place: Option<Place>,
}

impl FakeGeocoder {
    pub fn naming(city: &str, state: &str) -> Self {
        Self {
            place: Some(Place {
                city: city.to_owned(),
                state: state.to_owned(),
                country: "Brasil".to_owned(),
                display_name: format!("{city}, {state}, Brasil"),
            }),
        }
    }

    pub fn down() -> Self {
        Self { place: None }
    }
}

#[async_trait(?Send)]
impl ReverseGeocoder for FakeGeocoder {
    async fn reverse(&self, _coords: Coordinates) -> Result<Place, GeocodeError> {
        self.place.clone().ok_or(GeocodeError::UnexpectedStatus {
            status: 503,
            url: "http://geocoder.test/reverse".to_owned(),
        })
    }
}
