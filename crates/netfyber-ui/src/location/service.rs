use std::time::Duration;

use netfyber_core::storage::{
    read_json, write_json, DENIED_SENTINEL, LOCATION_DENIED_KEY, LOCATION_KEY,
};
use netfyber_core::{Clock, Coordinates, KeyValueStore, LocationConfig, LocationRecord};
use netfyber_geocode::Place;

use super::provider::{PositionError, PositionProvider, ReverseGeocoder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("position unavailable")]
    PositionUnavailable,
    #[error("location request timed out")]
    Timeout,
    #[error("unknown location error")]
    Unknown,
    /// A newer request was issued while this one was in flight.
    #[error("superseded by a newer location request")]
    Superseded,
}

impl From<PositionError> for LocationError {
    fn from(error: PositionError) -> Self {
        match error {
            PositionError::PermissionDenied => Self::PermissionDenied,
            PositionError::PositionUnavailable => Self::PositionUnavailable,
            PositionError::Timeout => Self::Timeout,
            PositionError::Unknown => Self::Unknown,
        }
    }
}

/// Identifies one live location request. Only the most recently issued
/// token may update the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

/// Resolves the visitor's location, caching results and remembering a
/// permission denial.
pub struct LocationService {
    cfg: LocationConfig,
    provider: Box<dyn PositionProvider>,
    geocoder: Box<dyn ReverseGeocoder>,
    latest: u64,
}

impl LocationService {
    #[must_use]
    pub fn new(
        cfg: LocationConfig,
        provider: Box<dyn PositionProvider>,
        geocoder: Box<dyn ReverseGeocoder>,
    ) -> Self {
        Self {
            cfg,
            provider,
            geocoder,
            latest: 0,
        }
    }

    /// The cached record, if one exists and is still fresh at `now_ms`.
    #[must_use]
    pub fn cached(&self, store: &dyn KeyValueStore, now_ms: i64) -> Option<LocationRecord> {
        let record: LocationRecord = match read_json(store, LOCATION_KEY) {
            Ok(record) => record?,
            Err(error) => {
                tracing::warn!(%error, "could not read cached location");
                return None;
            }
        };
        record
            .is_fresh(now_ms, self.cfg.freshness_ms)
            .then_some(record)
    }

    #[must_use]
    pub fn permission_denied(store: &dyn KeyValueStore) -> bool {
        matches!(store.get(LOCATION_DENIED_KEY), Ok(Some(v)) if v == DENIED_SENTINEL)
    }

    /// Starts a request, superseding any still in flight.
    pub fn begin_request(&mut self) -> RequestToken {
        self.latest += 1;
        RequestToken(self.latest)
    }

    /// Asks the device for a position and names it. Touches no storage.
    ///
    /// # Errors
    ///
    /// Returns the device failure, or [`LocationError::Timeout`] when the
    /// device does not answer within the configured bound. Geocoding
    /// failures are not errors: the record falls back to coordinate text.
    pub async fn resolve(&self, clock: &dyn Clock) -> Result<LocationRecord, LocationError> {
        let timeout = Duration::from_millis(self.cfg.device_timeout_ms);
        let coords = tokio::time::timeout(timeout, self.provider.current_position(timeout))
            .await
            .map_err(|_| LocationError::Timeout)??;

        let place = match self.geocoder.reverse(coords).await {
            Ok(place) => Some(place),
            Err(error) => {
                tracing::warn!(%error, "reverse geocoding failed; showing coordinates");
                None
            }
        };
        Ok(record_for(coords, place, clock.now_ms()))
    }

    /// Applies the outcome of the request identified by `token`.
    ///
    /// # Errors
    ///
    /// Passes device failures through. Returns
    /// [`LocationError::Superseded`] when a newer request has been issued;
    /// such a result never touches the cache.
    pub fn complete(
        &mut self,
        store: &mut dyn KeyValueStore,
        token: RequestToken,
        result: Result<LocationRecord, LocationError>,
    ) -> Result<LocationRecord, LocationError> {
        // The device answered a prompt either way; keep the denial even when
        // the result itself is stale.
        if result == Err(LocationError::PermissionDenied) {
            if let Err(error) = store.set(LOCATION_DENIED_KEY, DENIED_SENTINEL) {
                tracing::warn!(%error, "could not persist location denial");
            }
        }

        if token != RequestToken(self.latest) {
            tracing::debug!(?token, latest = self.latest, "discarding stale location result");
            return Err(LocationError::Superseded);
        }

        let record = result?;
        if let Err(error) = write_json(store, LOCATION_KEY, &record) {
            tracing::warn!(%error, "could not cache location");
        }
        Ok(record)
    }

    /// Returns the fresh cached record, or resolves a new one and caches it.
    ///
    /// # Errors
    ///
    /// See [`LocationService::resolve`] and [`LocationService::complete`].
    pub async fn get_current_location(
        &mut self,
        store: &mut dyn KeyValueStore,
        clock: &dyn Clock,
    ) -> Result<LocationRecord, LocationError> {
        if let Some(record) = self.cached(store, clock.now_ms()) {
            tracing::debug!("using cached location");
            return Ok(record);
        }
        let token = self.begin_request();
        let result = self.resolve(clock).await;
        self.complete(store, token, result)
    }
}

fn record_for(coords: Coordinates, place: Option<Place>, timestamp: i64) -> LocationRecord {
    let fallback = LocationRecord::from_coordinates(coords, timestamp);
    let Some(place) = place else {
        return fallback;
    };
    if place == Place::default() {
        return fallback;
    }
    LocationRecord {
        city: place.city,
        state: place.state,
        country: place.country,
        display_name: if place.display_name.is_empty() {
            fallback.display_name
        } else {
            place.display_name
        },
        ..fallback
    }
}

#[cfg(test)]
#[path = "service_test.rs"]
mod tests;
