//! Seams to the device position API and the reverse geocoder.

use std::time::Duration;

use async_trait::async_trait;
use netfyber_core::Coordinates;
use netfyber_geocode::{GeocodeClient, GeocodeError, Place};

/// Why the device could not report a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("position unavailable")]
    PositionUnavailable,
    #[error("position request timed out")]
    Timeout,
    #[error("unknown position error")]
    Unknown,
}

impl PositionError {
    /// Maps a `GeolocationPositionError.code`.
    #[must_use]
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => Self::PermissionDenied,
            2 => Self::PositionUnavailable,
            3 => Self::Timeout,
            _ => Self::Unknown,
        }
    }
}

/// The device position API. Implementations ask for a high-accuracy fix
/// and should give up after `timeout`; callers enforce it as well.
#[async_trait(?Send)]
pub trait PositionProvider {
    async fn current_position(&self, timeout: Duration) -> Result<Coordinates, PositionError>;
}

#[async_trait(?Send)]
pub trait ReverseGeocoder {
    async fn reverse(&self, coords: Coordinates) -> Result<Place, GeocodeError>;
}

#[async_trait(?Send)]
impl ReverseGeocoder for GeocodeClient {
    async fn reverse(&self, coords: Coordinates) -> Result<Place, GeocodeError> {
        GeocodeClient::reverse(self, coords.lat, coords.lon).await
    }
}
