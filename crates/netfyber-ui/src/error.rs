use netfyber_core::ConfigError;
use netfyber_geocode::GeocodeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UiError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("geocoder setup failed: {0}")]
    Geocode(#[from] GeocodeError),

    /// An error raised by page code outside the widgets, e.g. an unhandled
    /// promise rejection.
    #[error("uncaught page error: {0}")]
    Host(String),
}
