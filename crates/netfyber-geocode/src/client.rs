//! HTTP client for a Nominatim-compatible reverse-geocoding service.
//!
//! Wraps `reqwest` with status checking and typed response decoding.
//! Responses carrying an `"error"` field are treated as "no address" rather
//! than failures; the caller decides how to present an empty [`Place`].

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::GeocodeError;
use crate::types::{Place, ReverseResponse};

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org/";
const DEFAULT_LANGUAGE: &str = "pt-BR";

/// Client for the `/reverse` endpoint.
///
/// Use [`GeocodeClient::new`] for the public service or
/// [`GeocodeClient::with_base_url`] to point at a mock server in tests.
pub struct GeocodeClient {
    client: Client,
    base_url: Url,
    accept_language: String,
}

impl GeocodeClient {
    /// Creates a client pointed at the public Nominatim service.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64) -> Result<Self, GeocodeError> {
        Self::with_base_url(DEFAULT_BASE_URL, DEFAULT_LANGUAGE, timeout_secs)
    }

    /// Creates a client with a custom base URL and response language.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GeocodeError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        base_url: &str,
        accept_language: &str,
        timeout_secs: u64,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .user_agent("netfyber-site/0.1 (location-widget)")
            .build()?;

        // Exactly one trailing slash, so joining "reverse" appends a segment
        // instead of replacing the last one.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| GeocodeError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            accept_language: accept_language.to_owned(),
        })
    }

    /// Resolves `lat`/`lon` to a place name.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::Http`] on network failure.
    /// - [`GeocodeError::UnexpectedStatus`] on a non-2xx response.
    /// - [`GeocodeError::Deserialize`] if the body is not the expected JSON.
    pub async fn reverse(&self, lat: f64, lon: f64) -> Result<Place, GeocodeError> {
        let url = self.build_reverse_url(lat, lon)?;
        tracing::debug!(%url, "reverse geocoding");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let parsed: ReverseResponse =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Deserialize {
                context: format!("reverse(lat={lat}, lon={lon})"),
                source: e,
            })?;
        if let Some(reason) = parsed.error.as_deref() {
            tracing::debug!(lat, lon, reason, "geocoder returned no address");
        }

        Ok(parsed.into_place())
    }

    fn build_reverse_url(&self, lat: f64, lon: f64) -> Result<Url, GeocodeError> {
        let mut url = self
            .base_url
            .join("reverse")
            .map_err(|e| GeocodeError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("lat", &lat.to_string())
            .append_pair("lon", &lon.to_string())
            .append_pair("accept-language", &self.accept_language);
        Ok(url)
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
