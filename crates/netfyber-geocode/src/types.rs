//! Reverse-geocoding response types.
//!
//! Models the Nominatim-style `/reverse?format=json` body. Every field is
//! optional on the wire; rural coordinates often come back with a `village`
//! or `town` instead of a `city`, and points at sea carry no address at all.

use serde::Deserialize;

/// Top-level body of a `/reverse` response.
#[derive(Debug, Default, Deserialize)]
pub struct ReverseResponse {
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub display_name: Option<String>,
    /// Set instead of `address` when the service cannot resolve the point,
    /// e.g. `{"error": "Unable to geocode"}`.
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub town: Option<String>,
    #[serde(default)]
    pub village: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// Human-readable place resolved from coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Place {
    pub city: String,
    pub state: String,
    pub country: String,
    pub display_name: String,
}

impl ReverseResponse {
    /// Flattens the response into a [`Place`].
    ///
    /// The locality is the first of `city`, `town`, `village` present.
    #[must_use]
    pub fn into_place(self) -> Place {
        let address = self.address.unwrap_or_default();
        let city = address
            .city
            .or(address.town)
            .or(address.village)
            .unwrap_or_default();
        Place {
            city,
            state: address.state.unwrap_or_default(),
            country: address.country.unwrap_or_default(),
            display_name: self.display_name.unwrap_or_default(),
        }
    }
}
