use serde::{Deserialize, Serialize};

/// A device position fix in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// A resolved visitor location, cached as JSON under
/// [`crate::storage::LOCATION_KEY`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub city: String,
    pub state: String,
    pub country: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub lat: f64,
    pub lon: f64,
    /// Resolution time in epoch milliseconds.
    pub timestamp: i64,
}

impl LocationRecord {
    /// Record used when reverse geocoding fails: the coordinates themselves
    /// become the display text.
    #[must_use]
    pub fn from_coordinates(coords: Coordinates, timestamp: i64) -> Self {
        Self {
            city: String::new(),
            state: String::new(),
            country: String::new(),
            display_name: format!("{:.4}, {:.4}", coords.lat, coords.lon),
            lat: coords.lat,
            lon: coords.lon,
            timestamp,
        }
    }

    /// `true` while the record is no older than `freshness_ms` at `now_ms`.
    #[must_use]
    pub fn is_fresh(&self, now_ms: i64, freshness_ms: u64) -> bool {
        u64::try_from(now_ms.saturating_sub(self.timestamp)).is_ok_and(|age| age <= freshness_ms)
    }

    /// Short label for the header widget: "City, State" when both are
    /// known, otherwise whichever part exists, otherwise the display name.
    #[must_use]
    pub fn short_label(&self) -> String {
        match (self.city.is_empty(), self.state.is_empty()) {
            (false, false) => format!("{}, {}", self.city, self.state),
            (false, true) => self.city.clone(),
            (true, false) => self.state.clone(),
            (true, true) => self.display_name.clone(),
        }
    }
}
