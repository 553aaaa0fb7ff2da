use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Schema version stamped on every persisted consent record.
pub const CONSENT_SCHEMA_VERSION: &str = "1.0";

/// The optional categories a visitor can opt into.
///
/// Essential cookies are not a choice and marketing is never offered, so
/// neither appears here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConsentChoice {
    pub analytics: bool,
    pub personalization: bool,
}

impl ConsentChoice {
    #[must_use]
    pub fn accept_all() -> Self {
        Self {
            analytics: true,
            personalization: true,
        }
    }

    #[must_use]
    pub fn essential_only() -> Self {
        Self::default()
    }
}

/// Persisted consent preferences, stored as JSON under
/// [`crate::storage::CONSENT_KEY`].
///
/// Records written by older pages may lack fields; missing categories
/// read as not granted and `essential` as granted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentRecord {
    #[serde(default = "granted")]
    pub essential: bool,
    #[serde(default)]
    pub analytics: bool,
    #[serde(default)]
    pub personalization: bool,
    #[serde(default)]
    pub marketing: bool,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub version: String,
}

fn granted() -> bool {
    true
}

impl ConsentRecord {
    /// Builds the record written for `choice` at `now`.
    ///
    /// `essential` is forced on and `marketing` forced off regardless of
    /// what the caller asked for.
    #[must_use]
    pub fn from_choice(choice: ConsentChoice, now: DateTime<Utc>) -> Self {
        Self {
            essential: true,
            analytics: choice.analytics,
            personalization: choice.personalization,
            marketing: false,
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            version: CONSENT_SCHEMA_VERSION.to_owned(),
        }
    }

    #[must_use]
    pub fn choice(&self) -> ConsentChoice {
        ConsentChoice {
            analytics: self.analytics,
            personalization: self.personalization,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn from_choice_forces_essential_and_marketing() {
        let now = Utc.with_ymd_and_hms(2025, 3, 4, 12, 30, 0).unwrap();
        let record = ConsentRecord::from_choice(ConsentChoice::accept_all(), now);
        assert!(record.essential);
        assert!(!record.marketing);
        assert!(record.analytics);
        assert!(record.personalization);
        assert_eq!(record.version, "1.0");
        assert_eq!(record.timestamp, "2025-03-04T12:30:00.000Z");
    }

    #[test]
    fn record_serializes_with_expected_field_names() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let record = ConsentRecord::from_choice(ConsentChoice::essential_only(), now);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["essential"], true);
        assert_eq!(json["analytics"], false);
        assert_eq!(json["personalization"], false);
        assert_eq!(json["marketing"], false);
        assert_eq!(json["version"], "1.0");
    }

    #[test]
    fn parses_record_written_by_older_pages() {
        let raw = r#"{"essential":true,"analytics":true,"personalization":false,"marketing":false,"timestamp":"2024-11-02T10:00:00.000Z","version":"1.0"}"#;
        let record: ConsentRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(
            record.choice(),
            ConsentChoice {
                analytics: true,
                personalization: false
            }
        );
    }

    #[test]
    fn partial_record_fills_missing_fields() {
        let record: ConsentRecord = serde_json::from_str(r#"{"analytics":true}"#).unwrap();
        assert!(record.essential);
        assert!(record.analytics);
        assert!(!record.personalization);
        assert!(!record.marketing);
        assert!(record.version.is_empty());

        let empty: ConsentRecord = serde_json::from_str("{}").unwrap();
        assert!(empty.essential);
        assert_eq!(empty.choice(), ConsentChoice::essential_only());
    }
}
