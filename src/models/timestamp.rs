use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// ISO-8601 timestamp assigned by the server.
///
/// The raw text is kept as received so that an unexpected format never fails
/// a whole list response; parsing happens only for display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerTimestamp(String);

impl ServerTimestamp {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Local date-time without timezone conversion. Offsets, when present,
    /// are dropped rather than converted.
    pub fn parse(&self) -> Option<NaiveDateTime> {
        let raw = self.0.trim();
        if let Ok(naive) = raw.parse::<NaiveDateTime>() {
            return Some(naive);
        }
        if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
            return Some(with_offset.naive_local());
        }
        raw.parse::<NaiveDate>()
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    }
}

impl fmt::Display for ServerTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
