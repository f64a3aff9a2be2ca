//! ISO 8601 timestamps as exchanged with the notification service

use chrono::DurationRound;
use serde::Serializer;
use serde::{Deserialize, Deserializer, Serialize, de::Error};
use smol_str::{SmolStr, ToSmolStr};
use std::fmt;
use std::sync::LazyLock;
use std::{cmp, str::FromStr};

use regex::Regex;

/// Regex for ISO 8601 datetime validation
pub static ISO8601_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}(\.[0-9]+)?(Z|(\+[0-9]{2}|\-[0-9][1-9]):[0-9]{2})$").unwrap()
});

/// Creation timestamp attached to a notification (ISO 8601).
///
/// Timestamps order the inbox newest-first and double as pagination cursors
/// and bulk-operation cutoffs, so two properties matter:
/// - the serialized form is preserved exactly for round-trip serialization
/// - comparisons use the parsed instant, which agrees with lexicographic
///   ISO 8601 ordering for same-offset inputs and stays correct when a
///   service mixes offset spellings
///
/// Format requirements:
/// - timezone required (UTC `Z` strongly preferred)
/// - whole seconds minimum, fractional seconds supported
/// - uppercase `T` separating date and time
///
/// Examples: `"2024-03-01T09:30:00Z"`, `"2024-03-01T09:30:00.250+00:00"`
#[derive(Clone, Debug, Eq)]
pub struct Timestamp {
    /// Serialized form preserved from parsing for round-trip consistency
    serialized: SmolStr,
    /// Parsed datetime value for comparisons and operations
    dt: chrono::DateTime<chrono::FixedOffset>,
}

impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.dt == other.dt
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        self.dt.cmp(&other.dt)
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Timestamp {
    /// Returns a `Timestamp` which corresponds to the current date and time
    /// in UTC.
    ///
    /// The timestamp uses microsecond precision.
    pub fn now() -> Self {
        Self::new(chrono::Utc::now().fixed_offset())
    }

    /// Constructs a new timestamp from a parsed datetime.
    ///
    /// The timestamp is rounded to microsecond precision.
    pub fn new(dt: chrono::DateTime<chrono::FixedOffset>) -> Self {
        let dt = dt
            .duration_round(chrono::Duration::microseconds(1))
            .expect("delta does not exceed limits");
        // This serialization format is compatible with ISO 8601.
        let serialized = dt
            .to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
            .to_smolstr();
        Self { serialized, dt }
    }

    /// Extracts a string slice containing the entire `Timestamp`.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.serialized.as_str()
    }
}

impl FromStr for Timestamp {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // `chrono` only parses RFC 3339, which accepts a lowercase 't'/'z'
        // and offset forms the service never emits. The regex narrows input
        // to the ISO 8601 subset we accept before the RFC 3339 parser does
        // the rest.
        if ISO8601_REGEX.is_match(s) {
            let dt = chrono::DateTime::parse_from_rfc3339(s)?;
            Ok(Self {
                serialized: s.to_smolstr(),
                dt,
            })
        } else {
            // Simulate an invalid `ParseError`.
            Err(chrono::DateTime::parse_from_rfc3339("invalid").expect_err("invalid"))
        }
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: String = Deserialize::deserialize(deserializer)?;
        Self::from_str(&value).map_err(D::Error::custom)
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.serialized)
    }
}

impl AsRef<chrono::DateTime<chrono::FixedOffset>> for Timestamp {
    fn as_ref(&self) -> &chrono::DateTime<chrono::FixedOffset> {
        &self.dt
    }
}

impl TryFrom<String> for Timestamp {
    type Error = chrono::ParseError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value)
    }
}

impl From<chrono::DateTime<chrono::FixedOffset>> for Timestamp {
    fn from(dt: chrono::DateTime<chrono::FixedOffset>) -> Self {
        Self::new(dt)
    }
}

impl From<Timestamp> for String {
    fn from(value: Timestamp) -> Self {
        value.serialized.to_string()
    }
}

impl From<Timestamp> for SmolStr {
    fn from(value: Timestamp) -> Self {
        value.serialized
    }
}

impl AsRef<str> for Timestamp {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_timestamps() {
        assert!(Timestamp::from_str("2024-01-15T12:30:45.123456Z").is_ok());
        assert!(Timestamp::from_str("2024-01-15T12:30:45Z").is_ok());
        assert!(Timestamp::from_str("2024-01-15T12:30:45+00:00").is_ok());
        assert!(Timestamp::from_str("2024-01-15T12:30:45-05:00").is_ok());
    }

    #[test]
    fn requires_timezone() {
        // Missing timezone should fail
        assert!(Timestamp::from_str("2024-01-15T12:30:45").is_err());
    }

    #[test]
    fn round_trip() {
        let original = "2024-01-15T12:30:45.123456Z";
        let ts = Timestamp::from_str(original).unwrap();
        assert_eq!(ts.as_str(), original);
    }

    #[test]
    fn orders_by_instant() {
        let older = Timestamp::from_str("2024-01-01T00:00:00Z").unwrap();
        let newer = Timestamp::from_str("2024-01-02T00:00:00Z").unwrap();
        assert!(older < newer);

        // Same instant spelled with an explicit offset compares equal
        let offset = Timestamp::from_str("2024-01-02T05:00:00+05:00").unwrap();
        assert_eq!(newer, offset);
    }

    #[test]
    fn now_is_serializable() {
        let ts = Timestamp::now();
        assert!(ISO8601_REGEX.is_match(ts.as_str()));
    }
}
