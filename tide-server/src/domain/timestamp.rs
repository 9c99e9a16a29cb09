//! Canonical reading timestamps.

use std::fmt;

use chrono::NaiveDateTime;

/// The only timestamp layout that orders correctly under string comparison.
const CANONICAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Error returned when parsing a timestamp that is not in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid timestamp {input:?}: {reason}")]
pub struct InvalidTimestamp {
    input: String,
    reason: &'static str,
}

/// A zero-padded UTC timestamp of the form `YYYY-MM-DDTHH:MM:SSZ`.
///
/// Windows are compared as plain strings, so anything written back to the
/// tide table goes through this type first.
///
/// # Examples
///
/// ```
/// use tide_server::domain::Timestamp;
///
/// let ts = Timestamp::parse("2021-09-20T02:00:00Z").unwrap();
/// assert_eq!(ts.as_str(), "2021-09-20T02:00:00Z");
///
/// // Not zero-padded
/// assert!(Timestamp::parse("2021-9-20T02:00:00Z").is_err());
///
/// // Missing the UTC designator
/// assert!(Timestamp::parse("2021-09-20T02:00:00").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(String);

impl Timestamp {
    /// Parse a timestamp, accepting only the canonical layout.
    pub fn parse(s: &str) -> Result<Self, InvalidTimestamp> {
        let invalid = |reason| InvalidTimestamp {
            input: s.to_string(),
            reason,
        };

        // chrono accepts unpadded fields, so check the width first
        if s.len() != 20 {
            return Err(invalid("expected YYYY-MM-DDTHH:MM:SSZ"));
        }

        let parsed = NaiveDateTime::parse_from_str(s, CANONICAL_FORMAT)
            .map_err(|_| invalid("not a valid calendar date and time"))?;

        // chrono also takes padding spaces and a signed year
        if parsed.format(CANONICAL_FORMAT).to_string() != s {
            return Err(invalid("expected YYYY-MM-DDTHH:MM:SSZ"));
        }

        Ok(Self(s.to_string()))
    }

    /// Returns the timestamp as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
