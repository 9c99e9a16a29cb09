//! Tide readings and their values.

use std::fmt;

/// The value column of a tide reading.
///
/// Gauges occasionally report garbage in place of a level. Such values are
/// kept verbatim as [`TideValue::Noise`] so the raw table is preserved, and
/// are skipped by every query and by [`crate::tides::TideStore::write_csv`].
#[derive(Debug, Clone, PartialEq)]
pub enum TideValue {
    /// Observed tide level in metres.
    Numeric(f64),
    /// Raw text that did not parse as a number.
    Noise(String),
}

impl TideValue {
    /// Classify a raw CSV or form field.
    ///
    /// Surrounding whitespace is ignored. `NaN` is noise; infinities parse
    /// as numbers.
    ///
    /// # Examples
    ///
    /// ```
    /// use tide_server::domain::TideValue;
    ///
    /// assert_eq!(TideValue::parse("0.937"), TideValue::Numeric(0.937));
    /// assert_eq!(TideValue::parse(" -2.231 "), TideValue::Numeric(-2.231));
    /// assert!(TideValue::parse("noise").is_noise());
    /// assert!(TideValue::parse("").is_noise());
    /// ```
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(v) if !v.is_nan() => TideValue::Numeric(v),
            _ => TideValue::Noise(raw.to_string()),
        }
    }

    /// The numeric level, if this is not noise.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TideValue::Numeric(v) => Some(*v),
            TideValue::Noise(_) => None,
        }
    }

    pub fn is_noise(&self) -> bool {
        matches!(self, TideValue::Noise(_))
    }
}

impl From<f64> for TideValue {
    fn from(v: f64) -> Self {
        if v.is_nan() {
            TideValue::Noise(v.to_string())
        } else {
            TideValue::Numeric(v)
        }
    }
}

impl fmt::Display for TideValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TideValue::Numeric(v) => write!(f, "{v}"),
            TideValue::Noise(raw) => f.write_str(raw),
        }
    }
}

/// One (timestamp, station, value) observation.
#[derive(Debug, Clone, PartialEq)]
pub struct TideReading {
    /// ISO-8601 timestamp, compared as a plain string.
    pub date_time: String,

    /// Station name as it appears in the stations table.
    pub station_name: String,

    pub value: TideValue,
}

impl TideReading {
    pub fn new(
        date_time: impl Into<String>,
        station_name: impl Into<String>,
        value: impl Into<TideValue>,
    ) -> Self {
        Self {
            date_time: date_time.into(),
            station_name: station_name.into(),
            value: value.into(),
        }
    }

    /// Build a reading from raw text fields, classifying the value.
    pub fn from_raw(date_time: &str, station_name: &str, raw_value: &str) -> Self {
        Self::new(date_time, station_name, TideValue::parse(raw_value))
    }

    /// The numeric level, if this reading is not noise.
    pub fn level(&self) -> Option<f64> {
        self.value.as_f64()
    }
}
