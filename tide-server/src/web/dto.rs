//! Data transfer objects for web requests and responses.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Query parameters shared by the station and data endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationQuery {
    /// Station name; spaces are read as `+`
    pub station_name: Option<String>,

    /// Station reference code
    pub station_reference: Option<String>,

    /// Start of the window (ISO-8601)
    #[serde(rename = "t_from")]
    pub t_from: Option<String>,

    /// End of the window (ISO-8601)
    #[serde(rename = "t_to")]
    pub t_to: Option<String>,

    /// `max`, `min` or `mean`; absent for raw values
    pub statistic: Option<String>,
}

/// Query parameters of the bulk write endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct WriteQuery {
    pub write: Option<String>,
}

impl WriteQuery {
    /// Whether the caller asked for the readings to be persisted.
    pub fn is_write(&self) -> bool {
        self.write
            .as_deref()
            .is_some_and(|w| w.eq_ignore_ascii_case("true"))
    }
}

/// Form fields of the single-reading write endpoint.
///
/// The value stays text: noise is accepted and stored, but never written.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingForm {
    pub station_name: Option<String>,
    pub date_time: Option<String>,
    pub tide_value: Option<String>,
}

/// Echo of a single written reading.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingEcho {
    pub station_name: String,
    pub date_time: String,
    pub tide_value: String,
}

/// One entry of a bulk write body.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingBody {
    pub station_name: String,
    pub date_time: String,
    pub tide_value: f64,
}

/// Result of a bulk write.
#[derive(Debug, Serialize, Deserialize)]
pub struct WrittenResponse {
    /// Number of readings appended
    pub written: usize,
}

/// Station metadata with resolved coordinates.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationInfoResponse {
    pub station_name: String,
    pub station_reference: String,
    pub northing: f64,
    pub easting: f64,
    pub latitude: f64,
    pub longitude: f64,
}

/// Aggregate requested through `statistic=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statistic {
    Max,
    Min,
    Mean,
}

impl Statistic {
    /// Parse a `statistic=` value. Unknown names yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "max" => Some(Statistic::Max),
            "min" => Some(Statistic::Min),
            "mean" => Some(Statistic::Mean),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Statistic::Max => "max",
            Statistic::Min => "min",
            Statistic::Mean => "mean",
        }
    }
}

/// An aggregate value, serialised under the statistic's own name, e.g.
/// `"max": 2.376`. `null` when the station has no numeric readings in the
/// window.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatisticValue {
    Max(Option<f64>),
    Min(Option<f64>),
    Mean(Option<f64>),
}

impl StatisticValue {
    pub fn new(statistic: Statistic, value: Option<f64>) -> Self {
        match statistic {
            Statistic::Max => StatisticValue::Max(value),
            Statistic::Min => StatisticValue::Min(value),
            Statistic::Mean => StatisticValue::Mean(value),
        }
    }

    pub fn statistic(&self) -> Statistic {
        match self {
            StatisticValue::Max(_) => Statistic::Max,
            StatisticValue::Min(_) => Statistic::Min,
            StatisticValue::Mean(_) => Statistic::Mean,
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            StatisticValue::Max(v) | StatisticValue::Min(v) | StatisticValue::Mean(v) => *v,
        }
    }
}

/// Tide data for one station: either raw values or one aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TideData {
    Values {
        #[serde(rename = "tideValues")]
        tide_values: BTreeMap<String, f64>,
    },
    Statistic(StatisticValue),
}

/// Response of `/data/json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TideInfoResponse {
    pub station_name: String,
    pub station_reference: String,
    pub from: String,
    pub to: String,
    #[serde(flatten)]
    pub data: TideData,
}
