//! Askama templates for the HTML endpoint.

use askama::Template;

use super::dto::{TideData, TideInfoResponse};

/// HTML table of the same data `/data/json` returns.
#[derive(Template)]
#[template(path = "tide_table.html")]
pub struct TideTableTemplate {
    pub station_name: String,
    pub station_reference: String,
    pub from: String,
    pub to: String,
    pub key_header: String,
    pub value_header: String,
    pub rows: Vec<TableRowView>,
}

/// One table row: a timestamp or statistic name, and its value.
#[derive(Debug, Clone)]
pub struct TableRowView {
    pub key: String,
    pub value: String,
}

impl TideTableTemplate {
    /// Lay out a `/data/json` response as table rows.
    ///
    /// Raw values get one row per timestamp; an aggregate gets a single row
    /// named after the statistic, left blank when there was nothing to
    /// aggregate.
    pub fn from_info(info: &TideInfoResponse) -> Self {
        let (key_header, rows) = match &info.data {
            TideData::Values { tide_values } => (
                "dateTime",
                tide_values
                    .iter()
                    .map(|(ts, v)| TableRowView {
                        key: ts.clone(),
                        value: v.to_string(),
                    })
                    .collect(),
            ),
            TideData::Statistic(stat) => (
                "statistic",
                vec![TableRowView {
                    key: stat.statistic().as_str().to_string(),
                    value: stat.value().map(|v| v.to_string()).unwrap_or_default(),
                }],
            ),
        };

        Self {
            station_name: info.station_name.clone(),
            station_reference: info.station_reference.clone(),
            from: info.from.clone(),
            to: info.to.clone(),
            key_header: key_header.to_string(),
            value_header: info.station_name.clone(),
            rows,
        }
    }
}
