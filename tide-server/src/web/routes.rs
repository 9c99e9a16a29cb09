//! HTTP route handlers.

use askama::Template;
use axum::body::Bytes;
use axum::{
    Form, Json, Router,
    extract::{
        Query, State,
        rejection::{FormRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::domain::{Station, TideReading, TideValue, TimeWindow, Timestamp};
use crate::stations::{StationDirectory, StationError};
use crate::tides::{TideError, TideStore};

use super::dto::*;
use super::state::AppState;
use super::templates::TideTableTemplate;

const MISSING_STATION: &str = "Please input the station name or the station reference!";
const BOTH_STATIONS: &str = "You can only input the station name or the station reference!";
const UNKNOWN_STATION: &str = "The station you input is wrong!";
const UNKNOWN_STATION_NAME: &str = "The station name you input is wrong!";

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/station/json", get(station_info))
        .route("/data/graph", get(data_graph))
        .route("/data/json/write", get(write_reading).post(write_reading))
        .route("/data/json", get(tide_info).post(write_readings))
        .route("/data/html", get(tide_html).post(tide_html))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// How the request named its station.
#[derive(Debug, Clone, PartialEq, Eq)]
enum StationIdent {
    Name(String),
    Reference(String),
}

impl StationIdent {
    /// Exactly one of `stationName` and `stationReference` must be given.
    /// Empty values count as absent.
    fn from_query(query: &StationQuery) -> Result<Self, AppError> {
        let name = query.station_name.as_deref().filter(|s| !s.is_empty());
        let reference = query
            .station_reference
            .as_deref()
            .filter(|s| !s.is_empty());

        match (name, reference) {
            (Some(name), None) => Ok(StationIdent::Name(normalize_name(name))),
            (None, Some(reference)) => Ok(StationIdent::Reference(reference.to_string())),
            (None, None) => Err(AppError::AmbiguousInput {
                message: MISSING_STATION.to_string(),
            }),
            (Some(_), Some(_)) => Err(AppError::AmbiguousInput {
                message: BOTH_STATIONS.to_string(),
            }),
        }
    }

    fn resolve<'a>(&self, stations: &'a StationDirectory) -> Option<&'a Station> {
        match self {
            StationIdent::Name(name) => stations.by_name(name),
            StationIdent::Reference(reference) => stations.by_reference(reference),
        }
    }
}

/// Station names are stored with `+` for spaces, and a `+` in a query
/// string arrives decoded as a space.
fn normalize_name(name: &str) -> String {
    name.replace(' ', "+")
}

/// Resolve the request's station, or fail with the generic message.
fn find_station<'a>(
    stations: &'a StationDirectory,
    query: &StationQuery,
) -> Result<&'a Station, AppError> {
    let ident = StationIdent::from_query(query)?;
    ident.resolve(stations).ok_or_else(|| unknown_station(&ident, UNKNOWN_STATION))
}

fn unknown_station(ident: &StationIdent, message: &str) -> AppError {
    warn!(?ident, "unknown station");
    AppError::UnknownStation {
        message: message.to_string(),
    }
}

/// The request's window, with missing bounds taken from the config.
fn request_window(state: &AppState, query: &StationQuery) -> TimeWindow {
    let non_empty = |s: &Option<String>| s.clone().filter(|s| !s.is_empty());
    TimeWindow::new(non_empty(&query.t_from), non_empty(&query.t_to))
        .or_defaults(&state.config.default_window)
}

/// Station metadata plus coordinates from the geocoding service.
async fn station_info(
    State(state): State<AppState>,
    query: Result<Query<StationQuery>, QueryRejection>,
) -> Result<Json<StationInfoResponse>, AppError> {
    let Query(query) = query?;
    let ident = StationIdent::from_query(&query)?;
    let station = ident.resolve(&state.stations).ok_or_else(|| match &ident {
        StationIdent::Name(_) => unknown_station(&ident, UNKNOWN_STATION_NAME),
        StationIdent::Reference(_) => unknown_station(&ident, UNKNOWN_STATION),
    })?;

    let coords = state
        .geocoder
        .resolve(&station.station_url)
        .await
        .map_err(|e| AppError::lookup(station, e))?;

    Ok(Json(StationInfoResponse {
        station_name: station.station_name.clone(),
        station_reference: station.station_reference.clone(),
        northing: coords.northing,
        easting: coords.easting,
        latitude: coords.latitude,
        longitude: coords.longitude,
    }))
}

/// PNG line graph of one station's readings.
async fn data_graph(
    State(state): State<AppState>,
    query: Result<Query<StationQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(query) = query?;
    let station = find_station(&state.stations, &query)?;
    let window = request_window(&state, &query);

    let graph = state.tides.read().await.render_graph(
        std::slice::from_ref(&station.station_name),
        &window,
        &state.config.graph,
    )?;

    let disposition = format!("inline; filename=\"{}\"", graph.file_name());
    Ok((
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        graph.into_png(),
    )
        .into_response())
}

/// Append one reading from form fields and write the scratch file.
async fn write_reading(
    State(state): State<AppState>,
    form: Result<Form<ReadingForm>, FormRejection>,
) -> Result<Json<ReadingEcho>, AppError> {
    let Form(form) = form?;
    let (Some(station_name), Some(date_time), Some(tide_value)) =
        (form.station_name, form.date_time, form.tide_value)
    else {
        return Err(AppError::BadRequest {
            message: "Please input stationName, dateTime and tideValue!".to_string(),
        });
    };

    let timestamp = parse_timestamp(&date_time)?;
    let reading = TideReading::new(
        timestamp.into_string(),
        station_name.clone(),
        TideValue::parse(&tide_value),
    );

    {
        let mut tides = state.tides.write().await;
        if !tides.add_reading(reading) {
            return Err(AppError::Internal {
                message: "reading was not appended".to_string(),
            });
        }
        tides.write_csv(&state.config.scratch_csv).await?;
    }

    info!(station = %station_name, %date_time, "wrote single reading");
    Ok(Json(ReadingEcho {
        station_name,
        date_time,
        tide_value,
    }))
}

/// Append a JSON array of readings and rewrite the primary tide file.
///
/// Nothing is appended unless `write=true`. The whole batch is rejected if
/// any entry is malformed.
async fn write_readings(
    State(state): State<AppState>,
    query: Result<Query<WriteQuery>, QueryRejection>,
    body: Bytes,
) -> Result<Json<WrittenResponse>, AppError> {
    let Query(query) = query?;
    let entries: Vec<ReadingBody> = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "rejected write body");
        AppError::BadRequest {
            message: format!("Invalid JSON body: {e}"),
        }
    })?;

    let readings = entries
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| -> Result<TideReading, AppError> {
            let timestamp = parse_timestamp(&entry.date_time).map_err(|e| AppError::BadRequest {
                message: format!("Entry {idx}: {}", e.message()),
            })?;
            Ok(TideReading::new(
                timestamp.into_string(),
                entry.station_name,
                entry.tide_value,
            ))
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    if !query.is_write() {
        return Ok(Json(WrittenResponse { written: 0 }));
    }

    let written = readings.len();
    {
        let mut tides = state.tides.write().await;
        for reading in readings {
            tides.add_reading(reading);
        }
        tides.write_csv(&state.config.readings_csv).await?;
    }

    info!(written, "appended readings");
    Ok(Json(WrittenResponse { written }))
}

/// Raw values or one aggregate for a station, as JSON.
async fn tide_info(
    State(state): State<AppState>,
    query: Result<Query<StationQuery>, QueryRejection>,
) -> Result<Json<TideInfoResponse>, AppError> {
    let Query(query) = query?;
    let info = build_tide_info(&state, &query).await?;
    Ok(Json(info))
}

/// The same data as [`tide_info`], as an HTML table.
async fn tide_html(
    State(state): State<AppState>,
    query: Result<Query<StationQuery>, QueryRejection>,
) -> Result<Html<String>, AppError> {
    let Query(query) = query?;
    let info = build_tide_info(&state, &query).await?;
    let html = TideTableTemplate::from_info(&info)
        .render()
        .map_err(|e| AppError::Internal {
            message: format!("Template error: {}", e),
        })?;
    Ok(Html(html))
}

async fn build_tide_info(
    state: &AppState,
    query: &StationQuery,
) -> Result<TideInfoResponse, AppError> {
    let station = find_station(&state.stations, query)?;
    let statistic = parse_statistic(query.statistic.as_deref())?;
    let window = request_window(state, query);

    let tides = state.tides.read().await;
    let data = tide_data(&tides, &station.station_name, &window, statistic);

    Ok(TideInfoResponse {
        station_name: station.station_name.clone(),
        station_reference: station.station_reference.clone(),
        from: window.from.unwrap_or_default(),
        to: window.to.unwrap_or_default(),
        data,
    })
}

fn parse_statistic(raw: Option<&str>) -> Result<Option<Statistic>, AppError> {
    match raw.filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => Statistic::parse(s).map(Some).ok_or_else(|| AppError::BadRequest {
            message: format!("Unknown statistic '{s}'! Please use max, min or mean."),
        }),
    }
}

/// Values or aggregate for one station.
fn tide_data(
    tides: &TideStore,
    station_name: &str,
    window: &TimeWindow,
    statistic: Option<Statistic>,
) -> TideData {
    let Some(statistic) = statistic else {
        return TideData::Values {
            tide_values: tides.station_tides(&[station_name], window).column(station_name),
        };
    };

    let per_station = match statistic {
        Statistic::Max => tides.max_tides(window),
        Statistic::Min => tides.min_tides(window),
        Statistic::Mean => tides.mean_tides(window),
    };
    TideData::Statistic(StatisticValue::new(
        statistic,
        per_station.get(station_name).copied(),
    ))
}

fn parse_timestamp(raw: &str) -> Result<Timestamp, AppError> {
    Timestamp::parse(raw).map_err(|e| AppError::BadRequest {
        message: format!("Invalid dateTime: {e}"),
    })
}

/// Application error type.
///
/// Everything except `Internal` is a user mistake or an upstream failure
/// and is answered as plain text with status 200.
#[derive(Debug)]
pub enum AppError {
    UnknownStation { message: String },
    AmbiguousInput { message: String },
    ExternalLookupFailure { message: String },
    BadRequest { message: String },
    Internal { message: String },
}

impl AppError {
    fn lookup(station: &Station, e: StationError) -> Self {
        AppError::ExternalLookupFailure {
            message: format!(
                "Could not look up the location of {}: {e}",
                station.station_name
            ),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::UnknownStation { message }
            | AppError::AmbiguousInput { message }
            | AppError::ExternalLookupFailure { message }
            | AppError::BadRequest { message }
            | AppError::Internal { message } => message,
        }
    }

    fn into_message(self) -> String {
        match self {
            AppError::UnknownStation { message }
            | AppError::AmbiguousInput { message }
            | AppError::ExternalLookupFailure { message }
            | AppError::BadRequest { message }
            | AppError::Internal { message } => message,
        }
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        AppError::BadRequest {
            message: format!("Invalid form: {}", rejection.body_text()),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest {
            message: format!("Invalid query: {}", rejection.body_text()),
        }
    }
}

impl From<TideError> for AppError {
    fn from(e: TideError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::OK,
        };

        if status.is_server_error() {
            error!(reason = self.message(), "request failed");
        } else {
            warn!(reason = self.message(), "request rejected");
        }

        (status, self.into_message()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(name: Option<&str>, reference: Option<&str>) -> StationQuery {
        StationQuery {
            station_name: name.map(str::to_string),
            station_reference: reference.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn ident_requires_exactly_one() {
        let err = StationIdent::from_query(&query(None, None)).unwrap_err();
        assert_eq!(err.message(), MISSING_STATION);

        let err = StationIdent::from_query(&query(Some("Newlyn"), Some("E73839"))).unwrap_err();
        assert_eq!(err.message(), BOTH_STATIONS);

        assert_eq!(
            StationIdent::from_query(&query(Some("Newlyn"), None)).unwrap(),
            StationIdent::Name("Newlyn".into())
        );
        assert_eq!(
            StationIdent::from_query(&query(None, Some("E73839"))).unwrap(),
            StationIdent::Reference("E73839".into())
        );
    }

    #[test]
    fn empty_parameters_count_as_absent() {
        assert_eq!(
            StationIdent::from_query(&query(Some(""), Some("E73839"))).unwrap(),
            StationIdent::Reference("E73839".into())
        );
        assert!(StationIdent::from_query(&query(Some(""), Some(""))).is_err());
    }

    #[test]
    fn names_use_plus_for_spaces() {
        assert_eq!(normalize_name("St Marys"), "St+Marys");
        assert_eq!(
            StationIdent::from_query(&query(Some("St Marys"), None)).unwrap(),
            StationIdent::Name("St+Marys".into())
        );
    }

    #[test]
    fn statistic_parsing() {
        assert_eq!(parse_statistic(None).unwrap(), None);
        assert_eq!(parse_statistic(Some("")).unwrap(), None);
        assert_eq!(parse_statistic(Some("min")).unwrap(), Some(Statistic::Min));
        let err = parse_statistic(Some("median")).unwrap_err();
        assert!(err.message().contains("median"));
    }

    #[test]
    fn tide_data_for_missing_station_is_null_or_empty() {
        let tides = TideStore::from_readings(vec![TideReading::new(
            "2021-09-20T01:00:00Z",
            "Newlyn",
            1.2,
        )]);
        let window = TimeWindow::unbounded();

        assert_eq!(
            tide_data(&tides, "Bangor", &window, Some(Statistic::Max)),
            TideData::Statistic(StatisticValue::Max(None))
        );
        assert_eq!(
            tide_data(&tides, "Bangor", &window, None),
            TideData::Values {
                tide_values: Default::default()
            }
        );
    }

    #[test]
    fn internal_errors_are_500() {
        let response = AppError::Internal {
            message: "disk full".into(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = AppError::UnknownStation {
            message: UNKNOWN_STATION.into(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn error_body_is_the_message() {
        let response = AppError::BadRequest {
            message: "Entry 0: bad".into(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"Entry 0: bad");
    }
}
