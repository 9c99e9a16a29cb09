//! In-memory tide table backed by a CSV file.

use std::collections::{BTreeMap, HashSet};
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::{TideReading, TideValue, TimeWindow};

use super::error::TideError;
use super::graph::{Graph, GraphStyle, render_table};
use super::table::TideTable;

/// Column order of `tideReadings.csv`.
const HEADER: [&str; 3] = ["dateTime", "stationName", "tideValue"];

/// One row of `tideReadings.csv`. The value is read as text so that noise
/// survives loading.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReadingRecord {
    date_time: String,
    station_name: String,
    tide_value: String,
}

/// Which end of the range [`TideStore::extreme_readings`] looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extreme {
    Max,
    Min,
}

impl Extreme {
    /// Whether `candidate` should replace `current` as the extreme reading.
    ///
    /// Equal levels go to the earlier timestamp; full ties keep the row that
    /// was seen first.
    fn prefers(self, candidate: &TideReading, cv: f64, current: &TideReading, cur: f64) -> bool {
        let by_value = match self {
            Extreme::Max => cv.total_cmp(&cur),
            Extreme::Min => cur.total_cmp(&cv),
        };
        by_value.is_gt() || (by_value.is_eq() && candidate.date_time < current.date_time)
    }
}

/// Tide readings held in memory for the lifetime of the process.
///
/// Rows keep their load/append order and may repeat. Persistence is an
/// explicit [`write_csv`](Self::write_csv); nothing is flushed implicitly.
#[derive(Debug, Clone, Default)]
pub struct TideStore {
    readings: Vec<TideReading>,
}

impl TideStore {
    /// Create a store from readings already in memory.
    pub fn from_readings(readings: Vec<TideReading>) -> Self {
        Self { readings }
    }

    /// Load `tideReadings.csv` from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TideError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let store = Self::from_reader(file)?;

        info!(
            path = %path.display(),
            rows = store.len(),
            noise = store.noise_count(),
            "loaded tide readings"
        );
        Ok(store)
    }

    /// Parse readings from any CSV source with a header row.
    pub fn from_reader(reader: impl Read) -> Result<Self, TideError> {
        let mut csv = csv::Reader::from_reader(reader);
        let mut readings = Vec::new();

        for record in csv.deserialize() {
            let record: ReadingRecord = record?;
            readings.push(TideReading::from_raw(
                &record.date_time,
                &record.station_name,
                &record.tide_value,
            ));
        }

        Ok(Self { readings })
    }

    /// All rows, noise included, in storage order.
    pub fn readings(&self) -> &[TideReading] {
        &self.readings
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Number of rows whose value is noise.
    pub fn noise_count(&self) -> usize {
        self.readings.iter().filter(|r| r.value.is_noise()).count()
    }

    /// Numeric readings inside `window`, paired with their level.
    fn numeric_in<'a>(
        &'a self,
        window: &'a TimeWindow,
    ) -> impl Iterator<Item = (&'a TideReading, f64)> + 'a {
        self.readings
            .iter()
            .filter(move |r| window.contains(&r.date_time))
            .filter_map(|r| r.level().map(|v| (r, v)))
    }

    /// Levels of the requested stations, indexed by timestamp.
    ///
    /// Noise rows and rows outside `window` are skipped. When the same
    /// station has several rows at one timestamp, the later row wins.
    pub fn station_tides<S: AsRef<str>>(&self, stations: &[S], window: &TimeWindow) -> TideTable {
        let wanted: HashSet<&str> = stations.iter().map(AsRef::as_ref).collect();
        let mut table = TideTable::new();

        for (reading, level) in self.numeric_in(window) {
            if wanted.contains(reading.station_name.as_str()) {
                table.insert(&reading.date_time, &reading.station_name, level);
            }
        }

        debug!(
            stations = wanted.len(),
            rows = table.len(),
            "built station tide table"
        );
        table
    }

    /// The reading holding each station's highest or lowest level.
    pub fn extreme_readings(
        &self,
        window: &TimeWindow,
        extreme: Extreme,
    ) -> BTreeMap<String, TideReading> {
        let mut best: BTreeMap<&str, (&TideReading, f64)> = BTreeMap::new();

        for (reading, level) in self.numeric_in(window) {
            best.entry(reading.station_name.as_str())
                .and_modify(|(current, cur)| {
                    if extreme.prefers(reading, level, current, *cur) {
                        *current = reading;
                        *cur = level;
                    }
                })
                .or_insert((reading, level));
        }

        best.into_iter()
            .map(|(station, (reading, _))| (station.to_string(), reading.clone()))
            .collect()
    }

    /// Highest level per station within `window`.
    pub fn max_tides(&self, window: &TimeWindow) -> BTreeMap<String, f64> {
        self.extreme_levels(window, Extreme::Max)
    }

    /// Lowest level per station within `window`.
    pub fn min_tides(&self, window: &TimeWindow) -> BTreeMap<String, f64> {
        self.extreme_levels(window, Extreme::Min)
    }

    fn extreme_levels(&self, window: &TimeWindow, extreme: Extreme) -> BTreeMap<String, f64> {
        self.extreme_readings(window, extreme)
            .into_iter()
            .filter_map(|(station, reading)| reading.level().map(|v| (station, v)))
            .collect()
    }

    /// Arithmetic mean level per station within `window`.
    pub fn mean_tides(&self, window: &TimeWindow) -> BTreeMap<String, f64> {
        let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();

        for (reading, level) in self.numeric_in(window) {
            let entry = sums.entry(reading.station_name.as_str()).or_default();
            entry.0 += level;
            entry.1 += 1;
        }

        sums.into_iter()
            .map(|(station, (sum, count))| (station.to_string(), sum / count as f64))
            .collect()
    }

    /// Append one reading.
    ///
    /// Returns true if the table grew by exactly one row.
    pub fn add_reading(&mut self, reading: TideReading) -> bool {
        let before = self.readings.len();
        debug!(
            date_time = %reading.date_time,
            station = %reading.station_name,
            value = %reading.value,
            "appending tide reading"
        );
        self.readings.push(reading);
        self.readings.len() == before + 1
    }

    /// Write every numeric row to `path`, replacing the file.
    ///
    /// Noise rows are left out. Returns the number of rows written. The
    /// write is not atomic.
    pub async fn write_csv(&self, path: impl AsRef<Path>) -> Result<usize, TideError> {
        let path = path.as_ref();
        let mut buf = Vec::new();
        let written = self.write_to(&mut buf)?;
        tokio::fs::write(path, buf).await?;

        info!(path = %path.display(), rows = written, "wrote tide readings");
        Ok(written)
    }

    /// Serialise numeric rows as CSV, header first.
    pub fn write_to(&self, writer: impl Write) -> Result<usize, TideError> {
        let mut csv = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        csv.write_record(HEADER)?;

        let mut written = 0;
        for reading in &self.readings {
            let TideValue::Numeric(level) = reading.value else {
                continue;
            };
            csv.serialize(ReadingRecord {
                date_time: reading.date_time.clone(),
                station_name: reading.station_name.clone(),
                tide_value: level.to_string(),
            })?;
            written += 1;
        }

        csv.flush()?;
        Ok(written)
    }

    /// Plot the requested stations as a line chart and encode it as PNG.
    ///
    /// The image is named after the first requested station.
    pub fn render_graph(
        &self,
        stations: &[String],
        window: &TimeWindow,
        style: &GraphStyle,
    ) -> Result<Graph, TideError> {
        let table = self.station_tides(stations, window);
        let name = stations.first().cloned().unwrap_or_default();
        render_table(&table, stations, &name, style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
dateTime,stationName,tideValue
2021-09-20T00:00:00Z,Bangor,2.1
2021-09-20T00:00:00Z,Newlyn,0.5
2021-09-20T01:00:00Z,Newlyn,1.2
2021-09-20T02:00:00Z,Newlyn,noise
2021-09-20T02:00:00Z,Bangor,-1.5
2021-09-20T03:00:00Z,Newlyn,-0.3
2021-09-20T03:00:00Z,Bangor,
";

    fn store() -> TideStore {
        TideStore::from_reader(CSV.as_bytes()).unwrap()
    }

    fn full() -> TimeWindow {
        TimeWindow::between("2021-09-20T00:00:00Z", "2021-09-26T06:00:00Z")
    }

    #[test]
    fn load_keeps_noise_rows() {
        let store = store();
        assert_eq!(store.len(), 7);
        assert_eq!(store.noise_count(), 2);
        assert_eq!(
            store.readings()[3].value,
            TideValue::Noise("noise".to_string())
        );
    }

    #[test]
    fn load_ignores_extra_columns() {
        let csv = "dateTime,stationName,tideValue,flag\n2021-09-20T00:00:00Z,Newlyn,0.5,x\n";
        let store = TideStore::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(store.readings()[0].level(), Some(0.5));
    }

    #[test]
    fn load_missing_file_fails() {
        let err = TideStore::load("/nonexistent/tideReadings.csv").unwrap_err();
        assert!(matches!(err, TideError::Io(_)));
    }

    #[test]
    fn station_tides_drops_noise() {
        let readings = vec![
            TideReading::new("2021-09-20T01:00:00Z", "Newlyn", 1.2),
            TideReading::from_raw("2021-09-20T02:00:00Z", "Newlyn", "noise"),
        ];
        let store = TideStore::from_readings(readings);

        let table = store.station_tides(&["Newlyn"], &full());
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("2021-09-20T01:00:00Z", "Newlyn"), Some(1.2));

        let max = store.max_tides(&full());
        assert_eq!(max.len(), 1);
        assert_eq!(max["Newlyn"], 1.2);
    }

    #[test]
    fn station_tides_reshapes_by_station() {
        let table = store().station_tides(&["Newlyn", "Bangor"], &full());

        assert_eq!(table.len(), 4);
        assert_eq!(table.get("2021-09-20T00:00:00Z", "Bangor"), Some(2.1));
        assert_eq!(table.get("2021-09-20T00:00:00Z", "Newlyn"), Some(0.5));
        // Newlyn is noise at 02:00, Bangor is blank at 03:00
        assert_eq!(table.get("2021-09-20T02:00:00Z", "Newlyn"), None);
        assert_eq!(table.get("2021-09-20T02:00:00Z", "Bangor"), Some(-1.5));
        assert_eq!(table.get("2021-09-20T03:00:00Z", "Bangor"), None);
    }

    #[test]
    fn station_tides_filters_stations_and_window() {
        let window = TimeWindow::between("2021-09-20T01:00:00Z", "2021-09-20T03:00:00Z");
        let table = store().station_tides(&["Newlyn"], &window);

        let column = table.column("Newlyn");
        assert_eq!(column.len(), 2);
        assert_eq!(column["2021-09-20T01:00:00Z"], 1.2);
        assert_eq!(column["2021-09-20T03:00:00Z"], -0.3);
        assert!(table.column("Bangor").is_empty());
    }

    #[test]
    fn station_tides_open_bounds() {
        let window = TimeWindow::new(None, Some("2021-09-20T00:00:00Z".into()));
        let table = store().station_tides(&["Newlyn", "Bangor"], &window);
        assert_eq!(table.len(), 1);

        let table = store().station_tides(&["Newlyn"], &TimeWindow::unbounded());
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn station_tides_later_duplicate_wins() {
        let store = TideStore::from_readings(vec![
            TideReading::new("2021-09-20T01:00:00Z", "Newlyn", 1.0),
            TideReading::new("2021-09-20T01:00:00Z", "Newlyn", 2.0),
        ]);
        let table = store.station_tides(&["Newlyn"], &full());
        assert_eq!(table.get("2021-09-20T01:00:00Z", "Newlyn"), Some(2.0));
    }

    #[test]
    fn inverted_window_is_empty_not_error() {
        let window = TimeWindow::between("2021-09-26T00:00:00Z", "2021-09-20T00:00:00Z");
        let store = store();
        assert!(store.station_tides(&["Newlyn", "Bangor"], &window).is_empty());
        assert!(store.max_tides(&window).is_empty());
        assert!(store.min_tides(&window).is_empty());
        assert!(store.mean_tides(&window).is_empty());
    }

    #[test]
    fn aggregates_per_station() {
        let store = store();

        let max = store.max_tides(&full());
        assert_eq!(max["Newlyn"], 1.2);
        assert_eq!(max["Bangor"], 2.1);

        let min = store.min_tides(&full());
        assert_eq!(min["Newlyn"], -0.3);
        assert_eq!(min["Bangor"], -1.5);

        let mean = store.mean_tides(&full());
        assert!((mean["Newlyn"] - (0.5 + 1.2 - 0.3) / 3.0).abs() < 1e-12);
        assert!((mean["Bangor"] - (2.1 - 1.5) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn aggregates_skip_all_noise_station() {
        let store = TideStore::from_readings(vec![
            TideReading::from_raw("2021-09-20T01:00:00Z", "Ghost", "-"),
            TideReading::new("2021-09-20T01:00:00Z", "Newlyn", 1.0),
        ]);
        assert!(!store.max_tides(&full()).contains_key("Ghost"));
        assert!(!store.mean_tides(&full()).contains_key("Ghost"));
    }

    #[test]
    fn extreme_ties_go_to_earliest_timestamp() {
        let store = TideStore::from_readings(vec![
            TideReading::new("2021-09-20T05:00:00Z", "Newlyn", 2.0),
            TideReading::new("2021-09-20T01:00:00Z", "Newlyn", 2.0),
            TideReading::new("2021-09-20T03:00:00Z", "Newlyn", -1.0),
            TideReading::new("2021-09-20T02:00:00Z", "Newlyn", -1.0),
        ]);

        let max = store.extreme_readings(&full(), Extreme::Max);
        assert_eq!(max["Newlyn"].date_time, "2021-09-20T01:00:00Z");

        let min = store.extreme_readings(&full(), Extreme::Min);
        assert_eq!(min["Newlyn"].date_time, "2021-09-20T02:00:00Z");
    }

    #[test]
    fn add_reading_grows_by_one() {
        let mut store = store();
        let before = store.len();
        assert!(store.add_reading(TideReading::new("2021-09-27T00:00:00Z", "Newlyn", 1.465)));
        assert_eq!(store.len(), before + 1);
    }

    #[tokio::test]
    async fn write_csv_drops_noise() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let written = store().write_csv(&path).await.unwrap();
        assert_eq!(written, 5);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("dateTime,stationName,tideValue\n"));
        assert!(!text.contains("noise"));
    }

    #[test]
    fn write_empty_store_still_has_header() {
        let mut out = Vec::new();
        let written = TideStore::default().write_to(&mut out).unwrap();
        assert_eq!(written, 0);
        assert_eq!(String::from_utf8(out).unwrap(), "dateTime,stationName,tideValue\n");
    }

    #[tokio::test]
    async fn add_write_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tideReadings.csv");

        let mut store = store();
        store.add_reading(TideReading::new("2021-09-27T00:00:00Z", "Newlyn", 1.465));
        store.add_reading(TideReading::from_raw("2021-09-27T01:00:00Z", "Newlyn", "oops"));
        store.write_csv(&path).await.unwrap();

        let reloaded = TideStore::load(&path).unwrap();
        assert_eq!(reloaded.noise_count(), 0);
        assert!(reloaded.readings().contains(&TideReading::new(
            "2021-09-27T00:00:00Z",
            "Newlyn",
            1.465
        )));
        assert!(
            !reloaded
                .readings()
                .iter()
                .any(|r| r.date_time == "2021-09-27T01:00:00Z")
        );
    }

    #[tokio::test]
    async fn write_to_unwritable_path_fails() {
        let err = store()
            .write_csv("/nonexistent/dir/tideReadings.csv")
            .await
            .unwrap_err();
        assert!(matches!(err, TideError::Io(_)));
    }
}
