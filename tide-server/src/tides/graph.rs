//! Line-chart rendering of tide tables.
//!
//! Charts carry no text: the bitmap backend is built without a font
//! renderer, so the frame, the zero line and one coloured line per station
//! are all that is drawn.

use std::io::Cursor;

use plotters::prelude::*;

use super::error::TideError;
use super::table::TideTable;

/// Size and stroke settings for rendered graphs.
#[derive(Debug, Clone)]
pub struct GraphStyle {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
    pub stroke_width: u32,
}

impl Default for GraphStyle {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            margin: 20,
            stroke_width: 2,
        }
    }
}

/// A rendered PNG graph.
#[derive(Debug, Clone)]
pub struct Graph {
    name: String,
    png: Vec<u8>,
}

impl Graph {
    /// File name for the image, derived from the first plotted station.
    pub fn file_name(&self) -> String {
        format!("{}.png", self.name)
    }

    /// Encoded PNG bytes.
    pub fn png(&self) -> &[u8] {
        &self.png
    }

    pub fn into_png(self) -> Vec<u8> {
        self.png
    }
}

/// Y range for the chart. Flat or empty data gets a unit band so the
/// coordinate system is never degenerate.
fn padded_range(range: Option<(f64, f64)>) -> (f64, f64) {
    match range {
        None => (-1.0, 1.0),
        Some((lo, hi)) if hi - lo < f64::EPSILON => (lo - 0.5, hi + 0.5),
        Some((lo, hi)) => {
            let pad = (hi - lo) * 0.05;
            (lo - pad, hi + pad)
        }
    }
}

/// Plot one line per station. X is the row position in timestamp order.
pub(crate) fn render_table(
    table: &TideTable,
    stations: &[String],
    name: &str,
    style: &GraphStyle,
) -> Result<Graph, TideError> {
    let (width, height) = (style.width, style.height);
    let mut pixels = vec![0u8; width as usize * height as usize * 3];

    let x_max = table.len().saturating_sub(1).max(1) as f64;
    let (lo, hi) = padded_range(table.value_range());

    {
        let root = BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(TideError::graph)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(style.margin)
            .build_cartesian_2d(0f64..x_max, lo..hi)
            .map_err(TideError::graph)?;

        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(0.0, lo), (x_max, hi)],
                BLACK.stroke_width(1),
            )))
            .map_err(TideError::graph)?;

        if lo < 0.0 && hi > 0.0 {
            chart
                .draw_series(LineSeries::new(
                    [(0.0, 0.0), (x_max, 0.0)],
                    BLACK.mix(0.3).stroke_width(1),
                ))
                .map_err(TideError::graph)?;
        }

        for (idx, station) in stations.iter().enumerate() {
            let points: Vec<(f64, f64)> = table
                .rows()
                .enumerate()
                .filter_map(|(i, (_, cells))| cells.get(station).map(|v| (i as f64, *v)))
                .collect();

            chart
                .draw_series(LineSeries::new(
                    points,
                    Palette99::pick(idx).stroke_width(style.stroke_width),
                ))
                .map_err(TideError::graph)?;
        }

        root.present().map_err(TideError::graph)?;
    }

    let image = image::RgbImage::from_raw(width, height, pixels)
        .ok_or_else(|| TideError::graph("pixel buffer does not match image size"))?;

    let mut png = Cursor::new(Vec::new());
    image
        .write_to(&mut png, image::ImageFormat::Png)
        .map_err(TideError::graph)?;

    Ok(Graph {
        name: name.to_string(),
        png: png.into_inner(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

    fn small() -> GraphStyle {
        GraphStyle {
            width: 120,
            height: 80,
            margin: 5,
            stroke_width: 1,
        }
    }

    #[test]
    fn renders_png() {
        let mut table = TideTable::new();
        table.insert("2021-09-20T00:00:00Z", "Newlyn", 0.5);
        table.insert("2021-09-20T01:00:00Z", "Newlyn", 1.2);
        table.insert("2021-09-20T01:00:00Z", "Bangor", -0.4);

        let stations = vec!["Newlyn".to_string(), "Bangor".to_string()];
        let graph = render_table(&table, &stations, "Newlyn", &small()).unwrap();

        assert!(graph.png().starts_with(PNG_MAGIC));
        assert_eq!(graph.file_name(), "Newlyn.png");
    }

    #[test]
    fn renders_empty_table() {
        let stations = vec!["Newlyn".to_string()];
        let graph = render_table(&TideTable::new(), &stations, "Newlyn", &small()).unwrap();
        assert!(graph.into_png().starts_with(PNG_MAGIC));
    }

    #[test]
    fn padded_range_never_degenerate() {
        assert_eq!(padded_range(None), (-1.0, 1.0));
        assert_eq!(padded_range(Some((2.0, 2.0))), (1.5, 2.5));

        let (lo, hi) = padded_range(Some((0.0, 10.0)));
        assert!(lo < 0.0 && hi > 10.0);
    }
}
