use crate::api::cell::GridCell;
use crate::core::precision::Precision;
use crate::util::error::MaidenheadError;
use crate::util::parse::parse_geometry;
use geo::Centroid;
use geo_types::{Geometry, Point};
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

/// For the type of location source in the file
enum SourceIndices {
    Geometry(usize),
    Coordinates { x_idx: usize, y_idx: usize },
}

/// Output format for cell polygon geometries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryFormat {
    /// Well-Known Text format (e.g., "POLYGON((...))")
    Wkt,
    /// GeoJSON format
    GeoJson,
}

/// Specifies how to extract location data from CSV rows.
#[derive(Debug, Clone)]
pub enum CoordinateSource {
    /// A single column containing WKT or GeoJSON geometry
    GeometryColumn(String),
    /// Separate X and Y coordinate columns (e.g., Longitude/Latitude)
    CoordinateColumns { x_column: String, y_column: String },
}

/// Configuration for annotating a CSV with locators.
#[derive(Debug, Clone)]
pub struct CsvLocatorConfig {
    pub source: CoordinateSource,
    pub exclude_columns: Vec<String>,
    pub precision: Precision,
    pub include_cell_geometry: Option<GeometryFormat>,
}

impl CsvLocatorConfig {
    /// Create config for a CSV with a geometry column (WKT or GeoJSON).
    ///
    /// # Example
    /// ```
    /// use maidenhead_rs::{CsvLocatorConfig, Precision};
    ///
    /// let config = CsvLocatorConfig::new("geometry", Precision::Subsquare);
    /// ```
    pub fn new(geometry_column: impl Into<String>, precision: Precision) -> Self {
        Self {
            source: CoordinateSource::GeometryColumn(geometry_column.into()),
            exclude_columns: Vec::new(),
            precision,
            include_cell_geometry: None,
        }
    }

    /// Create config for a CSV with separate X/Y coordinate columns.
    ///
    /// # Example
    /// ```
    /// use maidenhead_rs::{CsvLocatorConfig, Precision};
    ///
    /// // Station export with lng/lat columns
    /// let config = CsvLocatorConfig::from_coords("lng", "lat", Precision::Subsquare);
    /// ```
    pub fn from_coords(
        x_column: impl Into<String>,
        y_column: impl Into<String>,
        precision: Precision,
    ) -> Self {
        Self {
            source: CoordinateSource::CoordinateColumns {
                x_column: x_column.into(),
                y_column: y_column.into(),
            },
            exclude_columns: Vec::new(),
            precision,
            include_cell_geometry: None,
        }
    }

    pub fn exclude(mut self, columns: Vec<String>) -> Self {
        self.exclude_columns = columns;
        self
    }

    /// Include the cell rectangle in the output.
    pub fn with_cell_geometry(mut self, format: GeometryFormat) -> Self {
        self.include_cell_geometry = Some(format);
        self
    }
}

pub trait CsvToLocator {
    fn to_locator_csv(
        &self,
        output_path: impl AsRef<Path>,
        config: &CsvLocatorConfig,
    ) -> Result<(), MaidenheadError>;
}

impl<P: AsRef<Path>> CsvToLocator for P {
    fn to_locator_csv(
        &self,
        output_path: impl AsRef<Path>,
        config: &CsvLocatorConfig,
    ) -> Result<(), MaidenheadError> {
        csv_to_locator_csv(self, output_path, config)
    }
}

fn polygon_to_wkt(polygon: &geo_types::Polygon<f64>) -> String {
    use wkt::ToWkt;
    polygon.wkt_string()
}

fn polygon_to_geojson(polygon: &geo_types::Polygon<f64>) -> String {
    let geom = geojson::Geometry::from(polygon);
    geom.to_string()
}

fn geometry_to_cells(
    geom: Geometry<f64>,
    precision: Precision,
) -> Result<Vec<GridCell>, MaidenheadError> {
    match geom {
        Geometry::Point(pt) => Ok(vec![GridCell::from_wgs84(&pt, precision)?]),
        Geometry::MultiPoint(mp) => mp
            .0
            .iter()
            .map(|pt| GridCell::from_wgs84(pt, precision))
            .collect(),
        Geometry::LineString(line) => GridCell::from_line_string_wgs84(&line, precision),
        Geometry::MultiLineString(mls) => {
            let mut all_cells = Vec::new();
            for line in &mls.0 {
                all_cells.extend(GridCell::from_line_string_wgs84(line, precision)?);
            }
            Ok(all_cells)
        }
        Geometry::Polygon(poly) => match poly.centroid() {
            Some(centroid) => Ok(vec![GridCell::from_wgs84(&centroid, precision)?]),
            None => Ok(vec![]),
        },
        Geometry::MultiPolygon(mp) => {
            let mut cells = Vec::new();
            for poly in &mp.0 {
                if let Some(centroid) = poly.centroid() {
                    cells.push(GridCell::from_wgs84(&centroid, precision)?);
                }
            }
            Ok(cells)
        }
        Geometry::GeometryCollection(gc) => {
            let mut all_cells = Vec::new();
            for g in gc.0 {
                all_cells.extend(geometry_to_cells(g, precision)?);
            }
            Ok(all_cells)
        }
        _ => Err(MaidenheadError::GeometryParseError(
            "Unsupported geometry type".to_string(),
        )),
    }
}

fn parse_coordinate(value: Option<&str>, axis: &str, idx: usize) -> Result<f64, MaidenheadError> {
    let raw = value
        .ok_or_else(|| {
            MaidenheadError::CsvError(format!("Missing {} column at index {}", axis, idx))
        })?
        .trim();
    raw.parse()
        .map_err(|_| MaidenheadError::CsvError(format!("Invalid {} coordinate: '{}'", axis, raw)))
}

/// Converts a CSV file with geometry or coordinate columns to a CSV with a
/// leading `locator` column.
///
/// The location columns are dropped from the output. Rows whose geometry
/// covers several cells (lines, multi-geometries) are repeated once per
/// cell. Streams output to keep memory flat for large files.
///
/// # Example with geometry column (WKT or GeoJSON)
///
/// ```no_run
/// use maidenhead_rs::{csv_to_locator_csv, CsvLocatorConfig, GeometryFormat, Precision};
///
/// let config = CsvLocatorConfig::new("geometry", Precision::Subsquare)
///     .exclude(vec!["notes".into()])
///     .with_cell_geometry(GeometryFormat::Wkt);
///
/// csv_to_locator_csv("stations.csv", "stations_located.csv", &config).unwrap();
/// ```
///
/// # Example with coordinate columns
///
/// ```no_run
/// use maidenhead_rs::{csv_to_locator_csv, CsvLocatorConfig, Precision};
///
/// let config = CsvLocatorConfig::from_coords("lng", "lat", Precision::Square);
///
/// csv_to_locator_csv("stations.csv", "stations_located.csv", &config).unwrap();
/// ```
pub fn csv_to_locator_csv(
    csv_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &CsvLocatorConfig,
) -> Result<(), MaidenheadError> {
    let csv_path = csv_path.as_ref();
    let file = File::open(csv_path).map_err(|e| MaidenheadError::CsvError(e.to_string()))?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| MaidenheadError::CsvError(e.to_string()))?
        .clone();

    let find_column = |name: &str, role: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| {
                MaidenheadError::CsvError(format!("{} column '{}' not found", role, name))
            })
    };

    // Location columns never appear in the output
    let (source_indices, mut exclude_indices) = match &config.source {
        CoordinateSource::GeometryColumn(col) => {
            let idx = find_column(col, "Geometry")?;
            (SourceIndices::Geometry(idx), HashSet::from([idx]))
        }
        CoordinateSource::CoordinateColumns { x_column, y_column } => {
            let x_idx = find_column(x_column, "X")?;
            let y_idx = find_column(y_column, "Y")?;
            (
                SourceIndices::Coordinates { x_idx, y_idx },
                HashSet::from([x_idx, y_idx]),
            )
        }
    };

    for col_name in &config.exclude_columns {
        if let Some(idx) = headers.iter().position(|h| h == col_name) {
            exclude_indices.insert(idx);
        }
    }

    let out_file =
        File::create(output_path).map_err(|e| MaidenheadError::IoError(e.to_string()))?;
    let mut writer = csv::Writer::from_writer(out_file);

    let mut header_row: Vec<&str> = vec!["locator"];
    if config.include_cell_geometry.is_some() {
        header_row.push("locator_geometry");
    }
    for (i, h) in headers.iter().enumerate() {
        if !exclude_indices.contains(&i) {
            header_row.push(h);
        }
    }
    writer
        .write_record(&header_row)
        .map_err(|e| MaidenheadError::CsvError(e.to_string()))?;

    debug!(
        input = %csv_path.display(),
        precision = %config.precision,
        "annotating csv with locators"
    );

    let mut rows_in = 0usize;
    let mut rows_out = 0usize;

    for result in reader.records() {
        let record = result.map_err(|e| MaidenheadError::CsvError(e.to_string()))?;
        rows_in += 1;

        let cells = match &source_indices {
            SourceIndices::Geometry(idx) => {
                let geom_str = record.get(*idx).ok_or_else(|| {
                    MaidenheadError::CsvError(format!("Missing geometry column at index {}", idx))
                })?;
                let geom = parse_geometry(geom_str)?;
                geometry_to_cells(geom, config.precision)?
            }
            SourceIndices::Coordinates { x_idx, y_idx } => {
                let x = parse_coordinate(record.get(*x_idx), "X", *x_idx)?;
                let y = parse_coordinate(record.get(*y_idx), "Y", *y_idx)?;
                vec![GridCell::from_wgs84(&Point::new(x, y), config.precision)?]
            }
        };

        for cell in cells {
            let mut row: Vec<String> = vec![cell.id.clone()];

            if let Some(format) = config.include_cell_geometry {
                let polygon = cell.to_polygon();
                let geom_str = match format {
                    GeometryFormat::Wkt => polygon_to_wkt(&polygon),
                    GeometryFormat::GeoJson => polygon_to_geojson(&polygon),
                };
                row.push(geom_str);
            }

            for (i, field) in record.iter().enumerate() {
                if !exclude_indices.contains(&i) {
                    row.push(field.to_string());
                }
            }
            writer
                .write_record(&row)
                .map_err(|e| MaidenheadError::CsvError(e.to_string()))?;
            rows_out += 1;
        }
    }

    writer
        .flush()
        .map_err(|e| MaidenheadError::CsvError(e.to_string()))?;

    info!(rows_in, rows_out, "csv locator annotation complete");
    Ok(())
}
