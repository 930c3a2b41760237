use crate::api::locator_arrow::GridCellsToArrow;
use crate::api::locator_parquet::GridCellsToGeoParquet;
use crate::core::geometry::create_cell_polygon;
use crate::core::grid::{cell_bounds, cell_center, point_to_indices};
use crate::core::locator::{indices_to_locator, locator_to_indices};
use crate::core::precision::Precision;
use crate::util::coord::{Coordinate, validate_wgs84};
use crate::util::error::MaidenheadError;
use arrow_array::RecordBatch;
use geo_types::{LineString, Point, Polygon, Rect};
use geoarrow_array::array::{PointArray, PolygonArray};
use std::collections::HashSet;
use std::path::Path;

/// A single Maidenhead grid cell.
///
/// Each `GridCell` is one field, square or subsquare, with its locator,
/// centre point in WGS84 lon/lat and global grid position.
///
/// # Example
///
/// ```
/// use maidenhead_rs::{GridCell, Precision};
///
/// # fn main() -> Result<(), maidenhead_rs::MaidenheadError> {
/// // (lon, lat) like every other geo_types coordinate
/// let cell = GridCell::from_wgs84(&(-0.0015, 51.4778), Precision::Subsquare)?;
/// assert_eq!(cell.id, "IO91xl");
///
/// let polygon = cell.to_polygon();
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    /// Locator string, e.g. `IO91xl`
    pub id: String,
    /// Centre point, x = longitude, y = latitude (EPSG:4326)
    pub center: Point<f64>,
    pub precision: Precision,
    /// Column counted eastward from 180° W at this precision
    pub col: i64,
    /// Row counted northward from 90° S at this precision
    pub row: i64,
}

impl GridCell {
    pub(crate) fn from_indices(
        col: i64,
        row: i64,
        precision: Precision,
    ) -> Result<Self, MaidenheadError> {
        let id = indices_to_locator(col, row, precision)?;
        Ok(Self {
            id,
            center: cell_center(col, row, precision),
            precision,
            col,
            row,
        })
    }

    /// Create a GridCell from a locator string of 2, 4 or 6 characters.
    ///
    /// # Example
    /// ```
    /// use maidenhead_rs::{GridCell, Precision};
    ///
    /// # fn main() -> Result<(), maidenhead_rs::MaidenheadError> {
    /// let cell = GridCell::from_locator("fn31")?;
    /// assert_eq!(cell.id, "FN31");
    /// assert_eq!(cell.precision, Precision::Square);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_locator(locator: &str) -> Result<Self, MaidenheadError> {
        let (col, row, precision) = locator_to_indices(locator)?;
        Self::from_indices(col, row, precision)
    }

    /// Create a GridCell from WGS84 (lon, lat) coordinates.
    ///
    /// Unlike [`crate::encode_locator`], out-of-range or non-finite input is
    /// rejected rather than clamped.
    pub fn from_wgs84(
        coord: &impl Coordinate,
        precision: Precision,
    ) -> Result<Self, MaidenheadError> {
        validate_wgs84(coord)?;
        let (col, row) = point_to_indices(coord, precision);
        Self::from_indices(col, row, precision)
    }

    /// Create a GridCell from latitude and longitude in that order.
    pub fn from_lat_lon(lat: f64, lon: f64, precision: Precision) -> Result<Self, MaidenheadError> {
        Self::from_wgs84(&(lon, lat), precision)
    }

    /// Create GridCells along a LineString in WGS84 coordinates.
    ///
    /// Samples points every half cell along each segment and returns every
    /// distinct cell the line passes through, in order of first contact.
    pub fn from_line_string_wgs84(
        line: &LineString,
        precision: Precision,
    ) -> Result<Vec<Self>, MaidenheadError> {
        let step_size = precision.cell_width().min(precision.cell_height()) * 0.5;

        let mut seen: HashSet<(i64, i64)> = HashSet::with_capacity(line.0.len());
        let mut cells: Vec<GridCell> = Vec::with_capacity(line.0.len());

        for coord in &line.0 {
            validate_wgs84(coord)?;
        }

        if line.0.len() == 1 {
            return Ok(vec![Self::from_wgs84(&line.0[0], precision)?]);
        }

        for window in line.0.windows(2) {
            let start = &window[0];
            let end = &window[1];

            let dx = end.x - start.x;
            let dy = end.y - start.y;
            let segment_length = (dx * dx + dy * dy).sqrt();
            let steps = (segment_length / step_size).ceil() as usize;

            for i in 0..=steps {
                let t = if steps == 0 {
                    0.0
                } else {
                    i as f64 / steps as f64
                };
                let pt = (start.x + t * dx, start.y + t * dy);
                let (col, row) = point_to_indices(&pt, precision);

                if seen.insert((col, row)) {
                    cells.push(Self::from_indices(col, row, precision)?);
                }
            }
        }

        Ok(cells)
    }

    /// Longitude of the cell centre.
    pub fn lon(&self) -> f64 {
        self.center.x()
    }

    /// Latitude of the cell centre.
    pub fn lat(&self) -> f64 {
        self.center.y()
    }

    /// Lon/lat bounds of this cell.
    pub fn bounds(&self) -> Rect<f64> {
        cell_bounds(self.col, self.row, self.precision)
    }

    /// Whether a lon/lat point falls inside this cell (edges inclusive).
    pub fn contains(&self, coord: &impl Coordinate) -> bool {
        let bounds = self.bounds();
        let (x, y) = (coord.x(), coord.y());
        x >= bounds.min().x && x <= bounds.max().x && y >= bounds.min().y && y <= bounds.max().y
    }

    /// The enclosing cell one level up, `None` for a field.
    pub fn parent(&self) -> Option<GridCell> {
        let coarser = self.precision.coarser()?;
        let ratio = self.precision.columns() / coarser.columns();
        Self::from_indices(self.col / ratio, self.row / ratio, coarser).ok()
    }

    /// The cells one level down, west to east then south to north.
    ///
    /// Empty for a subsquare.
    pub fn children(&self) -> Vec<GridCell> {
        let Some(finer) = self.precision.finer() else {
            return Vec::new();
        };
        let ratio = finer.columns() / self.precision.columns();

        (0..ratio)
            .flat_map(|dr| (0..ratio).map(move |dc| (dc, dr)))
            .filter_map(|(dc, dr)| {
                Self::from_indices(self.col * ratio + dc, self.row * ratio + dr, finer).ok()
            })
            .collect()
    }

    /// Converts this cell to a rectangular polygon.
    ///
    /// Returns a `geo_types::Polygon` in lon/lat, suitable for spatial
    /// operations or GeoJSON export.
    pub fn to_polygon(&self) -> Polygon<f64> {
        create_cell_polygon(&self.bounds())
    }

    /// Converts this cell's center to an Arrow PointArray.
    pub fn to_arrow_points(&self) -> PointArray {
        std::slice::from_ref(self).to_arrow_points()
    }

    /// Converts this cell to an Arrow PolygonArray.
    pub fn to_arrow_polygons(&self) -> PolygonArray {
        std::slice::from_ref(self).to_arrow_polygons()
    }

    /// Converts this cell to an Arrow RecordBatch with all attributes.
    pub fn to_record_batch(&self) -> Result<RecordBatch, MaidenheadError> {
        std::slice::from_ref(self).to_record_batch()
    }

    /// Writes this cell to a GeoParquet file.
    pub fn to_geoparquet(&self, path: impl AsRef<Path>) -> Result<(), MaidenheadError> {
        std::slice::from_ref(self).to_geoparquet(path)
    }
}

impl std::fmt::Display for GridCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}
