use crate::api::cell::GridCell;
use crate::core::constants::{MAX_GRID_CELLS, WORLD_EXTENT};
use crate::core::grid::point_to_indices;
use crate::core::locator::locator_to_indices;
use crate::core::precision::Precision;
use crate::util::coord::Coordinate;
use crate::util::error::MaidenheadError;
use geo_types::{Polygon, Rect};

/// Every cell at one precision covering a lon/lat extent.
///
/// Cells are stored row by row from the south-west corner.
#[derive(Debug, Clone)]
pub struct LocatorGrid {
    cells: Vec<GridCell>,
    precision: Precision,
    min_col: i64,
    min_row: i64,
    columns: i64,
}

impl LocatorGrid {
    pub fn builder() -> LocatorGridBuilder {
        LocatorGridBuilder::new()
    }

    /// Builds the grid for an extent in degrees.
    ///
    /// The extent is clamped to the globe. An inverted or non-finite extent
    /// gives an empty grid.
    ///
    /// Every cell is materialised, so the cost grows with the area and the
    /// square of the precision: the whole globe is 324 fields, 32 400
    /// squares or 18 662 400 subsquares. Use [`LocatorGrid::cell_count`]
    /// first, or the builder, which refuses extents over a cell limit.
    pub fn from_extent(
        min_lon: f64,
        min_lat: f64,
        max_lon: f64,
        max_lat: f64,
        precision: Precision,
    ) -> Self {
        let Some((min_col, min_row, max_col, max_row)) =
            extent_indices(min_lon, min_lat, max_lon, max_lat, precision)
        else {
            return Self {
                cells: Vec::new(),
                precision,
                min_col: 0,
                min_row: 0,
                columns: 0,
            };
        };
        let columns = max_col - min_col + 1;

        let mut cells = Vec::with_capacity((columns * (max_row - min_row + 1)) as usize);
        for row in min_row..=max_row {
            for col in min_col..=max_col {
                match GridCell::from_indices(col, row, precision) {
                    Ok(cell) => cells.push(cell),
                    Err(_) => continue,
                }
            }
        }

        Self {
            cells,
            precision,
            min_col,
            min_row,
            columns,
        }
    }

    /// Number of cells [`LocatorGrid::from_extent`] would build, without
    /// building them.
    pub fn cell_count(
        min_lon: f64,
        min_lat: f64,
        max_lon: f64,
        max_lat: f64,
        precision: Precision,
    ) -> usize {
        match extent_indices(min_lon, min_lat, max_lon, max_lat, precision) {
            Some((min_col, min_row, max_col, max_row)) => {
                ((max_col - min_col + 1) * (max_row - min_row + 1)) as usize
            }
            None => 0,
        }
    }

    pub fn from_rect(rect: &Rect<f64>, precision: Precision) -> Self {
        Self::from_extent(
            rect.min().x,
            rect.min().y,
            rect.max().x,
            rect.max().y,
            precision,
        )
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub fn iter(&self) -> impl Iterator<Item = &GridCell> {
        self.cells.iter()
    }

    /// Returns the cell containing a lon/lat point, if it is in the grid.
    pub fn get_cell_at(&self, coord: &impl Coordinate) -> Option<&GridCell> {
        if self.is_empty() {
            return None;
        }
        let (col, row) = point_to_indices(coord, self.precision);
        self.cell_at_indices(col, row)
    }

    /// Looks a cell up by locator. The locator must be at the grid's precision.
    pub fn get_cell(&self, locator: &str) -> Option<&GridCell> {
        let (col, row, precision) = locator_to_indices(locator).ok()?;
        if precision != self.precision {
            return None;
        }
        self.cell_at_indices(col, row)
    }

    fn cell_at_indices(&self, col: i64, row: i64) -> Option<&GridCell> {
        if col < self.min_col || col >= self.min_col + self.columns || row < self.min_row {
            return None;
        }
        let idx = (row - self.min_row) * self.columns + (col - self.min_col);
        self.cells.get(idx as usize)
    }

    pub fn to_polygons(&self) -> Vec<Polygon<f64>> {
        self.cells.iter().map(|cell| cell.to_polygon()).collect()
    }

    pub fn filter<F>(&self, predicate: F) -> Vec<&GridCell>
    where
        F: Fn(&GridCell) -> bool,
    {
        self.cells.iter().filter(|cell| predicate(cell)).collect()
    }
}

/// Inclusive (min_col, min_row, max_col, max_row) covering a clamped extent.
fn extent_indices(
    min_lon: f64,
    min_lat: f64,
    max_lon: f64,
    max_lat: f64,
    precision: Precision,
) -> Option<(i64, i64, i64, i64)> {
    let finite = [min_lon, min_lat, max_lon, max_lat]
        .iter()
        .all(|v| v.is_finite());
    if !finite || min_lon > max_lon || min_lat > max_lat {
        return None;
    }

    let sw = (
        min_lon.clamp(WORLD_EXTENT[0], WORLD_EXTENT[2]),
        min_lat.clamp(WORLD_EXTENT[1], WORLD_EXTENT[3]),
    );
    let ne = (
        max_lon.clamp(WORLD_EXTENT[0], WORLD_EXTENT[2]),
        max_lat.clamp(WORLD_EXTENT[1], WORLD_EXTENT[3]),
    );

    let (min_col, min_row) = point_to_indices(&sw, precision);
    let (max_col, max_row) = point_to_indices(&ne, precision);
    Some((min_col, min_row, max_col, max_row))
}

#[derive(Debug)]
pub struct LocatorGridBuilder {
    precision: Option<Precision>,
    min_lon: Option<f64>,
    min_lat: Option<f64>,
    max_lon: Option<f64>,
    max_lat: Option<f64>,
    max_cells: usize,
}

impl Default for LocatorGridBuilder {
    fn default() -> Self {
        Self {
            precision: None,
            min_lon: None,
            min_lat: None,
            max_lon: None,
            max_lat: None,
            max_cells: MAX_GRID_CELLS,
        }
    }
}

impl LocatorGridBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse to build grids with more cells than this.
    /// Defaults to [`MAX_GRID_CELLS`].
    pub fn max_cells(mut self, limit: usize) -> Self {
        self.max_cells = limit;
        self
    }

    pub fn precision(mut self, precision: Precision) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn extent(mut self, min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        self.min_lon = Some(min_lon);
        self.min_lat = Some(min_lat);
        self.max_lon = Some(max_lon);
        self.max_lat = Some(max_lat);
        self
    }

    pub fn rect(mut self, rect: &Rect<f64>) -> Self {
        self.min_lon = Some(rect.min().x);
        self.min_lat = Some(rect.min().y);
        self.max_lon = Some(rect.max().x);
        self.max_lat = Some(rect.max().y);
        self
    }

    pub fn build(self) -> Result<LocatorGrid, MaidenheadError> {
        let precision = self
            .precision
            .ok_or(MaidenheadError::MissingParameter("precision"))?;
        let (Some(min_lon), Some(min_lat), Some(max_lon), Some(max_lat)) =
            (self.min_lon, self.min_lat, self.max_lon, self.max_lat)
        else {
            return Err(MaidenheadError::MissingParameter("extent"));
        };

        let cells = LocatorGrid::cell_count(min_lon, min_lat, max_lon, max_lat, precision);
        if cells > self.max_cells {
            return Err(MaidenheadError::GridTooLarge {
                cells,
                limit: self.max_cells,
            });
        }

        Ok(LocatorGrid::from_extent(
            min_lon, min_lat, max_lon, max_lat, precision,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{coord, point};

    #[test]
    fn test_grid_from_extent() {
        // South-east England, one square each side of Greenwich
        let grid = LocatorGrid::from_extent(-1.5, 51.2, 1.5, 51.8, Precision::Square);
        assert_eq!(grid.precision(), Precision::Square);

        let ids: Vec<&str> = grid.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["IO91", "JO01"]);
    }

    #[test]
    fn test_grid_covers_every_subsquare() {
        let grid = LocatorGrid::from_extent(0.01, 0.01, 0.49, 0.11, Precision::Subsquare);
        // 0.01..0.49 lon spans columns a..f, 0.01..0.11 lat spans rows a..c
        assert_eq!(grid.len(), 6 * 3);
        assert_eq!(grid.cells()[0].id, "JJ00aa");
        assert_eq!(grid.cells()[grid.len() - 1].id, "JJ00fc");
    }

    #[test]
    fn test_grid_from_rect() {
        let rect = Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 39.0, y: 19.0 });
        let grid = LocatorGrid::from_rect(&rect, Precision::Field);
        assert_eq!(grid.len(), 4);
    }

    #[test]
    fn test_grid_clamps_to_globe() {
        let grid = LocatorGrid::from_extent(-500.0, -100.0, 500.0, 100.0, Precision::Field);
        assert_eq!(grid.len(), 18 * 18);
        assert!(grid.get_cell("AA").is_some());
        assert!(grid.get_cell("RR").is_some());
    }

    #[test]
    fn test_inverted_extent_is_empty() {
        let grid = LocatorGrid::from_extent(10.0, 10.0, 0.0, 0.0, Precision::Field);
        assert!(grid.is_empty());
        assert!(grid.get_cell_at(&(5.0, 5.0)).is_none());
    }

    #[test]
    fn test_grid_builder() -> Result<(), MaidenheadError> {
        let grid = LocatorGrid::builder()
            .precision(Precision::Square)
            .extent(-1.5, 51.2, 1.5, 51.8)
            .build()?;
        assert_eq!(grid.len(), 2);

        let rect = Rect::new(coord! { x: -1.5, y: 51.2 }, coord! { x: 1.5, y: 51.8 });
        let same = LocatorGrid::builder()
            .precision(Precision::Square)
            .rect(&rect)
            .build()?;
        assert_eq!(same.len(), grid.len());
        Ok(())
    }

    #[test]
    fn test_grid_builder_missing_parameters() {
        assert_eq!(
            LocatorGrid::builder().extent(0.0, 0.0, 1.0, 1.0).build().err(),
            Some(MaidenheadError::MissingParameter("precision"))
        );
        assert_eq!(
            LocatorGrid::builder().precision(Precision::Field).build().err(),
            Some(MaidenheadError::MissingParameter("extent"))
        );
    }

    #[test]
    fn test_cell_count_matches_grid() {
        assert_eq!(
            LocatorGrid::cell_count(-180.0, -90.0, 180.0, 90.0, Precision::Subsquare),
            4320 * 4320
        );
        assert_eq!(
            LocatorGrid::cell_count(-1.5, 51.2, 1.5, 51.8, Precision::Square),
            LocatorGrid::from_extent(-1.5, 51.2, 1.5, 51.8, Precision::Square).len()
        );
        assert_eq!(LocatorGrid::cell_count(1.0, 0.0, 0.0, 0.0, Precision::Field), 0);
    }

    #[test]
    fn test_grid_builder_cell_limit() -> Result<(), MaidenheadError> {
        let whole_globe = LocatorGrid::builder()
            .precision(Precision::Subsquare)
            .extent(-180.0, -90.0, 180.0, 90.0)
            .build();
        assert_eq!(
            whole_globe.err(),
            Some(MaidenheadError::GridTooLarge {
                cells: 4320 * 4320,
                limit: MAX_GRID_CELLS,
            })
        );

        let fields = LocatorGrid::builder()
            .precision(Precision::Field)
            .extent(-180.0, -90.0, 180.0, 90.0)
            .max_cells(324)
            .build()?;
        assert_eq!(fields.len(), 324);

        let too_small = LocatorGrid::builder()
            .precision(Precision::Field)
            .extent(-180.0, -90.0, 180.0, 90.0)
            .max_cells(100)
            .build();
        assert!(matches!(too_small, Err(MaidenheadError::GridTooLarge { .. })));
        Ok(())
    }

    #[test]
    fn test_get_cell_at() {
        let grid = LocatorGrid::from_extent(-1.5, 51.2, 1.5, 51.8, Precision::Square);

        let pt = point! { x: -0.0015, y: 51.4778 };
        assert_eq!(grid.get_cell_at(&pt).map(|c| c.id.as_str()), Some("IO91"));
        assert_eq!(grid.get_cell_at(&(0.5, 51.5)).map(|c| c.id.as_str()), Some("JO01"));
        assert!(grid.get_cell_at(&(10.0, 51.5)).is_none());
    }

    #[test]
    fn test_get_cell() {
        let grid = LocatorGrid::from_extent(-1.5, 51.2, 1.5, 51.8, Precision::Square);
        assert!(grid.get_cell("io91").is_some());
        assert!(grid.get_cell("IO").is_none());
        assert!(grid.get_cell("JN58").is_none());
    }

    #[test]
    fn test_filter_and_polygons() {
        let grid = LocatorGrid::from_extent(-1.5, 51.2, 1.5, 51.8, Precision::Square);

        let east = grid.filter(|cell| cell.lon() > 0.0);
        assert_eq!(east.len(), 1);
        assert_eq!(grid.to_polygons().len(), grid.len());
    }
}
