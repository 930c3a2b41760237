//! # maidenhead-rs
//!
//! Maidenhead grid locators for tracking amateur-radio stations.
//!
//! ### 1. `encode_locator` - The Encoder
//!
//! ```
//! use maidenhead_rs::encode_locator;
//!
//! // latitude, longitude, characters (2, 4 or 6)
//! assert_eq!(encode_locator(51.4778, -0.0015, 6), "IO91xl");
//! assert_eq!(encode_locator(51.4778, -0.0015, 4), "IO91");
//! ```
//!
//! ### 2. `GridCell` / `LocatorGrid` - Cells and Collections of Cells
//!
//! ```
//! use maidenhead_rs::{GridCell, LocatorGrid, Precision};
//!
//! # fn main() -> Result<(), maidenhead_rs::MaidenheadError> {
//! let cell = GridCell::from_locator("IO91xl")?;
//! println!("{} centre: ({}, {})", cell.id, cell.lon(), cell.lat());
//!
//! let grid = LocatorGrid::builder()
//!     .precision(Precision::Square)
//!     .extent(-1.5, 51.2, 1.5, 51.8)
//!     .build()?;
//!
//! if let Some(cell) = grid.get_cell_at(&(-0.0015, 51.4778)) {
//!     println!("{}", cell.id);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### 3. `CsvToLocator` - CSV File Annotation
//!
//! ```no_run
//! use maidenhead_rs::{CsvLocatorConfig, CsvToLocator, Precision};
//!
//! let config = CsvLocatorConfig::from_coords("lng", "lat", Precision::Subsquare);
//!
//! "stations.csv".to_locator_csv("stations_located.csv", &config).unwrap();
//! ```
//!
//! ### 4. `Station` - Dashboard Station Records
//!
//! ```no_run
//! use maidenhead_rs::{Precision, StationSummary, group_by_locator, load_stations_json};
//!
//! let stations = load_stations_json("stations.json").unwrap();
//! for (square, group) in group_by_locator(&stations, Precision::Square) {
//!     println!("{}: {} stations", square, group.len());
//! }
//! println!("{:?}", StationSummary::from_stations(&stations));
//! ```
//!

pub mod api;
pub mod core;
pub mod util;

pub use api::{
    CoordinateSource, CsvLocatorConfig, CsvToLocator, GeometryFormat, GridCell,
    GridCellsToArrow, GridCellsToGeoParquet, LocatorGrid, LocatorGridBuilder, PowerSource,
    RadioInfo, Station, StationRecord, StationStatus, StationStore, StationSummary,
    csv_to_locator_csv, group_by_locator, load_stations_json, save_stations_json, station_cells,
    stations_from_json, write_geoparquet,
};
pub use core::{
    DEFAULT_PRECISION, FIELD_COUNT, FIELD_SIZE, MAX_GRID_CELLS, Precision, SQUARE_COUNT,
    SQUARE_SIZE, SUBSQUARE_COUNT, SUBSQUARE_SIZE, WORLD_EXTENT, cell_bounds, cell_center,
    create_cell_polygon, decode_locator, encode_locator, indices_to_locator, locator_to_indices,
    normalize_locator, point_to_indices,
};
pub use util::{Coordinate, MaidenheadError, parse_geometry, parse_position, validate_wgs84};

pub use geo_types;
pub use geoarrow_array;
pub use geoarrow_schema;
pub use geoparquet;

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{Rect, coord, point};

    #[test]
    fn test_end_to_end_workflow() -> Result<(), MaidenheadError> {
        let grid = LocatorGrid::builder()
            .precision(Precision::Subsquare)
            .extent(-0.2, 51.4, 0.2, 51.6)
            .build()?;

        assert!(!grid.is_empty());
        assert_eq!(grid.precision(), Precision::Subsquare);

        let pt = point! { x: -0.0015, y: 51.4778 };
        let cell = grid.get_cell_at(&pt);
        assert!(cell.is_some());

        if let Some(cell) = cell {
            assert_eq!(cell.id, encode_locator(pt.y(), pt.x(), DEFAULT_PRECISION));

            let (precision, bounds) = decode_locator(&cell.id)?;
            assert_eq!(precision, Precision::Subsquare);
            assert!(cell.contains(&pt));
            assert_eq!(bounds, cell.bounds());

            let polygon = cell.to_polygon();
            assert_eq!(polygon.exterior().coords().count(), 5);
        }
        Ok(())
    }

    #[test]
    fn test_using_geo_types_macros() {
        let rect = Rect::new(coord! { x: -10.0, y: 35.0 }, coord! { x: 30.0, y: 60.0 });
        let grid = LocatorGrid::from_rect(&rect, Precision::Field);
        // Europe: fields I..K by M..P
        assert_eq!(grid.len(), 12);
        assert!(grid.get_cell("JN").is_some());
    }

    #[test]
    fn test_prefix_consistency_over_a_sweep() {
        let mut lat = -89.5;
        while lat < 90.0 {
            let mut lon = -179.3;
            while lon < 180.0 {
                let full = encode_locator(lat, lon, 6);
                assert_eq!(full.len(), 6);
                assert_eq!(encode_locator(lat, lon, 2), &full[..2]);
                assert_eq!(encode_locator(lat, lon, 4), &full[..4]);
                lon += 7.7;
            }
            lat += 3.3;
        }
    }

    #[test]
    fn test_round_trip_within_cell() -> Result<(), MaidenheadError> {
        let samples = [
            (41.714775, -72.72726),
            (-33.8568, 151.2153),
            (64.1466, -21.9426),
            (-54.8019, -68.303),
        ];
        for (lat, lon) in samples {
            let locator = encode_locator(lat, lon, 6);
            let cell = GridCell::from_locator(&locator)?;

            assert!(cell.contains(&(lon, lat)));
            assert!((cell.lon() - lon).abs() <= 2.5 / 60.0 + 1e-9);
            assert!((cell.lat() - lat).abs() <= 1.25 / 60.0 + 1e-9);
        }
        Ok(())
    }

    #[test]
    fn test_grid_iteration() {
        let grid = LocatorGrid::from_extent(-5.0, 50.0, 2.0, 55.0, Precision::Square);

        let mut count = 0;
        for cell in grid.iter() {
            assert_eq!(cell.precision, Precision::Square);
            assert_eq!(cell.id.len(), 4);
            count += 1;
        }

        assert_eq!(count, grid.len());
    }

    #[test]
    fn test_cell_consistency_with_grid() -> Result<(), MaidenheadError> {
        let direct = GridCell::from_lat_lon(51.4778, -0.0015, Precision::Square)?;

        let grid = LocatorGrid::from_extent(-5.0, 50.0, 2.0, 55.0, Precision::Square);
        let from_grid = grid.get_cell_at(&(-0.0015, 51.4778));

        assert_eq!(from_grid, Some(&direct));
        Ok(())
    }
}
