pub mod cell;
pub mod grid;
pub mod locator_arrow;
pub mod locator_csv;
pub mod locator_parquet;
pub mod station;
pub mod station_store;

pub use cell::GridCell;
pub use grid::{LocatorGrid, LocatorGridBuilder};
pub use locator_arrow::GridCellsToArrow;
pub use locator_csv::{
    CoordinateSource, CsvLocatorConfig, CsvToLocator, GeometryFormat, csv_to_locator_csv,
};
pub use locator_parquet::{GridCellsToGeoParquet, write_geoparquet};
pub use station::{
    PowerSource, RadioInfo, Station, StationStatus, StationSummary, format_timestamp,
    group_by_locator, load_stations_json, now_millis, parse_timestamp, save_stations_json,
    station_cells, stations_from_json,
};
pub use station_store::{StationRecord, StationStore};
