pub mod coord;
pub mod error;
pub mod parse;

pub use coord::{Coordinate, validate_wgs84};
pub use error::MaidenheadError;
pub use parse::{parse_geojson, parse_geometry, parse_position, parse_wkt};
