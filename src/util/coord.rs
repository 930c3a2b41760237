use crate::core::constants::WORLD_EXTENT;
use crate::util::error::MaidenheadError;
use geo_types::{Coord, Point};

/// Trait for types that can provide x/y coordinates.
///
/// Implemented for `(f64, f64)` tuples, `geo_types::Point<f64>` and
/// `geo_types::Coord<f64>`, with x as longitude and y as latitude.
pub trait Coordinate {
    /// Returns the x-coordinate (longitude).
    fn x(&self) -> f64;
    /// Returns the y-coordinate (latitude).
    fn y(&self) -> f64;
}

impl Coordinate for (f64, f64) {
    fn x(&self) -> f64 {
        self.0
    }
    fn y(&self) -> f64 {
        self.1
    }
}

impl Coordinate for Point<f64> {
    fn x(&self) -> f64 {
        Point::x(*self)
    }
    fn y(&self) -> f64 {
        Point::y(*self)
    }
}

impl Coordinate for Coord<f64> {
    fn x(&self) -> f64 {
        self.x
    }
    fn y(&self) -> f64 {
        self.y
    }
}

/// Checks that a lon/lat pair is finite and on the globe.
pub fn validate_wgs84<C: Coordinate>(coord: &C) -> Result<(), MaidenheadError> {
    let (lon, lat) = (coord.x(), coord.y());
    if !lat.is_finite() || lat < WORLD_EXTENT[1] || lat > WORLD_EXTENT[3] {
        return Err(MaidenheadError::InvalidLatitude(lat));
    }
    if !lon.is_finite() || lon < WORLD_EXTENT[0] || lon > WORLD_EXTENT[2] {
        return Err(MaidenheadError::InvalidLongitude(lon));
    }
    Ok(())
}
