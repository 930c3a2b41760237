use crate::core::constants::WORLD_EXTENT;
use crate::core::locator::{encode_locator, locator_to_indices};
use crate::core::precision::Precision;
use crate::util::coord::Coordinate;
use crate::util::error::MaidenheadError;
use geo_types::{Point, Rect, coord};

/// Returns the lon/lat bounds of the cell at global `(col, row)`.
///
/// x is longitude, y is latitude. Indices are not range checked; callers
/// pass indices obtained from a parsed locator or a clamped extent.
pub fn cell_bounds(col: i64, row: i64, precision: Precision) -> Rect<f64> {
    Rect::new(
        coord! { x: lon_edge(col, precision), y: lat_edge(row, precision) },
        coord! { x: lon_edge(col + 1, precision), y: lat_edge(row + 1, precision) },
    )
}

// Cell sizes as degrees = numerator / denominator, so that each edge is one
// integer product and a single rounding (4320 / 12 is exactly 360).
fn lon_edge(col: i64, precision: Precision) -> f64 {
    let (num, den) = match precision {
        Precision::Field => (20, 1),
        Precision::Square => (2, 1),
        Precision::Subsquare => (1, 12),
    };
    WORLD_EXTENT[0] + (col * num) as f64 / den as f64
}

fn lat_edge(row: i64, precision: Precision) -> f64 {
    let (num, den) = match precision {
        Precision::Field => (10, 1),
        Precision::Square => (1, 1),
        Precision::Subsquare => (1, 24),
    };
    WORLD_EXTENT[1] + (row * num) as f64 / den as f64
}

/// Returns the centre point (lon, lat) of the cell at global `(col, row)`.
pub fn cell_center(col: i64, row: i64, precision: Precision) -> Point<f64> {
    cell_bounds(col, row, precision).center().into()
}

/// Decodes a locator to its precision and lon/lat bounds.
///
/// # Example
/// ```
/// use maidenhead_rs::{decode_locator, Precision};
///
/// # fn main() -> Result<(), maidenhead_rs::MaidenheadError> {
/// let (precision, bounds) = decode_locator("JJ00")?;
/// assert_eq!(precision, Precision::Square);
/// assert_eq!(bounds.min().x, 0.0);
/// assert_eq!(bounds.max().y, 1.0);
/// # Ok(())
/// # }
/// ```
pub fn decode_locator(locator: &str) -> Result<(Precision, Rect<f64>), MaidenheadError> {
    let (col, row, precision) = locator_to_indices(locator)?;
    Ok((precision, cell_bounds(col, row, precision)))
}

/// Converts a lon/lat coordinate to global `(col, row)` indices.
///
/// Goes through [`encode_locator`], so the indices always agree with the
/// locator string for the same point.
pub fn point_to_indices<C: Coordinate>(coord: &C, precision: Precision) -> (i64, i64) {
    let locator = encode_locator(coord.y(), coord.x(), precision.chars() as u8);
    match locator_to_indices(&locator) {
        Ok((col, row, _)) => (col, row),
        // encode_locator only emits characters locator_to_indices accepts
        Err(_) => (0, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::point;

    #[test]
    fn test_cell_bounds_field() {
        let bounds = cell_bounds(9, 9, Precision::Field);
        assert_eq!(bounds.min().x, 0.0);
        assert_eq!(bounds.min().y, 0.0);
        assert_eq!(bounds.max().x, 20.0);
        assert_eq!(bounds.max().y, 10.0);
    }

    #[test]
    fn test_decode_subsquare_contains_point() -> Result<(), MaidenheadError> {
        let (lat, lon) = (51.4778, -0.0015);
        let locator = encode_locator(lat, lon, 6);
        let (precision, bounds) = decode_locator(&locator)?;

        assert_eq!(precision, Precision::Subsquare);
        assert!(bounds.min().x <= lon && lon <= bounds.max().x);
        assert!(bounds.min().y <= lat && lat <= bounds.max().y);

        let center = bounds.center();
        assert!((center.x - lon).abs() <= 2.5 / 60.0 + 1e-9);
        assert!((center.y - lat).abs() <= 1.25 / 60.0 + 1e-9);
        Ok(())
    }

    #[test]
    fn test_point_to_indices_matches_locator() -> Result<(), MaidenheadError> {
        let pt = point! { x: 11.6081, y: 48.1464 };
        let (col, row) = point_to_indices(&pt, Precision::Square);
        let (expected_col, expected_row, _) = locator_to_indices("JN58")?;
        assert_eq!((col, row), (expected_col, expected_row));
        Ok(())
    }

    #[test]
    fn test_last_cell_reaches_the_edge() -> Result<(), MaidenheadError> {
        let bounds = cell_bounds(4319, 4319, Precision::Subsquare);
        assert_eq!(bounds.max().x, 180.0);
        assert_eq!(bounds.max().y, 90.0);

        let (_, greenwich) = decode_locator("IO91xl")?;
        assert_eq!(greenwich.max().x, 0.0);
        Ok(())
    }

    #[test]
    fn test_cell_center() {
        let center = cell_center(90, 90, Precision::Square);
        assert!((center.x() - 1.0).abs() < 1e-9);
        assert!((center.y() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_decode_invalid() {
        assert!(decode_locator("ZZ").is_err());
        assert!(decode_locator("JJ0").is_err());
    }
}
