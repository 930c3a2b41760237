use geo_types::{Coord, LineString, Polygon, Rect};

/// Builds the closed, counter-clockwise ring for a lon/lat cell.
pub fn create_cell_polygon(bounds: &Rect<f64>) -> Polygon<f64> {
    let (min, max) = (bounds.min(), bounds.max());
    let coords = vec![
        Coord { x: min.x, y: min.y },
        Coord { x: max.x, y: min.y },
        Coord { x: max.x, y: max.y },
        Coord { x: min.x, y: max.y },
        Coord { x: min.x, y: min.y },
    ];

    Polygon::new(LineString::from(coords), vec![])
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::coord;

    #[test]
    fn test_create_cell_polygon() {
        let rect = Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 2.0, y: 1.0 });
        let poly = create_cell_polygon(&rect);
        let exterior = poly.exterior();
        assert_eq!(exterior.coords().count(), 5); // 4 corners + 1 to close
        assert_eq!(exterior.0[0], exterior.0[4]);
        assert_eq!(exterior.0[2], coord! { x: 2.0, y: 1.0 });
    }
}
