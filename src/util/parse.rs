use crate::core::grid::decode_locator;
use crate::util::error::MaidenheadError;
use geo_types::{Geometry, GeometryCollection, Point};
use geojson::{Feature, GeoJson};
use std::str::FromStr;
use wkt::Wkt;

/// Parses a location string into a `geo_types::Geometry` in lon/lat.
///
/// Accepted forms, tried in order:
///
/// - GeoJSON (leading `{`), see [`parse_geojson`]
/// - a dashboard position label, `lat, lng` with an optional trailing
///   `(LOCATOR)`, see [`parse_position`]
/// - a bare locator such as `OJ03` or `oj03ud`, taken as its cell centre
/// - WKT
pub fn parse_geometry(s: &str) -> Result<Geometry<f64>, MaidenheadError> {
    let trimmed = s.trim();
    if trimmed.starts_with('{') {
        return parse_geojson(trimmed);
    }
    if let Ok(pt) = parse_position(trimmed) {
        return Ok(Geometry::Point(pt));
    }
    if let Ok((_, bounds)) = decode_locator(trimmed) {
        return Ok(Geometry::Point(bounds.center().into()));
    }
    parse_wkt(trimmed)
}

/// Parses GeoJSON into a `geo_types::Geometry`.
///
/// A Feature without geometry falls back to numeric `lat`/`lng`
/// properties, which is how the station dashboard exports markers. A
/// FeatureCollection becomes a GeometryCollection with one member per
/// feature.
pub fn parse_geojson(s: &str) -> Result<Geometry<f64>, MaidenheadError> {
    let geojson: GeoJson = s
        .parse()
        .map_err(|e: geojson::Error| MaidenheadError::GeometryParseError(e.to_string()))?;

    match geojson {
        GeoJson::Geometry(geom) => Geometry::try_from(geom)
            .map_err(|e| MaidenheadError::GeometryParseError(e.to_string())),
        GeoJson::Feature(feat) => feature_geometry(feat),
        GeoJson::FeatureCollection(fc) => {
            let members = fc
                .features
                .into_iter()
                .map(feature_geometry)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Geometry::GeometryCollection(GeometryCollection::from(members)))
        }
    }
}

fn feature_geometry(mut feat: Feature) -> Result<Geometry<f64>, MaidenheadError> {
    if let Some(geom) = feat.geometry.take() {
        return Geometry::try_from(geom)
            .map_err(|e| MaidenheadError::GeometryParseError(e.to_string()));
    }

    let number = |key: &str| feat.property(key).and_then(|v| v.as_f64());
    match (number("lat"), number("lng")) {
        (Some(lat), Some(lng)) => Ok(Geometry::Point(Point::new(lng, lat))),
        _ => Err(MaidenheadError::GeometryParseError(
            "Feature has neither geometry nor lat/lng properties".to_string(),
        )),
    }
}

/// Parses a `lat, lng` position label into a lon/lat point.
///
/// A trailing parenthesised locator, as written by
/// [`crate::Station::position_label`], is ignored.
///
/// ```
/// use maidenhead_rs::util::parse::parse_position;
///
/// # fn main() -> Result<(), maidenhead_rs::MaidenheadError> {
/// let pt = parse_position("3.1390, 101.6869 (OJ03ud)")?;
/// assert_eq!((pt.x(), pt.y()), (101.6869, 3.139));
/// # Ok(())
/// # }
/// ```
pub fn parse_position(s: &str) -> Result<Point<f64>, MaidenheadError> {
    let coords = match s.find('(') {
        Some(idx) => &s[..idx],
        None => s,
    };
    let invalid = || MaidenheadError::GeometryParseError(format!("Invalid position: '{}'", s));

    let (lat, lng) = coords.split_once(',').ok_or_else(invalid)?;
    let lat: f64 = lat.trim().parse().map_err(|_| invalid())?;
    let lng: f64 = lng.trim().parse().map_err(|_| invalid())?;
    Ok(Point::new(lng, lat))
}

/// Parses a WKT string into a `geo_types::Geometry`.
pub fn parse_wkt(s: &str) -> Result<Geometry<f64>, MaidenheadError> {
    let wkt: Wkt<f64> =
        Wkt::from_str(s).map_err(|e| MaidenheadError::GeometryParseError(e.to_string()))?;

    wkt.try_into().map_err(|_| {
        MaidenheadError::GeometryParseError("Failed to convert WKT to geometry".to_string())
    })
}
