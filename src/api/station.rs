use crate::api::cell::GridCell;
use crate::core::locator::encode_locator;
use crate::core::precision::Precision;
use crate::util::error::MaidenheadError;
use chrono::{DateTime, SecondsFormat, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StationStatus {
    #[default]
    Active,
    Inactive,
    Emergency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerSource {
    Battery,
    Main,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadioInfo {
    pub frequency: String,
    pub mode: String,
}

/// A station marker as held by the exercise dashboard.
///
/// Field names follow the dashboard's camelCase JSON, with `lat`/`lng` in
/// WGS84 degrees. The snake_case column names of the remote table are
/// accepted as aliases, so exports of either shape load without losing
/// fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    #[serde(default)]
    pub id: String,
    pub callsign: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<String>,
    #[serde(default)]
    pub status: StationStatus,
    #[serde(default, alias = "power_source", skip_serializing_if = "Option::is_none")]
    pub power_source: Option<PowerSource>,
    /// Older records carry a single frequency instead of `radio_info`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    /// Older records carry a frequency list sharing one `mode`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub frequencies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(
        default,
        alias = "radio_info",
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub radio_info: Vec<RadioInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub antenna: Option<String>,
    #[serde(default, alias = "location_name", skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    #[serde(default, alias = "operating_hours", skip_serializing_if = "Option::is_none")]
    pub operating_hours: Option<String>,
    #[serde(default, alias = "custom_color", skip_serializing_if = "Option::is_none")]
    pub custom_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Milliseconds since the Unix epoch
    #[serde(default, alias = "updated_at")]
    pub updated_at: i64,
    /// Milliseconds since the Unix epoch. The remote table stores an
    /// RFC 3339 string, which is converted on load.
    #[serde(
        default,
        alias = "created_at",
        deserialize_with = "millis_or_rfc3339",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<i64>,
    #[serde(default, rename = "user_id", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, rename = "user_email", skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Timestamp {
    Millis(i64),
    Text(String),
}

fn millis_or_rfc3339<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Timestamp>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Timestamp::Millis(ms)) => Ok(Some(ms)),
        Some(Timestamp::Text(text)) => parse_timestamp(&text)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<RadioInfo>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<RadioInfo>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parses an RFC 3339 timestamp into milliseconds since the Unix epoch.
pub fn parse_timestamp(text: &str) -> Result<i64, MaidenheadError> {
    DateTime::parse_from_rfc3339(text.trim())
        .map(|dt| dt.timestamp_millis())
        .map_err(|e| MaidenheadError::InvalidTimestamp(format!("'{}': {}", text, e)))
}

/// Formats milliseconds since the Unix epoch as an RFC 3339 UTC timestamp.
pub fn format_timestamp(millis: i64) -> Result<String, MaidenheadError> {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .ok_or_else(|| MaidenheadError::InvalidTimestamp(format!("{} ms out of range", millis)))
}

/// Current time in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

impl Station {
    /// Locator for this station at the given precision.
    ///
    /// Uses the total encoder, so a station with a bad position still gets
    /// a (clamped) locator rather than an error.
    pub fn locator(&self, precision: Precision) -> String {
        encode_locator(self.lat, self.lng, precision.chars() as u8)
    }

    /// The validated grid cell containing this station.
    pub fn cell(&self, precision: Precision) -> Result<GridCell, MaidenheadError> {
        GridCell::from_lat_lon(self.lat, self.lng, precision)
    }

    /// Position as shown next to the marker: the location name if set,
    /// otherwise `lat, lng` to four decimals, followed by the subsquare.
    ///
    /// ```
    /// use maidenhead_rs::Station;
    ///
    /// # fn main() -> Result<(), maidenhead_rs::MaidenheadError> {
    /// let station: Station = serde_json::from_str(
    ///     r#"{"id":"1","callsign":"G0ABC","lat":51.4778,"lng":-0.0015}"#,
    /// ).map_err(|e| maidenhead_rs::MaidenheadError::SerializationError(e.to_string()))?;
    /// assert_eq!(station.position_label(), "51.4778, -0.0015 (IO91xl)");
    /// # Ok(())
    /// # }
    /// ```
    pub fn position_label(&self) -> String {
        let place = match &self.location_name {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => format!("{:.4}, {:.4}", self.lat, self.lng),
        };
        format!("{} ({})", place, self.locator(Precision::Subsquare))
    }

    /// Every frequency the station lists, legacy fields last, without
    /// duplicates.
    pub fn frequencies(&self) -> Vec<&str> {
        let legacy = self.frequencies.iter().chain(self.frequency.iter());
        let mut freqs: Vec<&str> = Vec::new();
        for freq in self.radio_info.iter().map(|r| &r.frequency).chain(legacy) {
            if !freqs.contains(&freq.as_str()) {
                freqs.push(freq);
            }
        }
        freqs
    }

    /// Moves the legacy `frequencies`/`mode` pair into `radio_info` when
    /// the station has no radio entries yet.
    pub fn migrate_legacy_radio(&mut self) {
        if !self.radio_info.is_empty() || self.frequencies.is_empty() {
            return;
        }
        let mode = self.mode.clone().unwrap_or_default();
        self.radio_info = self
            .frequencies
            .drain(..)
            .map(|frequency| RadioInfo {
                frequency,
                mode: mode.clone(),
            })
            .collect();
    }
}

/// Parses a JSON array of stations.
pub fn stations_from_json(json: &str) -> Result<Vec<Station>, MaidenheadError> {
    serde_json::from_str(json).map_err(|e| MaidenheadError::SerializationError(e.to_string()))
}

/// Reads a JSON array of stations from a file.
pub fn load_stations_json(path: impl AsRef<Path>) -> Result<Vec<Station>, MaidenheadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| MaidenheadError::IoError(e.to_string()))?;
    let stations: Vec<Station> = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| MaidenheadError::SerializationError(e.to_string()))?;

    debug!(count = stations.len(), path = %path.display(), "loaded stations");
    Ok(stations)
}

/// Writes stations as a pretty-printed JSON array.
pub fn save_stations_json(
    stations: &[Station],
    path: impl AsRef<Path>,
) -> Result<(), MaidenheadError> {
    let file = File::create(path).map_err(|e| MaidenheadError::IoError(e.to_string()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), stations)
        .map_err(|e| MaidenheadError::SerializationError(e.to_string()))
}

/// Groups stations by locator, ordered by locator.
pub fn group_by_locator(
    stations: &[Station],
    precision: Precision,
) -> BTreeMap<String, Vec<&Station>> {
    let mut groups: BTreeMap<String, Vec<&Station>> = BTreeMap::new();
    for station in stations {
        groups
            .entry(station.locator(precision))
            .or_default()
            .push(station);
    }
    groups
}

/// The distinct cells occupied by stations, ordered by locator.
///
/// Stations with an invalid position are skipped with a warning.
pub fn station_cells(stations: &[Station], precision: Precision) -> Vec<GridCell> {
    let located: Vec<(&Station, Result<GridCell, MaidenheadError>)> = stations
        .par_iter()
        .map(|s| (s, s.cell(precision)))
        .collect();

    let mut cells: BTreeMap<String, GridCell> = BTreeMap::new();
    for (station, result) in located {
        match result {
            Ok(cell) => {
                cells.entry(cell.id.clone()).or_insert(cell);
            }
            Err(e) => warn!(callsign = %station.callsign, error = %e, "skipping station"),
        }
    }
    cells.into_values().collect()
}

/// Station counts for the dashboard header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StationSummary {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub emergency: usize,
    pub on_battery: usize,
    pub on_main: usize,
    /// Distinct 4-character squares with at least one station
    pub squares: usize,
}

impl StationSummary {
    pub fn from_stations(stations: &[Station]) -> Self {
        let mut summary = Self {
            total: stations.len(),
            ..Self::default()
        };
        let mut squares = BTreeSet::new();

        for station in stations {
            match station.status {
                StationStatus::Active => summary.active += 1,
                StationStatus::Inactive => summary.inactive += 1,
                StationStatus::Emergency => summary.emergency += 1,
            }
            match station.power_source {
                Some(PowerSource::Battery) => summary.on_battery += 1,
                Some(PowerSource::Main) => summary.on_main += 1,
                None => {}
            }
            squares.insert(station.locator(Precision::Square));
        }

        summary.squares = squares.len();
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const STATIONS: &str = r#"[
        {
            "id": "a1",
            "callsign": "W1AW",
            "lat": 41.714775,
            "lng": -72.72726,
            "status": "active",
            "powerSource": "main",
            "radioInfo": [{"frequency": "146.520", "mode": "FM"}],
            "locationName": "Newington",
            "updatedAt": 1700000000000
        },
        {
            "id": "b2",
            "callsign": "G0ABC",
            "lat": 51.4778,
            "lng": -0.0015,
            "status": "emergency",
            "powerSource": "battery",
            "frequency": "145.500",
            "updatedAt": 1700000000001
        },
        {
            "id": "c3",
            "callsign": "G4XYZ",
            "lat": 51.49,
            "lng": -0.05,
            "status": "inactive"
        }
    ]"#;

    #[test]
    fn test_stations_from_json() -> Result<(), MaidenheadError> {
        let stations = stations_from_json(STATIONS)?;
        assert_eq!(stations.len(), 3);
        assert_eq!(stations[0].power_source, Some(PowerSource::Main));
        assert_eq!(stations[1].status, StationStatus::Emergency);
        assert_eq!(stations[2].updated_at, 0);
        Ok(())
    }

    #[test]
    fn test_station_locator() -> Result<(), MaidenheadError> {
        let stations = stations_from_json(STATIONS)?;
        assert_eq!(stations[0].locator(Precision::Subsquare), "FN31pr");
        assert_eq!(stations[1].locator(Precision::Square), "IO91");
        assert_eq!(stations[1].cell(Precision::Subsquare)?.id, "IO91xl");
        Ok(())
    }

    #[test]
    fn test_position_label() -> Result<(), MaidenheadError> {
        let stations = stations_from_json(STATIONS)?;
        assert_eq!(stations[0].position_label(), "Newington (FN31pr)");
        assert_eq!(stations[1].position_label(), "51.4778, -0.0015 (IO91xl)");
        Ok(())
    }

    #[test]
    fn test_frequencies() -> Result<(), MaidenheadError> {
        let stations = stations_from_json(STATIONS)?;
        assert_eq!(stations[0].frequencies(), vec!["146.520"]);
        assert_eq!(stations[1].frequencies(), vec!["145.500"]);
        assert!(stations[2].frequencies().is_empty());
        Ok(())
    }

    #[test]
    fn test_group_by_locator() -> Result<(), MaidenheadError> {
        let stations = stations_from_json(STATIONS)?;
        let groups = group_by_locator(&stations, Precision::Square);

        let keys: Vec<&str> = groups.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["FN31", "IO91"]);
        assert_eq!(groups["IO91"].len(), 2);
        Ok(())
    }

    #[test]
    fn test_station_cells_skips_bad_positions() -> Result<(), MaidenheadError> {
        let mut stations = stations_from_json(STATIONS)?;
        stations[2].lat = 123.0;

        let cells = station_cells(&stations, Precision::Square);
        let ids: Vec<&str> = cells.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["FN31", "IO91"]);
        Ok(())
    }

    #[test]
    fn test_summary() -> Result<(), MaidenheadError> {
        let stations = stations_from_json(STATIONS)?;
        let summary = StationSummary::from_stations(&stations);

        assert_eq!(
            summary,
            StationSummary {
                total: 3,
                active: 1,
                inactive: 1,
                emergency: 1,
                on_battery: 1,
                on_main: 1,
                squares: 2,
            }
        );
        Ok(())
    }

    #[test]
    fn test_save_and_load() -> Result<(), MaidenheadError> {
        let stations = stations_from_json(STATIONS)?;
        let dir = tempdir().map_err(|e| MaidenheadError::IoError(e.to_string()))?;
        let path = dir.path().join("stations.json");

        save_stations_json(&stations, &path)?;
        let loaded = load_stations_json(&path)?;
        assert_eq!(loaded, stations);
        Ok(())
    }

    #[test]
    fn test_remote_row_keeps_every_field() -> Result<(), MaidenheadError> {
        let row = r##"[{
            "id": "5b1c",
            "callsign": "9M2PJU",
            "lat": 3.139,
            "lng": 101.6869,
            "status": "active",
            "power_source": "battery",
            "location_name": "Kuala Lumpur",
            "operating_hours": "0800-2000",
            "custom_color": "#ff8800",
            "radio_info": [{"frequency": "145.000", "mode": "FM"}],
            "icon": "antenna",
            "updated_at": 1717236000000,
            "created_at": "2024-06-01T10:00:00.000+00:00",
            "user_id": "u-1",
            "user_email": "op@example.org"
        }]"##;
        let station = &stations_from_json(row)?[0];

        assert_eq!(station.power_source, Some(PowerSource::Battery));
        assert_eq!(station.location_name.as_deref(), Some("Kuala Lumpur"));
        assert_eq!(station.operating_hours.as_deref(), Some("0800-2000"));
        assert_eq!(station.custom_color.as_deref(), Some("#ff8800"));
        assert_eq!(station.radio_info.len(), 1);
        assert_eq!(station.icon.as_deref(), Some("antenna"));
        assert_eq!(station.updated_at, 1717236000000);
        assert_eq!(station.created_at, Some(1717236000000));
        assert_eq!(station.user_id.as_deref(), Some("u-1"));
        assert_eq!(station.user_email.as_deref(), Some("op@example.org"));
        assert_eq!(station.locator(Precision::Subsquare), "OJ03ud");
        Ok(())
    }

    #[test]
    fn test_null_radio_info_and_bad_created_at() -> Result<(), MaidenheadError> {
        let row = r#"[{"callsign":"9W2ABC","lat":5.4141,"lng":100.3288,"radio_info":null}]"#;
        assert!(stations_from_json(row)?[0].radio_info.is_empty());

        let bad = r#"[{"callsign":"9W2ABC","lat":5.4141,"lng":100.3288,"createdAt":"yesterday"}]"#;
        assert!(matches!(
            stations_from_json(bad),
            Err(MaidenheadError::SerializationError(_))
        ));
        Ok(())
    }

    #[test]
    fn test_legacy_frequency_list() -> Result<(), MaidenheadError> {
        let json = r#"[{
            "callsign": "9W2ABC",
            "lat": 5.4141,
            "lng": 100.3288,
            "frequencies": ["7.100", "145.000"],
            "mode": "SSB",
            "frequency": "7.100"
        }]"#;
        let mut station = stations_from_json(json)?.remove(0);
        assert_eq!(station.frequencies(), vec!["7.100", "145.000"]);

        station.migrate_legacy_radio();
        assert!(station.frequencies.is_empty());
        assert_eq!(
            station.radio_info,
            vec![
                RadioInfo {
                    frequency: "7.100".to_string(),
                    mode: "SSB".to_string()
                },
                RadioInfo {
                    frequency: "145.000".to_string(),
                    mode: "SSB".to_string()
                },
            ]
        );
        Ok(())
    }

    #[test]
    fn test_timestamps() -> Result<(), MaidenheadError> {
        assert_eq!(parse_timestamp("1970-01-01T00:00:01Z")?, 1000);
        assert_eq!(parse_timestamp("2024-06-01T18:00:00+08:00")?, 1717236000000);
        assert_eq!(format_timestamp(1717236000000)?, "2024-06-01T10:00:00.000Z");
        assert!(matches!(
            parse_timestamp("not a date"),
            Err(MaidenheadError::InvalidTimestamp(_))
        ));
        Ok(())
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            stations_from_json("[{\"id\":1}]"),
            Err(MaidenheadError::SerializationError(_))
        ));
    }
}
