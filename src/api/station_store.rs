use crate::api::station::{
    PowerSource, RadioInfo, Station, StationStatus, format_timestamp, now_millis, parse_timestamp,
    stations_from_json,
};
use crate::util::error::MaidenheadError;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// A station row in the remote table's snake_case shape.
///
/// `created_at` is the table's RFC 3339 timestamp. `updated_at` is
/// milliseconds since the Unix epoch, as the dashboard writes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationRecord {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub callsign: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub operator: Option<String>,
    #[serde(default)]
    pub equipment: Option<String>,
    #[serde(default)]
    pub status: StationStatus,
    #[serde(default)]
    pub power_source: Option<PowerSource>,
    #[serde(default)]
    pub frequency: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub antenna: Option<String>,
    #[serde(default)]
    pub location_name: Option<String>,
    #[serde(default)]
    pub operating_hours: Option<String>,
    #[serde(default)]
    pub custom_color: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub radio_info: Option<Vec<RadioInfo>>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
}

impl TryFrom<StationRecord> for Station {
    type Error = MaidenheadError;

    fn try_from(record: StationRecord) -> Result<Self, Self::Error> {
        let created_at = record
            .created_at
            .as_deref()
            .map(parse_timestamp)
            .transpose()?;

        Ok(Station {
            id: record.id,
            callsign: record.callsign,
            lat: record.lat,
            lng: record.lng,
            operator: record.operator,
            equipment: record.equipment,
            status: record.status,
            power_source: record.power_source,
            frequency: record.frequency,
            frequencies: Vec::new(),
            mode: record.mode,
            radio_info: record.radio_info.unwrap_or_default(),
            icon: record.icon,
            antenna: record.antenna,
            location_name: record.location_name,
            operating_hours: record.operating_hours,
            custom_color: record.custom_color,
            notes: record.notes,
            updated_at: record.updated_at,
            created_at,
            user_id: record.user_id,
            user_email: record.user_email,
        })
    }
}

impl TryFrom<&Station> for StationRecord {
    type Error = MaidenheadError;

    /// Legacy `frequencies` are folded into `radio_info`, which is the only
    /// list column the table has.
    fn try_from(station: &Station) -> Result<Self, Self::Error> {
        let mut station = station.clone();
        station.migrate_legacy_radio();

        let created_at = station.created_at.map(format_timestamp).transpose()?;
        let radio_info = (!station.radio_info.is_empty()).then_some(station.radio_info);

        Ok(StationRecord {
            id: station.id,
            callsign: station.callsign,
            lat: station.lat,
            lng: station.lng,
            operator: station.operator,
            equipment: station.equipment,
            status: station.status,
            power_source: station.power_source,
            frequency: station.frequency,
            mode: station.mode,
            antenna: station.antenna,
            location_name: station.location_name,
            operating_hours: station.operating_hours,
            custom_color: station.custom_color,
            notes: station.notes,
            radio_info,
            icon: station.icon,
            updated_at: station.updated_at,
            created_at,
            user_id: station.user_id,
            user_email: station.user_email,
        })
    }
}

/// The local list of stations, newest `updated_at` first.
///
/// Mirrors what the dashboard keeps after fetching from the remote table:
/// adds go to the front, updates restamp `updated_at` and reorder, and
/// removals and per-user clears drop entries in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationStore {
    stations: Vec<Station>,
}

impl StationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the store from stations in any order.
    pub fn from_stations(stations: Vec<Station>) -> Self {
        let mut store = Self { stations };
        store.sort();
        store
    }

    /// Builds the store from remote rows, keeping only `user_id` when set.
    pub fn from_records(
        records: Vec<StationRecord>,
        user_id: Option<&str>,
    ) -> Result<Self, MaidenheadError> {
        let stations = records
            .into_iter()
            .filter(|r| user_id.is_none() || r.user_id.as_deref() == user_id)
            .map(Station::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = stations.len(), user = ?user_id, "loaded station records");
        Ok(Self::from_stations(stations))
    }

    /// Rows to write back to the remote table, in store order.
    pub fn to_records(&self) -> Result<Vec<StationRecord>, MaidenheadError> {
        self.stations.iter().map(StationRecord::try_from).collect()
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Station> {
        self.stations.iter().find(|s| s.id == id)
    }

    /// Adds a station stamped with the current time. The id must be set
    /// and not already held.
    pub fn add(&mut self, mut station: Station) -> Result<&Station, MaidenheadError> {
        if station.id.is_empty() {
            return Err(MaidenheadError::MissingParameter("id"));
        }
        if self.get(&station.id).is_some() {
            return Err(MaidenheadError::DuplicateStation(station.id));
        }
        let id = station.id.clone();
        station.updated_at = now_millis();
        self.stations.insert(0, station);
        self.sort();
        self.held(&id)
    }

    /// Applies `edit` to the station with `id` and restamps it.
    pub fn update<F>(&mut self, id: &str, edit: F) -> Result<&Station, MaidenheadError>
    where
        F: FnOnce(&mut Station),
    {
        let station = self
            .stations
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| MaidenheadError::StationNotFound(id.to_string()))?;

        edit(station);
        station.id = id.to_string();
        station.updated_at = now_millis();

        self.sort();
        self.held(id)
    }

    pub fn remove(&mut self, id: &str) -> Result<Station, MaidenheadError> {
        let idx = self
            .stations
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| MaidenheadError::StationNotFound(id.to_string()))?;
        Ok(self.stations.remove(idx))
    }

    /// Removes every station submitted by `user_id`, returning how many went.
    pub fn clear_user(&mut self, user_id: &str) -> usize {
        let before = self.stations.len();
        self.stations.retain(|s| s.user_id.as_deref() != Some(user_id));
        let removed = before - self.stations.len();

        info!(user = user_id, removed, "cleared stations");
        removed
    }

    pub fn clear(&mut self) {
        self.stations.clear();
    }

    /// Imports a JSON array exported by the dashboard.
    ///
    /// Either key style is accepted. Legacy frequency lists are migrated,
    /// every station is stamped with the current time, and `user_id` is
    /// assigned when given. Ids that are already held are rejected before
    /// anything is added.
    pub fn import_json(
        &mut self,
        json: &str,
        user_id: Option<&str>,
    ) -> Result<usize, MaidenheadError> {
        let mut imported = stations_from_json(json)?;
        let now = now_millis();

        for station in &mut imported {
            if !station.id.is_empty() && self.get(&station.id).is_some() {
                return Err(MaidenheadError::DuplicateStation(station.id.clone()));
            }
            station.migrate_legacy_radio();
            station.updated_at = now;
            if let Some(user) = user_id {
                station.user_id = Some(user.to_string());
            }
        }

        let count = imported.len();
        self.stations.extend(imported);
        self.sort();

        info!(count, "imported stations");
        Ok(count)
    }

    /// The stations as a pretty-printed JSON array, newest first.
    pub fn export_json(&self) -> Result<String, MaidenheadError> {
        serde_json::to_string_pretty(&self.stations)
            .map_err(|e| MaidenheadError::SerializationError(e.to_string()))
    }

    fn sort(&mut self) {
        self.stations.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    }

    fn held(&self, id: &str) -> Result<&Station, MaidenheadError> {
        self.get(id).ok_or_else(|| MaidenheadError::StationNotFound(id.to_string()))
    }
}
