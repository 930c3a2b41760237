/// Error type for maidenhead-rs operations.
#[derive(Debug, PartialEq)]
pub enum MaidenheadError {
    /// Latitude is outside -90..=90 or not finite.
    InvalidLatitude(f64),
    /// Longitude is outside -180..=180 or not finite.
    InvalidLongitude(f64),
    /// The locator is not 2, 4 or 6 characters long.
    InvalidLocatorLength(usize),
    /// A locator character is outside the alphabet for its position.
    InvalidLocatorCharacter { position: usize, found: char },
    /// A global column/row index lies outside the grid at that precision.
    InvalidCellIndex { col: i64, row: i64 },
    /// File I/O or Arrow/Parquet encoding error.
    IoError(String),
    /// CSV parsing or reading error.
    CsvError(String),
    /// Failed to parse geometry from string (GeoJSON or WKT).
    GeometryParseError(String),
    /// Station JSON could not be read or written.
    SerializationError(String),
    /// A builder was finished without a required setting.
    MissingParameter(&'static str),
    /// A grid extent would hold more cells than the builder allows.
    GridTooLarge { cells: usize, limit: usize },
    /// No station with this id is held.
    StationNotFound(String),
    /// A station with this id is already held.
    DuplicateStation(String),
    /// A timestamp field could not be parsed.
    InvalidTimestamp(String),
}

impl std::fmt::Display for MaidenheadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MaidenheadError::InvalidLatitude(v) => write!(f, "Invalid latitude: {}", v),
            MaidenheadError::InvalidLongitude(v) => write!(f, "Invalid longitude: {}", v),
            MaidenheadError::InvalidLocatorLength(n) => {
                write!(f, "Invalid locator length: {} (expected 2, 4 or 6)", n)
            }
            MaidenheadError::InvalidLocatorCharacter { position, found } => {
                write!(f, "Invalid locator character '{}' at position {}", found, position)
            }
            MaidenheadError::InvalidCellIndex { col, row } => {
                write!(f, "Invalid cell index: col {}, row {}", col, row)
            }
            MaidenheadError::IoError(msg) => write!(f, "IO error: {}", msg),
            MaidenheadError::CsvError(msg) => write!(f, "CSV error: {}", msg),
            MaidenheadError::GeometryParseError(msg) => write!(f, "Geometry parse error: {}", msg),
            MaidenheadError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            MaidenheadError::MissingParameter(name) => write!(f, "Missing parameter: {}", name),
            MaidenheadError::GridTooLarge { cells, limit } => {
                write!(f, "Grid too large: {} cells (limit {})", cells, limit)
            }
            MaidenheadError::StationNotFound(id) => write!(f, "Station not found: {}", id),
            MaidenheadError::DuplicateStation(id) => write!(f, "Duplicate station: {}", id),
            MaidenheadError::InvalidTimestamp(msg) => write!(f, "Invalid timestamp: {}", msg),
        }
    }
}

impl std::error::Error for MaidenheadError {}
