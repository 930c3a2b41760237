/// Offset added to latitude so the grid starts at the south pole
pub const LAT_OFFSET: f64 = 90.0;

/// Offset added to longitude so the grid starts at the antimeridian
pub const LON_OFFSET: f64 = 180.0;

/// Fields per axis (letters A-R)
pub const FIELD_COUNT: u32 = 18;

/// Squares per field per axis (digits 0-9)
pub const SQUARE_COUNT: u32 = 10;

/// Subsquares per square per axis (letters a-x)
pub const SUBSQUARE_COUNT: u32 = 24;

/// Field size in degrees [longitude, latitude]
pub const FIELD_SIZE: [f64; 2] = [20.0, 10.0];

/// Square size in degrees [longitude, latitude]
pub const SQUARE_SIZE: [f64; 2] = [2.0, 1.0];

/// Subsquare size in degrees [longitude, latitude], 5' x 2.5'
pub const SUBSQUARE_SIZE: [f64; 2] = [2.0 / 24.0, 1.0 / 24.0];

/// Valid WGS84 extent [min_lon, min_lat, max_lon, max_lat]
pub const WORLD_EXTENT: [f64; 4] = [-180.0, -90.0, 180.0, 90.0];

/// Default locator length
pub const DEFAULT_PRECISION: u8 = 6;

/// Most cells `LocatorGridBuilder` will build unless told otherwise.
/// The whole globe at subsquare precision is 4320 x 4320 cells.
pub const MAX_GRID_CELLS: usize = 1_000_000;
