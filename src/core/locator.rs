use crate::core::constants::{
    FIELD_COUNT, FIELD_SIZE, LAT_OFFSET, LON_OFFSET, SQUARE_COUNT, SQUARE_SIZE, SUBSQUARE_COUNT,
    SUBSQUARE_SIZE,
};
use crate::core::precision::Precision;
use crate::util::error::MaidenheadError;

/// Encodes a WGS84 latitude/longitude as a Maidenhead locator.
///
/// `precision` is the requested length in characters. Values up to 2 give
/// the field (`"JJ"`), up to 4 add the square (`"JJ00"`), anything else gives
/// the full subsquare (`"JJ00aa"`).
///
/// # Process
///
/// 1. Shifts latitude by +90 and longitude by +180 so both are non-negative
/// 2. Field: one letter per 20° of longitude and 10° of latitude
/// 3. Square: remainder within the field, one digit per 2° / 1°
/// 4. Subsquare: remainder within the square, one letter per 5' / 2.5'
///
/// The function never fails. Latitude is clamped to -90..=90 and longitude
/// to -180..=180, the north pole and the eastern antimeridian fall in the
/// last cell (`..R..9..x`), and every index is capped to its alphabet.
/// Non-finite input encodes as the first cell.
///
/// # Example
/// ```
/// use maidenhead_rs::encode_locator;
///
/// assert_eq!(encode_locator(0.0, 0.0, 6), "JJ00aa");
/// assert_eq!(encode_locator(51.4778, -0.0015, 4), "IO91");
/// assert_eq!(encode_locator(51.4778, -0.0015, 2), "IO");
/// ```
pub fn encode_locator(latitude: f64, longitude: f64, precision: u8) -> String {
    let precision = Precision::from_chars(precision);
    let mut adj_lat = shift(latitude, LAT_OFFSET, SUBSQUARE_SIZE[1]);
    let mut adj_lon = shift(longitude, LON_OFFSET, SUBSQUARE_SIZE[0]);

    let mut locator = String::with_capacity(precision.chars());

    locator.push(letter(b'A', index(adj_lon / FIELD_SIZE[0], FIELD_COUNT)));
    locator.push(letter(b'A', index(adj_lat / FIELD_SIZE[1], FIELD_COUNT)));
    if precision == Precision::Field {
        return locator;
    }

    adj_lon %= FIELD_SIZE[0];
    adj_lat %= FIELD_SIZE[1];
    locator.push(digit(index(adj_lon / SQUARE_SIZE[0], SQUARE_COUNT)));
    locator.push(digit(index(adj_lat / SQUARE_SIZE[1], SQUARE_COUNT)));
    if precision == Precision::Square {
        return locator;
    }

    adj_lon %= SQUARE_SIZE[0];
    adj_lat %= SQUARE_SIZE[1];
    locator.push(letter(b'a', index(adj_lon * 12.0, SUBSQUARE_COUNT)));
    locator.push(letter(b'a', index(adj_lat * 24.0, SUBSQUARE_COUNT)));

    locator
}

/// Clamps to `-offset..=offset` and shifts to `0..2 * offset`.
///
/// The far edge (90° N, 180° E) belongs to the last subsquare, so it is moved
/// half a subsquare inward before the remainders are taken.
fn shift(value: f64, offset: f64, subsquare: f64) -> f64 {
    let adjusted = value.clamp(-offset, offset) + offset;
    if adjusted >= 2.0 * offset {
        2.0 * offset - subsquare / 2.0
    } else {
        adjusted
    }
}

/// Floors a cell position and caps it to `0..count`.
fn index(position: f64, count: u32) -> u32 {
    // f64::max drops NaN, and the float-to-int cast saturates
    (position.floor().max(0.0) as u32).min(count - 1)
}

fn letter(base: u8, idx: u32) -> char {
    (base + idx as u8) as char
}

fn digit(idx: u32) -> char {
    (b'0' + idx as u8) as char
}

/// Parses a locator into global `(col, row)` cell indices and its precision.
///
/// Columns count eastward from -180°, rows northward from -90°, at the
/// locator's own precision. Letters are accepted in either case.
///
/// # Example
/// ```
/// use maidenhead_rs::{locator_to_indices, Precision};
///
/// # fn main() -> Result<(), maidenhead_rs::MaidenheadError> {
/// let (col, row, precision) = locator_to_indices("JJ00")?;
/// assert_eq!((col, row, precision), (90, 90, Precision::Square));
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// - [`MaidenheadError::InvalidLocatorLength`] - Not 2, 4 or 6 characters
/// - [`MaidenheadError::InvalidLocatorCharacter`] - A character outside `A-R`,
///   `0-9` or `a-x` for its position
pub fn locator_to_indices(locator: &str) -> Result<(i64, i64, Precision), MaidenheadError> {
    let chars: Vec<char> = locator.trim().chars().collect();
    let precision = match chars.len() {
        2 => Precision::Field,
        4 => Precision::Square,
        6 => Precision::Subsquare,
        n => return Err(MaidenheadError::InvalidLocatorLength(n)),
    };

    let mut col = parse_letter(chars[0], 0, FIELD_COUNT)? as i64;
    let mut row = parse_letter(chars[1], 1, FIELD_COUNT)? as i64;

    if precision >= Precision::Square {
        col = col * SQUARE_COUNT as i64 + parse_digit(chars[2], 2)? as i64;
        row = row * SQUARE_COUNT as i64 + parse_digit(chars[3], 3)? as i64;
    }

    if precision == Precision::Subsquare {
        col = col * SUBSQUARE_COUNT as i64 + parse_letter(chars[4], 4, SUBSQUARE_COUNT)? as i64;
        row = row * SUBSQUARE_COUNT as i64 + parse_letter(chars[5], 5, SUBSQUARE_COUNT)? as i64;
    }

    Ok((col, row, precision))
}

fn parse_letter(c: char, position: usize, count: u32) -> Result<u32, MaidenheadError> {
    let upper = c.to_ascii_uppercase();
    if upper.is_ascii_uppercase() && (upper as u32 - 'A' as u32) < count {
        Ok(upper as u32 - 'A' as u32)
    } else {
        Err(MaidenheadError::InvalidLocatorCharacter { position, found: c })
    }
}

fn parse_digit(c: char, position: usize) -> Result<u32, MaidenheadError> {
    c.to_digit(10)
        .ok_or(MaidenheadError::InvalidLocatorCharacter { position, found: c })
}

/// Builds the locator for global `(col, row)` cell indices.
///
/// Inverse of [`locator_to_indices`]; the result uses upper-case field
/// letters and lower-case subsquare letters.
///
/// # Errors
///
/// - [`MaidenheadError::InvalidCellIndex`] - Index outside the grid at this precision
pub fn indices_to_locator(
    col: i64,
    row: i64,
    precision: Precision,
) -> Result<String, MaidenheadError> {
    if col < 0 || row < 0 || col >= precision.columns() || row >= precision.rows() {
        return Err(MaidenheadError::InvalidCellIndex { col, row });
    }

    let squares = SQUARE_COUNT as i64;
    let subsquares = SUBSQUARE_COUNT as i64;

    let (field_col, field_row, square_col, square_row, sub_col, sub_row) = match precision {
        Precision::Field => (col, row, 0, 0, 0, 0),
        Precision::Square => (col / squares, row / squares, col % squares, row % squares, 0, 0),
        Precision::Subsquare => {
            let (sq_col, sq_row) = (col / subsquares, row / subsquares);
            (
                sq_col / squares,
                sq_row / squares,
                sq_col % squares,
                sq_row % squares,
                col % subsquares,
                row % subsquares,
            )
        }
    };

    let mut locator = String::with_capacity(precision.chars());
    locator.push(letter(b'A', field_col as u32));
    locator.push(letter(b'A', field_row as u32));
    if precision >= Precision::Square {
        locator.push(digit(square_col as u32));
        locator.push(digit(square_row as u32));
    }
    if precision == Precision::Subsquare {
        locator.push(letter(b'a', sub_col as u32));
        locator.push(letter(b'a', sub_row as u32));
    }

    Ok(locator)
}

/// Validates a locator and returns it in canonical case (`io91XL` -> `IO91xl`).
pub fn normalize_locator(locator: &str) -> Result<String, MaidenheadError> {
    let (col, row, precision) = locator_to_indices(locator)?;
    indices_to_locator(col, row, precision)
}
