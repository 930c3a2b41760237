use crate::core::constants::{
    FIELD_COUNT, FIELD_SIZE, SQUARE_COUNT, SQUARE_SIZE, SUBSQUARE_COUNT, SUBSQUARE_SIZE,
};

/// Locator precision: how many characters, and therefore how fine a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Precision {
    /// 2 characters, 20° x 10°
    Field,
    /// 4 characters, 2° x 1°
    Square,
    /// 6 characters, 5' x 2.5'
    #[default]
    Subsquare,
}

impl Precision {
    /// Maps a requested character count to a precision.
    ///
    /// Anything up to 2 is a field, up to 4 a square, and everything else
    /// (5, 7, 200...) falls through to the full 6-character subsquare.
    ///
    /// ```
    /// use maidenhead_rs::Precision;
    ///
    /// assert_eq!(Precision::from_chars(2), Precision::Field);
    /// assert_eq!(Precision::from_chars(3), Precision::Square);
    /// assert_eq!(Precision::from_chars(9), Precision::Subsquare);
    /// ```
    pub fn from_chars(chars: u8) -> Self {
        if chars <= 2 {
            Precision::Field
        } else if chars <= 4 {
            Precision::Square
        } else {
            Precision::Subsquare
        }
    }

    /// Number of locator characters at this precision.
    pub fn chars(self) -> usize {
        match self {
            Precision::Field => 2,
            Precision::Square => 4,
            Precision::Subsquare => 6,
        }
    }

    /// Cell width in degrees of longitude.
    pub fn cell_width(self) -> f64 {
        match self {
            Precision::Field => FIELD_SIZE[0],
            Precision::Square => SQUARE_SIZE[0],
            Precision::Subsquare => SUBSQUARE_SIZE[0],
        }
    }

    /// Cell height in degrees of latitude.
    pub fn cell_height(self) -> f64 {
        match self {
            Precision::Field => FIELD_SIZE[1],
            Precision::Square => SQUARE_SIZE[1],
            Precision::Subsquare => SUBSQUARE_SIZE[1],
        }
    }

    /// Number of cells around the globe along one axis.
    ///
    /// The grid is square in cell counts: 18, 180 or 4320 columns and rows.
    pub fn columns(self) -> i64 {
        let fields = FIELD_COUNT as i64;
        match self {
            Precision::Field => fields,
            Precision::Square => fields * SQUARE_COUNT as i64,
            Precision::Subsquare => fields * SQUARE_COUNT as i64 * SUBSQUARE_COUNT as i64,
        }
    }

    pub fn rows(self) -> i64 {
        self.columns()
    }

    pub fn finer(self) -> Option<Self> {
        match self {
            Precision::Field => Some(Precision::Square),
            Precision::Square => Some(Precision::Subsquare),
            Precision::Subsquare => None,
        }
    }

    pub fn coarser(self) -> Option<Self> {
        match self {
            Precision::Field => None,
            Precision::Square => Some(Precision::Field),
            Precision::Subsquare => Some(Precision::Square),
        }
    }
}

impl std::fmt::Display for Precision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Precision::Field => write!(f, "field"),
            Precision::Square => write!(f, "square"),
            Precision::Subsquare => write!(f, "subsquare"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_chars_fallback() {
        assert_eq!(Precision::from_chars(0), Precision::Field);
        assert_eq!(Precision::from_chars(1), Precision::Field);
        assert_eq!(Precision::from_chars(2), Precision::Field);
        assert_eq!(Precision::from_chars(4), Precision::Square);
        assert_eq!(Precision::from_chars(5), Precision::Subsquare);
        assert_eq!(Precision::from_chars(6), Precision::Subsquare);
        assert_eq!(Precision::from_chars(255), Precision::Subsquare);
    }

    #[test]
    fn test_cell_sizes() {
        assert_eq!(Precision::Field.cell_width(), 20.0);
        assert_eq!(Precision::Square.cell_height(), 1.0);
        assert!((Precision::Subsquare.cell_width() * 60.0 - 5.0).abs() < 1e-9);
        assert!((Precision::Subsquare.cell_height() * 60.0 - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_cells_cover_the_globe() {
        for p in [Precision::Field, Precision::Square, Precision::Subsquare] {
            assert!((p.columns() as f64 * p.cell_width() - 360.0).abs() < 1e-6);
            assert!((p.rows() as f64 * p.cell_height() - 180.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_finer_and_coarser() {
        assert_eq!(Precision::Field.finer(), Some(Precision::Square));
        assert_eq!(Precision::Subsquare.finer(), None);
        assert_eq!(Precision::Field.coarser(), None);
        assert_eq!(Precision::default(), Precision::Subsquare);
    }
}
