pub mod constants;
pub mod geometry;
pub mod grid;
pub mod locator;
pub mod precision;

pub use constants::{
    DEFAULT_PRECISION, FIELD_COUNT, FIELD_SIZE, MAX_GRID_CELLS, SQUARE_COUNT, SQUARE_SIZE,
    SUBSQUARE_COUNT, SUBSQUARE_SIZE, WORLD_EXTENT,
};
pub use geometry::create_cell_polygon;
pub use grid::{cell_bounds, cell_center, decode_locator, point_to_indices};
pub use locator::{encode_locator, indices_to_locator, locator_to_indices, normalize_locator};
pub use precision::Precision;
