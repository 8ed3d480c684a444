//! Spatial host: tile grid, roads, occupancy and footprints

pub mod footprint;
pub mod grid;

pub use footprint::{footprint, rotated_size};
pub use grid::{Grid, TileContent, TileGrid, TileMap};
