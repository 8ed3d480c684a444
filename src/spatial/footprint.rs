//! Building footprints on the tile grid

use crate::city::building::BuildingKind;
use crate::core::types::{Rotation, TileCoord};
use crate::spatial::grid::TileMap;

/// Footprint dimensions after rotation (width along x, depth along z)
pub fn rotated_size(kind: BuildingKind, rotation: Rotation) -> (i32, i32) {
    let (width, depth) = kind.size();
    if rotation.is_quarter_turn() {
        (depth, width)
    } else {
        (width, depth)
    }
}

/// Tiles covered by a building anchored at `anchor`
///
/// The footprint grows toward +x and +z from the anchor. Tiles that fall
/// outside the map are dropped.
pub fn footprint<M: TileMap>(
    map: &M,
    kind: BuildingKind,
    anchor: TileCoord,
    rotation: Rotation,
) -> Vec<TileCoord> {
    let (width, depth) = rotated_size(kind, rotation);
    let mut tiles = Vec::with_capacity((width * depth) as usize);
    for dz in 0..depth {
        for dx in 0..width {
            let tile = anchor.offset(dx, dz);
            if map.contains(tile) {
                tiles.push(tile);
            }
        }
    }
    tiles
}
