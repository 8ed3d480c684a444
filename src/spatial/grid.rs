//! Tile grid: the reference spatial host for the rule engine

use serde::{Deserialize, Serialize};

use crate::core::error::{CityError, Result};
use crate::core::types::{BuildingId, TileCoord};

/// Generic dense 2D grid addressed by tile coordinates
#[derive(Debug, Clone)]
pub struct Grid<T: Clone + Default> {
    pub width: i32,
    pub height: i32,
    data: Vec<T>,
}

impl<T: Clone + Default> Grid<T> {
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            data: vec![T::default(); (width * height) as usize],
        }
    }

    #[inline]
    pub fn in_bounds(&self, tile: TileCoord) -> bool {
        tile.x >= 0 && tile.z >= 0 && tile.x < self.width && tile.z < self.height
    }

    #[inline]
    fn index(&self, tile: TileCoord) -> Option<usize> {
        if self.in_bounds(tile) {
            Some((tile.z * self.width + tile.x) as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get(&self, tile: TileCoord) -> Option<&T> {
        self.index(tile).map(|i| &self.data[i])
    }

    #[inline]
    pub fn get_mut(&mut self, tile: TileCoord) -> Option<&mut T> {
        self.index(tile).map(move |i| &mut self.data[i])
    }

    #[inline]
    pub fn set(&mut self, tile: TileCoord, value: T) {
        if let Some(i) = self.index(tile) {
            self.data[i] = value;
        }
    }

    /// All coordinates, row by row
    pub fn coords(&self) -> impl Iterator<Item = TileCoord> + '_ {
        (0..self.height).flat_map(move |z| (0..self.width).map(move |x| TileCoord::new(x, z)))
    }

    pub fn fill(&mut self, value: T) {
        for cell in self.data.iter_mut() {
            *cell = value.clone();
        }
    }
}

/// Capability the coverage engine needs from the spatial host
pub trait TileMap {
    /// Whether the tile exists in the current grid
    fn contains(&self, tile: TileCoord) -> bool;

    /// Whether the tile currently carries a road
    fn is_road(&self, tile: TileCoord) -> bool;

    /// Enumerate every tile of the grid
    fn tiles(&self) -> Vec<TileCoord>;
}

/// What sits on a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TileContent {
    #[default]
    Empty,
    Road,
    Building(BuildingId),
}

/// Square city grid with a road layer and building markers
#[derive(Debug, Clone)]
pub struct TileGrid {
    cells: Grid<TileContent>,
}

impl TileGrid {
    pub fn new(size: i32) -> Self {
        Self {
            cells: Grid::new(size, size),
        }
    }

    pub fn size(&self) -> i32 {
        self.cells.width
    }

    pub fn content(&self, tile: TileCoord) -> Option<TileContent> {
        self.cells.get(tile).copied()
    }

    /// Building marker on a tile, if any
    pub fn occupant(&self, tile: TileCoord) -> Option<BuildingId> {
        match self.cells.get(tile) {
            Some(TileContent::Building(id)) => Some(*id),
            _ => None,
        }
    }

    pub fn road_tiles(&self) -> Vec<TileCoord> {
        self.cells
            .coords()
            .filter(|t| self.cells.get(*t) == Some(&TileContent::Road))
            .collect()
    }

    /// Verify every tile exists and is free of roads and buildings
    pub fn check_placement(&self, tiles: &[TileCoord]) -> Result<()> {
        if tiles.is_empty() {
            return Err(CityError::EmptyPlacement);
        }
        for tile in tiles {
            match self.cells.get(*tile) {
                None => {
                    return Err(CityError::PlacementBlocked {
                        tile: *tile,
                        reason: "outside the grid".into(),
                    })
                }
                Some(TileContent::Road) => {
                    return Err(CityError::PlacementBlocked {
                        tile: *tile,
                        reason: "road tile".into(),
                    })
                }
                Some(TileContent::Building(id)) => {
                    return Err(CityError::PlacementBlocked {
                        tile: *tile,
                        reason: format!("occupied by {}", id.short()),
                    })
                }
                Some(TileContent::Empty) => {}
            }
        }
        Ok(())
    }

    /// Attach a building marker to each tile
    pub fn occupy(&mut self, tiles: &[TileCoord], id: BuildingId) {
        for tile in tiles {
            self.cells.set(*tile, TileContent::Building(id));
        }
    }

    /// Detach every marker of a building, returns the freed tiles
    pub fn release(&mut self, id: BuildingId) -> Vec<TileCoord> {
        let freed: Vec<TileCoord> = self
            .cells
            .coords()
            .filter(|t| self.cells.get(*t) == Some(&TileContent::Building(id)))
            .collect();
        for tile in &freed {
            self.cells.set(*tile, TileContent::Empty);
        }
        freed
    }

    /// Lay a road on an empty tile; returns false if it already was a road
    pub fn place_road(&mut self, tile: TileCoord) -> Result<bool> {
        match self.cells.get(tile) {
            None => Err(CityError::PlacementBlocked {
                tile,
                reason: "outside the grid".into(),
            }),
            Some(TileContent::Building(id)) => Err(CityError::PlacementBlocked {
                tile,
                reason: format!("occupied by {}", id.short()),
            }),
            Some(TileContent::Road) => Ok(false),
            Some(TileContent::Empty) => {
                self.cells.set(tile, TileContent::Road);
                Ok(true)
            }
        }
    }

    /// Remove a road; returns false if there was none
    pub fn remove_road(&mut self, tile: TileCoord) -> bool {
        if self.cells.get(tile) == Some(&TileContent::Road) {
            self.cells.set(tile, TileContent::Empty);
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(TileContent::Empty);
    }
}

impl TileMap for TileGrid {
    fn contains(&self, tile: TileCoord) -> bool {
        self.cells.in_bounds(tile)
    }

    fn is_road(&self, tile: TileCoord) -> bool {
        self.cells.get(tile) == Some(&TileContent::Road)
    }

    fn tiles(&self) -> Vec<TileCoord> {
        self.cells.coords().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_bounds() {
        let mut grid: Grid<u8> = Grid::new(3, 2);
        assert!(grid.in_bounds(TileCoord::new(2, 1)));
        assert!(!grid.in_bounds(TileCoord::new(3, 0)));
        assert!(!grid.in_bounds(TileCoord::new(-1, 0)));

        grid.set(TileCoord::new(1, 1), 7);
        assert_eq!(grid.get(TileCoord::new(1, 1)), Some(&7));
        assert_eq!(grid.get(TileCoord::new(0, 2)), None);
        assert_eq!(grid.coords().count(), 6);
    }

    #[test]
    fn test_tile_grid_enumerates_all_tiles() {
        let grid = TileGrid::new(25);
        assert_eq!(grid.tiles().len(), 625);
        assert!(grid.contains(TileCoord::new(24, 24)));
        assert!(!grid.contains(TileCoord::new(25, 0)));
    }

    #[test]
    fn test_occupy_and_release() {
        let mut grid = TileGrid::new(5);
        let id = BuildingId::new();
        let tiles = [TileCoord::new(1, 1), TileCoord::new(2, 1)];

        assert!(grid.check_placement(&tiles).is_ok());
        grid.occupy(&tiles, id);
        assert_eq!(grid.occupant(TileCoord::new(2, 1)), Some(id));
        assert!(matches!(
            grid.check_placement(&[TileCoord::new(1, 1)]),
            Err(CityError::PlacementBlocked { .. })
        ));

        let freed = grid.release(id);
        assert_eq!(freed.len(), 2);
        assert_eq!(grid.occupant(TileCoord::new(1, 1)), None);
    }

    #[test]
    fn test_placement_rejects_roads_and_bounds() {
        let mut grid = TileGrid::new(5);
        assert!(grid.place_road(TileCoord::new(0, 0)).unwrap());
        assert!(!grid.place_road(TileCoord::new(0, 0)).unwrap());
        assert!(grid.is_road(TileCoord::new(0, 0)));
        assert_eq!(grid.road_tiles(), vec![TileCoord::new(0, 0)]);

        assert!(matches!(
            grid.check_placement(&[TileCoord::new(0, 0)]),
            Err(CityError::PlacementBlocked { .. })
        ));
        assert!(matches!(
            grid.check_placement(&[TileCoord::new(9, 9)]),
            Err(CityError::PlacementBlocked { .. })
        ));
        assert!(matches!(grid.check_placement(&[]), Err(CityError::EmptyPlacement)));

        assert!(grid.remove_road(TileCoord::new(0, 0)));
        assert!(!grid.remove_road(TileCoord::new(0, 0)));
    }

    #[test]
    fn test_road_refused_on_building() {
        let mut grid = TileGrid::new(5);
        grid.occupy(&[TileCoord::new(3, 3)], BuildingId::new());
        assert!(grid.place_road(TileCoord::new(3, 3)).is_err());
        assert!(grid.place_road(TileCoord::new(7, 3)).is_err());
    }

    #[test]
    fn test_clear() {
        let mut grid = TileGrid::new(4);
        grid.place_road(TileCoord::new(1, 0)).unwrap();
        grid.occupy(&[TileCoord::new(2, 2)], BuildingId::new());
        grid.clear();
        assert!(grid.road_tiles().is_empty());
        assert_eq!(grid.occupant(TileCoord::new(2, 2)), None);
    }
}
