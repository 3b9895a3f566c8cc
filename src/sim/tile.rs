//! Tile codes and the (possibly jagged) tile grid

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::geometry::Rect;
use crate::consts::SCALE;

/// Raised when an integer is not one of the defined tile codes
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("undefined tile code {0}")]
pub struct TileError(pub i64);

/// One grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Tile {
    #[default]
    Air,
    Wall,
    Spawn,
    Finish,
    WhiteWool,
    RedWool,
    YellowWool,
}

impl Tile {
    pub fn code(self) -> i64 {
        match self {
            Tile::Air => 0,
            Tile::Wall => 1,
            Tile::Spawn => 5,
            Tile::Finish => 6,
            Tile::WhiteWool => 10,
            Tile::RedWool => 11,
            Tile::YellowWool => 12,
        }
    }

    /// Stops bullets, rays and movement
    pub fn is_solid(self) -> bool {
        matches!(self, Tile::Wall | Tile::WhiteWool | Tile::RedWool | Tile::YellowWool)
    }

    pub fn is_wool(self) -> bool {
        matches!(self, Tile::WhiteWool | Tile::RedWool | Tile::YellowWool)
    }
}

impl TryFrom<i64> for Tile {
    type Error = TileError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Tile::Air),
            1 => Ok(Tile::Wall),
            5 => Ok(Tile::Spawn),
            6 => Ok(Tile::Finish),
            10 => Ok(Tile::WhiteWool),
            11 => Ok(Tile::RedWool),
            12 => Ok(Tile::YellowWool),
            other => Err(TileError(other)),
        }
    }
}

impl From<Tile> for i64 {
    fn from(tile: Tile) -> Self {
        tile.code()
    }
}

/// Row-major tile storage; rows may have different lengths
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileGrid {
    rows: Vec<Vec<Tile>>,
}

impl TileGrid {
    pub fn new(rows: Vec<Vec<Tile>>) -> Self {
        Self { rows }
    }

    pub fn from_codes(codes: &[Vec<i64>]) -> Result<Self, TileError> {
        let rows = codes
            .iter()
            .map(|row| row.iter().map(|&c| Tile::try_from(c)).collect())
            .collect::<Result<Vec<Vec<Tile>>, _>>()?;
        Ok(Self { rows })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|r| r.is_empty())
    }

    /// Bounds-checked lookup; `None` is the "no tile" sentinel
    pub fn get(&self, col: i64, row: i64) -> Option<Tile> {
        if col < 0 || row < 0 {
            return None;
        }
        self.rows.get(row as usize)?.get(col as usize).copied()
    }

    /// Write a tile; returns false when (col, row) lies outside the grid
    pub fn set(&mut self, col: i64, row: i64, tile: Tile) -> bool {
        if col < 0 || row < 0 {
            return false;
        }
        match self
            .rows
            .get_mut(row as usize)
            .and_then(|r| r.get_mut(col as usize))
        {
            Some(cell) => {
                *cell = tile;
                true
            }
            None => false,
        }
    }

    /// Cells in row-major order as (col, row, tile)
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Tile)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(row, tiles)| tiles.iter().enumerate().map(move |(col, &t)| (col, row, t)))
    }

    /// First cell holding `tile`, row-major
    pub fn find(&self, tile: Tile) -> Option<(usize, usize)> {
        self.cells()
            .find(|&(_, _, t)| t == tile)
            .map(|(col, row, _)| (col, row))
    }

    /// World-space rectangle covered by a cell
    pub fn cell_rect(col: usize, row: usize) -> Rect {
        Rect::new(
            Vec2::new(col as f32 * SCALE, row as f32 * SCALE),
            Vec2::splat(SCALE),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_roundtrip_and_reject_unknown() {
        assert_eq!(Tile::try_from(11), Ok(Tile::RedWool));
        assert_eq!(Tile::try_from(3), Err(TileError(3)));
        assert_eq!(Tile::YellowWool.code(), 12);
    }

    #[test]
    fn test_jagged_lookup_is_bounds_checked() {
        let grid = TileGrid::from_codes(&[vec![1, 1, 1], vec![1, 0, 0, 6, 1]]).unwrap();
        assert_eq!(grid.get(4, 1), Some(Tile::Wall));
        assert_eq!(grid.get(4, 0), None);
        assert_eq!(grid.get(-1, 0), None);
        assert_eq!(grid.get(0, 9), None);
        assert_eq!(grid.find(Tile::Finish), Some((3, 1)));
    }

    #[test]
    fn test_set_outside_grid_is_rejected() {
        let mut grid = TileGrid::from_codes(&[vec![0, 0]]).unwrap();
        assert!(grid.set(1, 0, Tile::WhiteWool));
        assert!(!grid.set(2, 0, Tile::WhiteWool));
        assert_eq!(grid.get(1, 0), Some(Tile::WhiteWool));
    }

    #[test]
    fn test_deserialize_rejects_undefined_codes() {
        let grid: TileGrid = serde_json::from_str("[[1, 0], [10]]").unwrap();
        assert_eq!(grid.get(0, 1), Some(Tile::WhiteWool));
        assert!(serde_json::from_str::<TileGrid>("[[1, 7]]").is_err());
    }
}
