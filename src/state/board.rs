//! Board geometry.
//!
//! The board is an N×N grid centered on the origin. For the standard 11×11
//! board both axes run over `[-5, 5]`. Tiles are generated once and never
//! change; they are lookup targets only and never own a piece.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::SetupError;

/// Standard board size.
pub const DEFAULT_BOARD_SIZE: u32 = 11;

/// Largest accepted board edge.
pub const MAX_BOARD_SIZE: u32 = 101;

/// Render offset of pieces sitting on a tile.
pub const TILE_Z: f32 = 0.06;

/// Render offset of leaders.
pub const LEADER_BASE_Z: f32 = 0.1;

/// Integer board coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring coordinate one step in `dir`.
    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Self::new(self.x + dx, self.y + dy)
    }

    /// The four orthogonally adjacent coordinates (N, S, E, W).
    pub fn cardinal_neighbors(self) -> [Coord; 4] {
        [
            self.step(Direction::Up),
            self.step(Direction::Down),
            self.step(Direction::Right),
            self.step(Direction::Left),
        ]
    }

    /// Every coordinate within Chebyshev distance `radius`, excluding `self`.
    pub fn chebyshev_ring(self, radius: i32) -> impl Iterator<Item = Coord> {
        (-radius..=radius).flat_map(move |dx| {
            (-radius..=radius)
                .filter(move |&dy| dx != 0 || dy != 0)
                .map(move |dy| Coord::new(self.x + dx, self.y + dy))
        })
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A piece or tile position. `z` is a rendering offset and carries no rules.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: f32,
}

impl Position {
    pub const fn new(x: i32, y: i32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub const fn at(coord: Coord, z: f32) -> Self {
        Self::new(coord.x, coord.y, z)
    }

    pub const fn coord(&self) -> Coord {
        Coord::new(self.x, self.y)
    }

    /// Same height, different cell.
    pub const fn moved_to(self, coord: Coord) -> Self {
        Self::at(coord, self.z)
    }
}

/// Cursor and movement directions. `Up` is +y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, 1),
            Self::Down => (0, -1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

/// Terrain kinds a tile can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Terrain {
    Sogen,
    Yami,
    Labyrinth,
    #[default]
    Normal,
    Umi,
    Crush,
    Mountain,
    Wasteland,
    Forest,
    Toon,
}

impl Terrain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sogen => "sogen",
            Self::Yami => "yami",
            Self::Labyrinth => "labyrinth",
            Self::Normal => "normal",
            Self::Umi => "umi",
            Self::Crush => "crush",
            Self::Mountain => "mountain",
            Self::Wasteland => "wasteland",
            Self::Forest => "forest",
            Self::Toon => "toon",
        }
    }
}

/// A single board cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub terrain: Terrain,
    pub position: Position,
}

impl Tile {
    pub fn new(terrain: Terrain, coord: Coord) -> Self {
        Self {
            terrain,
            position: Position::at(coord, 0.0),
        }
    }

    pub fn coord(&self) -> Coord {
        self.position.coord()
    }
}

/// Static board: bounds plus the tile lookup table.
#[derive(Debug, Clone)]
pub struct Board {
    size: u32,
    half: i32,
    tiles: Vec<Tile>,
    index: HashMap<Coord, usize>,
}

impl Board {
    /// Build a board from generated tiles.
    ///
    /// Tiles must lie in bounds and cover each coordinate at most once. A
    /// board with gaps is allowed; [`Board::tile_at`] reports them as missing.
    pub fn new(size: u32, tiles: Vec<Tile>) -> Result<Self, SetupError> {
        let half = half_extent(size)?;
        let mut index = HashMap::with_capacity(tiles.len());

        for (i, tile) in tiles.iter().enumerate() {
            let coord = tile.coord();
            if !within(half, coord) {
                return Err(SetupError::TileOutOfBounds(coord));
            }
            if index.insert(coord, i).is_some() {
                return Err(SetupError::DuplicateTile(coord));
            }
        }

        Ok(Self {
            size,
            half,
            tiles,
            index,
        })
    }

    /// A fully tiled board with a single terrain.
    pub fn uniform(size: u32, terrain: Terrain) -> Result<Self, SetupError> {
        let half = half_extent(size)?;
        let tiles = (-half..=half)
            .flat_map(|x| (-half..=half).map(move |y| Tile::new(terrain, Coord::new(x, y))))
            .collect();
        Self::new(size, tiles)
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Largest absolute coordinate on either axis.
    pub fn half_extent(&self) -> i32 {
        self.half
    }

    pub fn is_in_bounds(&self, coord: Coord) -> bool {
        within(self.half, coord)
    }

    /// Clamp a coordinate onto the board.
    pub fn clamp(&self, coord: Coord) -> Coord {
        Coord::new(
            coord.x.clamp(-self.half, self.half),
            coord.y.clamp(-self.half, self.half),
        )
    }

    pub fn tile_at(&self, coord: Coord) -> Option<&Tile> {
        self.index.get(&coord).map(|&i| &self.tiles[i])
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }
}

fn half_extent(size: u32) -> Result<i32, SetupError> {
    if size == 0 || size % 2 == 0 || size > MAX_BOARD_SIZE {
        return Err(SetupError::InvalidBoardSize(size));
    }
    i32::try_from((size - 1) / 2).map_err(|_| SetupError::InvalidBoardSize(size))
}

fn within(half: i32, coord: Coord) -> bool {
    (-half..=half).contains(&coord.x) && (-half..=half).contains(&coord.y)
}
