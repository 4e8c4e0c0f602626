//! Core data types for the tile engine.
//!
//! A [`Board`] owns every [`Tile`] of the current level in id order:
//! `tiles[i].id == TileId(i)`. Tiles are never replaced, only their flags
//! change, so the presentation layer can key sprites off the id.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, bail};
use serde::{Deserialize, Serialize};

/// Grid coordinate of a tile: column, row and layer (0 = base).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TilePosition {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl TilePosition {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

/// Stable tile identity. Rendered, and sent to JS, as `tile-N`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct TileId(pub u32);

impl TileId {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tile-{}", self.0)
    }
}

impl FromStr for TileId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n = s
            .strip_prefix("tile-")
            .ok_or_else(|| anyhow!("malformed tile id {:?}", s))?;
        let n = n.parse().map_err(|_| anyhow!("malformed tile id {:?}", s))?;
        Ok(TileId(n))
    }
}

impl From<TileId> for String {
    fn from(id: TileId) -> String {
        id.to_string()
    }
}

impl TryFrom<String> for TileId {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Presentation attributes for a tile suit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TileAttributes {
    pub symbol: &'static str,
    /// 0xRRGGBB
    pub color: u32,
}

/// The closed set of tile suits. Crosses the JS boundary as its index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum TileType {
    Bamboo,
    Dots,
    Characters,
    East,
    South,
    West,
    North,
    Red,
    Green,
    White,
    Plum,
    Orchid,
}

/// Number of distinct tile types available to a level.
pub const TILE_TYPE_COUNT: usize = 12;

const ATTRIBUTES: [TileAttributes; TILE_TYPE_COUNT] = [
    TileAttributes { symbol: "🎋", color: 0x2e8b57 },
    TileAttributes { symbol: "🔵", color: 0x1e6fd9 },
    TileAttributes { symbol: "萬", color: 0xc0392b },
    TileAttributes { symbol: "東", color: 0x34495e },
    TileAttributes { symbol: "南", color: 0x8e44ad },
    TileAttributes { symbol: "西", color: 0xd35400 },
    TileAttributes { symbol: "北", color: 0x16a085 },
    TileAttributes { symbol: "中", color: 0xe74c3c },
    TileAttributes { symbol: "發", color: 0x27ae60 },
    TileAttributes { symbol: "白", color: 0x7f8c8d },
    TileAttributes { symbol: "🌸", color: 0xff6f91 },
    TileAttributes { symbol: "🌺", color: 0xf39c12 },
];

impl TileType {
    pub const ALL: [TileType; TILE_TYPE_COUNT] = [
        TileType::Bamboo,
        TileType::Dots,
        TileType::Characters,
        TileType::East,
        TileType::South,
        TileType::West,
        TileType::North,
        TileType::Red,
        TileType::Green,
        TileType::White,
        TileType::Plum,
        TileType::Orchid,
    ];

    /// Type for `index`, or `None` past the end of the enumeration.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn attributes(self) -> TileAttributes {
        ATTRIBUTES[self.index()]
    }
}

impl From<TileType> for u8 {
    fn from(t: TileType) -> u8 {
        t as u8
    }
}

impl TryFrom<u8> for TileType {
    type Error = anyhow::Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        TileType::from_index(value as usize).ok_or_else(|| anyhow!("unknown tile type {}", value))
    }
}

/// One tile of the current level.
///
/// At any time exactly one of these holds: on board and accessible, on board
/// and blocked, in hand, matched. `is_matched` is terminal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    pub id: TileId,
    #[serde(rename = "type")]
    pub tile_type: TileType,
    pub position: TilePosition,
    pub is_accessible: bool,
    pub is_in_hand: bool,
    pub is_matched: bool,
    /// Presentation only.
    #[serde(default)]
    pub is_selected: bool,
}

impl Tile {
    pub fn new(id: TileId, tile_type: TileType, position: TilePosition) -> Self {
        Self {
            id,
            tile_type,
            position,
            is_accessible: false,
            is_in_hand: false,
            is_matched: false,
            is_selected: false,
        }
    }

    /// Still on the board (neither held nor matched).
    #[inline(always)]
    pub fn is_live(&self) -> bool {
        !self.is_in_hand && !self.is_matched
    }
}

/// All tiles of a level, indexed by id.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Board {
    tiles: Vec<Tile>,
}

impl Board {
    /// Wrap tiles produced by the generator. Ids must equal their index.
    pub(crate) fn from_generated(tiles: Vec<Tile>) -> Self {
        debug_assert!(tiles.iter().enumerate().all(|(i, t)| t.id.index() == i));
        Self { tiles }
    }

    /// Rebuild a board from tiles handed back by the host.
    pub fn from_tiles(mut tiles: Vec<Tile>) -> anyhow::Result<Self> {
        tiles.sort_by_key(|t| t.id);
        for (i, tile) in tiles.iter().enumerate() {
            if tile.id.index() != i {
                bail!("tile ids must be contiguous from tile-0, found {} at {}", tile.id, i);
            }
            if tile.is_matched && tile.is_in_hand {
                bail!("{} is both matched and in hand", tile.id);
            }
        }
        Ok(Self { tiles })
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tiles_mut(&mut self) -> &mut [Tile] {
        &mut self.tiles
    }

    /// Panics on an id this board never issued.
    pub fn tile(&self, id: TileId) -> &Tile {
        match self.tiles.get(id.index()) {
            Some(t) => t,
            None => panic!("{} is not on this board", id),
        }
    }

    /// Panics on an id this board never issued.
    pub fn tile_mut(&mut self, id: TileId) -> &mut Tile {
        match self.tiles.get_mut(id.index()) {
            Some(t) => t,
            None => panic!("{} is not on this board", id),
        }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tiles neither held nor matched, in board order.
    pub fn live_tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.tiles.iter().filter(|t| t.is_live())
    }

    pub fn remaining(&self) -> usize {
        self.live_tiles().count()
    }
}

/// A 2D point in presentation space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// A presentation-space rectangle (top-left origin).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}
