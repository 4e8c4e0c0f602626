//! The accumulator ("hand"): a fixed row of slots that collects picked tiles
//! and resolves triplets.
//!
//! Held tiles always occupy a contiguous prefix of the slots, sorted by type
//! after every `add`. Slots store copies of id and type; board flags are
//! updated through the `&mut Tile` / `&mut Board` the caller passes in.

use serde::{Deserialize, Serialize};

use crate::config::{HandGeometry, SessionConfig, TILES_PER_TYPE};
use crate::types::{Board, Point, Tile, TileId, TileType};

/// A tile sitting in a hand slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeldTile {
    pub id: TileId,
    #[serde(rename = "type")]
    pub tile_type: TileType,
}

/// Outcome of [`Hand::check_match`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub matched: bool,
    /// The three matched tiles, in slot order. Empty when `matched` is false.
    pub tiles: Vec<TileId>,
    pub score_gained: u32,
}

impl MatchResult {
    pub fn none() -> Self {
        Self { matched: false, tiles: Vec::new(), score_gained: 0 }
    }
}

/// Group tiles by type, keeping the order in which each type was first seen.
pub(crate) fn group_by_type<I>(tiles: I) -> Vec<(TileType, Vec<TileId>)>
where
    I: IntoIterator<Item = (TileId, TileType)>,
{
    let mut groups: Vec<(TileType, Vec<TileId>)> = Vec::new();
    for (id, tile_type) in tiles {
        match groups.iter_mut().find(|(t, _)| *t == tile_type) {
            Some((_, ids)) => ids.push(id),
            None => groups.push((tile_type, vec![id])),
        }
    }
    groups
}

pub struct Hand {
    slots: Vec<Option<HeldTile>>,
    match_score: u32,
    geometry: HandGeometry,
}

impl Hand {
    pub fn new(capacity: usize, match_score: u32) -> Self {
        Self::with_geometry(capacity, match_score, HandGeometry::default())
    }

    pub fn with_geometry(capacity: usize, match_score: u32, geometry: HandGeometry) -> Self {
        Self {
            slots: vec![None; capacity],
            match_score,
            geometry,
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::with_geometry(config.hand_capacity, config.match_score, config.hand_geometry)
    }

    /// Take `tile` off the board into the first free slot, then regroup by type.
    ///
    /// Returns the tile's slot after regrouping, or `None` if the hand is full
    /// (nothing changes in that case). Panics if the tile is already held or matched.
    pub fn add(&mut self, tile: &mut Tile) -> Option<usize> {
        assert!(tile.is_live(), "{} is already in hand or matched", tile.id);

        let free = self.slots.iter().position(Option::is_none)?;
        tile.is_in_hand = true;
        tile.is_accessible = false;
        self.slots[free] = Some(HeldTile { id: tile.id, tile_type: tile.tile_type });

        self.reorganize();
        self.slot_of(tile.id)
    }

    /// First type (by first appearance in slot order) holding three or more tiles.
    pub fn check_match(&self) -> MatchResult {
        let groups = group_by_type(self.held_tiles().map(|h| (h.id, h.tile_type)));

        match groups.into_iter().find(|(_, ids)| ids.len() >= TILES_PER_TYPE) {
            Some((_, ids)) => MatchResult {
                matched: true,
                tiles: ids[..TILES_PER_TYPE].to_vec(),
                score_gained: self.match_score,
            },
            None => MatchResult::none(),
        }
    }

    /// Mark `ids` matched on `board`, drop any of them held here and compact.
    ///
    /// Ids that are not in the hand (board tiles resolved by a hint) are only
    /// marked matched.
    pub fn remove_matched(&mut self, ids: &[TileId], board: &mut Board) {
        for &id in ids {
            let tile = board.tile_mut(id);
            tile.is_matched = true;
            tile.is_in_hand = false;
            tile.is_accessible = false;
            tile.is_selected = false;

            if let Some(slot) = self.slot_of(id) {
                self.slots[slot] = None;
            }
        }
        self.compact();
    }

    /// Pop the tile in the highest occupied slot (undo).
    ///
    /// The caller restores the tile's board flags.
    pub fn remove_last(&mut self) -> Option<TileId> {
        let last = self.slots.iter().rposition(Option::is_some)?;
        self.slots[last].take().map(|h| h.id)
    }

    pub fn reset(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_full(&self) -> bool {
        self.count() == self.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Read-only view of every slot, empty ones included.
    pub fn slots(&self) -> &[Option<HeldTile>] {
        &self.slots
    }

    /// Held tiles in slot order.
    pub fn held_tiles(&self) -> impl Iterator<Item = HeldTile> + '_ {
        self.slots.iter().flatten().copied()
    }

    pub fn slot_of(&self, id: TileId) -> Option<usize> {
        self.slots.iter().position(|s| s.is_some_and(|h| h.id == id))
    }

    /// Centre of slot `index` in a row centered on `center_x` at `baseline_y`.
    pub fn slot_screen_position(&self, index: usize) -> Point {
        let g = &self.geometry;
        let cap = self.capacity() as f32;
        let row_width = cap * g.slot_width + (cap - 1.0).max(0.0) * g.slot_spacing;
        let left = g.center_x - row_width / 2.0;

        Point {
            x: left + index as f32 * (g.slot_width + g.slot_spacing) + g.slot_width / 2.0,
            y: g.baseline_y,
        }
    }

    /// Stable sort by type, then pack into slots `0..k`.
    fn reorganize(&mut self) {
        let mut held: Vec<HeldTile> = self.held_tiles().collect();
        held.sort_by_key(|h| h.tile_type);
        self.refill(held);
    }

    /// Pack into slots `0..k`, keeping relative order.
    fn compact(&mut self) {
        let held: Vec<HeldTile> = self.held_tiles().collect();
        self.refill(held);
    }

    fn refill(&mut self, held: Vec<HeldTile>) {
        self.reset();
        for (slot, h) in self.slots.iter_mut().zip(held) {
            *slot = Some(h);
        }
    }
}
