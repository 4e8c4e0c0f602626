//! A single play session: one board, one hand, a score.
//!
//! This is the host loop the engine components are designed for. Every
//! triplet, whether completed by picking or by a hint, goes through
//! `Hand::remove_matched` followed by an accessibility recompute.

use anyhow::Result;
use serde::Serialize;

use crate::accessibility::update_accessibility;
use crate::board::generate_board;
use crate::config::{LevelConfig, SessionConfig};
use crate::hand::{Hand, HeldTile, MatchResult};
use crate::hint::{find_hint, Hint};
use crate::rng::TileRng;
use crate::types::{Board, TileId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GameStatus {
    Playing,
    /// Board and hand are both empty.
    Won,
    /// Hand is full and holds no triplet.
    Lost,
}

/// Result of picking a board tile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PickOutcome {
    /// Tile not accessible, or the game is over.
    Rejected,
    /// No free slot; nothing changed.
    HandFull,
    /// Tile moved into `slot`.
    Held { slot: usize },
    /// Tile moved into `slot` and completed a triplet, already resolved.
    Matched { slot: usize, result: MatchResult },
}

pub struct GameSession {
    level: LevelConfig,
    config: SessionConfig,
    board: Board,
    hand: Hand,
    score: u32,
    undos_used: u32,
    status: GameStatus,
    rng: TileRng,
}

impl GameSession {
    pub fn new(level: LevelConfig, config: SessionConfig, mut rng: TileRng) -> Result<Self> {
        config.validate()?;
        let board = generate_board(&level, &mut rng)?;

        Ok(Self {
            level,
            config,
            board,
            hand: Hand::from_config(&config),
            score: 0,
            undos_used: 0,
            status: GameStatus::Playing,
            rng,
        })
    }

    /// Move an accessible board tile into the hand and resolve any triplet.
    ///
    /// Panics on an id that is not on the board.
    pub fn pick(&mut self, id: TileId) -> PickOutcome {
        if self.status != GameStatus::Playing || !self.board.tile(id).is_accessible {
            return PickOutcome::Rejected;
        }

        let Some(slot) = self.hand.add(self.board.tile_mut(id)) else {
            return PickOutcome::HandFull;
        };
        update_accessibility(self.board.tiles_mut());

        let result = self.hand.check_match();
        let outcome = if result.matched {
            self.resolve(&result.tiles, result.score_gained);
            PickOutcome::Matched { slot, result }
        } else {
            PickOutcome::Held { slot }
        };

        self.refresh_status();
        outcome
    }

    /// Return the most recently slotted tile to the board.
    ///
    /// Allowed while playing or after a loss (which it may undo), never after a win.
    pub fn undo(&mut self) -> Option<TileId> {
        if self.status == GameStatus::Won || self.undos_remaining() == Some(0) {
            return None;
        }

        let id = self.hand.remove_last()?;
        self.board.tile_mut(id).is_in_hand = false;
        update_accessibility(self.board.tiles_mut());
        self.undos_used += 1;

        self.refresh_status();
        Some(id)
    }

    /// Find a triplet and resolve it as if it had been matched by hand.
    ///
    /// Returns `None` (and changes nothing) when no triplet exists or the game is over.
    pub fn apply_hint(&mut self) -> Option<Hint> {
        if self.status != GameStatus::Playing {
            return None;
        }

        let held: Vec<HeldTile> = self.hand.held_tiles().collect();
        let hint = find_hint(&held, self.board.tiles())?;
        self.resolve(&hint.tiles, self.config.hint_score);

        self.refresh_status();
        Some(hint)
    }

    /// Peek at the next hint without resolving it.
    pub fn peek_hint(&self) -> Option<Hint> {
        let held: Vec<HeldTile> = self.hand.held_tiles().collect();
        find_hint(&held, self.board.tiles())
    }

    /// Start `level` from scratch with the same session rules.
    pub fn restart(&mut self, level: LevelConfig) -> Result<()> {
        self.board = generate_board(&level, &mut self.rng)?;
        self.level = level;
        self.hand.reset();
        self.score = 0;
        self.undos_used = 0;
        self.status = GameStatus::Playing;
        Ok(())
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn level(&self) -> &LevelConfig {
        &self.level
    }

    pub fn remaining_board_tiles(&self) -> usize {
        self.board.remaining()
    }

    pub fn undos_remaining(&self) -> Option<u32> {
        self.config
            .undo_limit
            .map(|limit| limit.saturating_sub(self.undos_used))
    }

    fn resolve(&mut self, ids: &[TileId], score: u32) {
        self.hand.remove_matched(ids, &mut self.board);
        update_accessibility(self.board.tiles_mut());
        self.score += score;
    }

    fn refresh_status(&mut self) {
        self.status = if self.board.remaining() == 0 && self.hand.is_empty() {
            GameStatus::Won
        } else if self.hand.is_full() && !self.hand.check_match().matched {
            GameStatus::Lost
        } else {
            GameStatus::Playing
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TileType;

    fn session(level: LevelConfig, config: SessionConfig, seed: u64) -> GameSession {
        GameSession::new(level, config, TileRng::from_seed(seed)).unwrap()
    }

    fn first_accessible(s: &GameSession, skip: &[TileType]) -> TileId {
        s.board()
            .tiles()
            .iter()
            .find(|t| t.is_accessible && !skip.contains(&t.tile_type))
            .map(|t| t.id)
            .unwrap()
    }

    #[test]
    fn test_hints_clear_whole_board() {
        let mut s = session(LevelConfig::for_level(4), SessionConfig::default(), 11);
        let total = s.board().len() as u32;

        while s.status() == GameStatus::Playing {
            assert!(s.apply_hint().is_some(), "hint failed with {} tiles left", s.remaining_board_tiles());
        }

        assert_eq!(s.status(), GameStatus::Won);
        assert_eq!(s.remaining_board_tiles(), 0);
        assert_eq!(s.score(), total / 3 * 100);
        assert!(s.board().tiles().iter().all(|t| t.is_matched));
        assert_eq!(s.apply_hint(), None);
    }

    #[test]
    fn test_picking_by_hint_wins() {
        // Pick hinted tiles one by one through the manual path.
        let mut s = session(LevelConfig::for_level(2), SessionConfig::default(), 3);
        let mut guard = 0;

        while s.status() == GameStatus::Playing {
            guard += 1;
            assert!(guard < 1000);

            let hint = s.peek_hint().unwrap();
            let target = hint
                .board_tiles()
                .iter()
                .copied()
                .find(|id| s.board().tile(*id).is_accessible);

            match target {
                Some(id) => {
                    assert_ne!(s.pick(id), PickOutcome::Rejected);
                }
                None => {
                    // Hinted board tiles are still covered; resolve it directly.
                    s.apply_hint().unwrap();
                }
            }
        }
        assert_eq!(s.status(), GameStatus::Won);
    }

    #[test]
    fn test_full_hand_without_match_loses() {
        let config = SessionConfig { hand_capacity: 3, ..SessionConfig::default() };
        let mut s = session(LevelConfig::new(4, 4, 1, 4), config, 8);

        let mut seen = Vec::new();
        for i in 0..3 {
            let id = first_accessible(&s, &seen);
            seen.push(s.board().tile(id).tile_type);
            let outcome = s.pick(id);
            assert_eq!(outcome, PickOutcome::Held { slot: s.hand().slot_of(id).unwrap() });
            if i < 2 {
                assert_eq!(s.status(), GameStatus::Playing);
            }
        }

        assert_eq!(s.status(), GameStatus::Lost);
        let next = first_accessible(&s, &[]);
        assert_eq!(s.pick(next), PickOutcome::Rejected);
        assert_eq!(s.apply_hint(), None);

        // Undo rescues the game.
        assert!(s.undo().is_some());
        assert_eq!(s.status(), GameStatus::Playing);
    }

    #[test]
    fn test_pick_triplet_scores() {
        let mut s = session(LevelConfig::new(4, 4, 1, 4), SessionConfig::default(), 21);
        let tile_type = TileType::Dots;
        let ids: Vec<TileId> = s
            .board()
            .tiles()
            .iter()
            .filter(|t| t.tile_type == tile_type)
            .map(|t| t.id)
            .collect();
        assert_eq!(ids.len(), 3);

        assert!(matches!(s.pick(ids[0]), PickOutcome::Held { .. }));
        assert!(matches!(s.pick(ids[1]), PickOutcome::Held { .. }));
        match s.pick(ids[2]) {
            PickOutcome::Matched { result, .. } => {
                assert!(result.matched);
                assert_eq!(result.score_gained, 100);
            }
            other => panic!("expected a match, got {:?}", other),
        }

        assert_eq!(s.score(), 100);
        assert!(s.hand().is_empty());
        assert_eq!(s.remaining_board_tiles(), 12);
    }

    #[test]
    fn test_covered_tile_rejected() {
        let mut s = session(LevelConfig::new(6, 6, 3, 6), SessionConfig::default(), 4);
        let covered = s
            .board()
            .tiles()
            .iter()
            .find(|t| !t.is_accessible)
            .map(|t| t.id)
            .unwrap();

        assert_eq!(s.pick(covered), PickOutcome::Rejected);
        assert!(s.hand().is_empty());
    }

    #[test]
    fn test_pick_then_undo_restores_board() {
        let mut s = session(LevelConfig::new(6, 6, 3, 6), SessionConfig::default(), 17);
        let before = s.board().clone();

        // Choose an upper-layer tile so its removal uncovers something.
        let id = s
            .board()
            .tiles()
            .iter()
            .filter(|t| t.is_accessible)
            .max_by_key(|t| t.position.z)
            .map(|t| t.id)
            .unwrap();

        s.pick(id);
        assert_ne!(s.board(), &before);
        assert_eq!(s.undo(), Some(id));
        assert_eq!(s.board(), &before);
        assert!(s.hand().is_empty());
        assert_eq!(s.undo(), None);
    }

    #[test]
    fn test_undo_limit() {
        let config = SessionConfig { undo_limit: Some(1), ..SessionConfig::default() };
        let mut s = session(LevelConfig::new(4, 4, 1, 4), config, 2);

        let id = first_accessible(&s, &[]);
        s.pick(id);
        assert_eq!(s.undos_remaining(), Some(1));
        assert_eq!(s.undo(), Some(id));
        assert_eq!(s.undos_remaining(), Some(0));

        s.pick(id);
        assert_eq!(s.undo(), None);
        assert_eq!(s.hand().count(), 1);
    }

    #[test]
    fn test_restart_resets_state() {
        let mut s = session(LevelConfig::new(4, 4, 1, 4), SessionConfig::default(), 5);
        s.apply_hint().unwrap();
        assert!(s.score() > 0);

        s.restart(LevelConfig::for_level(2)).unwrap();
        assert_eq!(s.score(), 0);
        assert_eq!(s.status(), GameStatus::Playing);
        assert!(s.hand().is_empty());
        assert_eq!(s.level(), &LevelConfig::for_level(2));
        assert!(s.board().tiles().iter().all(|t| t.is_live()));
    }

    #[test]
    fn test_invalid_session_config() {
        let config = SessionConfig { hand_capacity: 0, ..SessionConfig::default() };
        assert!(GameSession::new(LevelConfig::default(), config, TileRng::from_seed(1)).is_err());
    }
}
