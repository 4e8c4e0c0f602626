//! Board and match engine for a layered triplet tile-matching puzzle.
//!
//! Tiles are picked from a stacked 3D board into a fixed-capacity hand; three
//! of a kind in the hand resolve into a match. The engine generates boards
//! that always clear by type, tracks which tiles are uncovered, runs the hand's
//! slot/match state machine and can always suggest a triplet.
//!
//! Exports high-level functions callable from JavaScript via wasm-bindgen.
//! Data crosses the boundary as plain JS objects through `serde-wasm-bindgen`,
//! with camelCase field names. Tile ids travel as `"tile-N"` strings and tile
//! types as their index.

pub mod accessibility;
pub mod board;
pub mod config;
pub mod hand;
pub mod hint;
pub mod layout;
pub mod rng;
pub mod session;
pub mod types;

// ─── WASM Exports (only compiled for wasm32 target) ─────────────────────────

#[cfg(target_arch = "wasm32")]
mod wasm_exports {
    use serde::de::DeserializeOwned;
    use serde::Serialize;
    use wasm_bindgen::prelude::*;

    use crate::config::{BoardGeometry, LevelConfig, SessionConfig};
    use crate::hand::HeldTile;
    use crate::rng::TileRng;
    use crate::session::{GameSession, GameStatus};
    use crate::types::{Board, Rect, Tile, TileId, TilePosition, TileType};
    use crate::{accessibility, board, hint};

    fn log(msg: &str) {
        web_sys::console::log_1(&JsValue::from_str(msg));
    }

    fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(value)?)
    }

    /// Deserialize `value`, falling back to `T::default()` for `undefined`/`null`.
    fn from_js_or_default<T: DeserializeOwned + Default>(value: JsValue) -> Result<T, JsError> {
        if value.is_undefined() || value.is_null() {
            return Ok(T::default());
        }
        Ok(serde_wasm_bindgen::from_value(value)?)
    }

    fn rng_for(seed: Option<u32>) -> TileRng {
        match seed {
            Some(seed) => TileRng::from_seed(seed as u64),
            None => TileRng::new(),
        }
    }

    fn config_error(err: anyhow::Error) -> JsError {
        JsError::new(&format!("{:#}", err))
    }

    #[wasm_bindgen(start)]
    pub fn init() {
        console_error_panic_hook::set_once();
    }

    /// Generate a board. Returns an array of tiles with accessibility resolved.
    #[wasm_bindgen(js_name = "generateBoard")]
    pub fn wasm_generate_board(config: JsValue, seed: Option<u32>) -> Result<JsValue, JsError> {
        let config: LevelConfig = from_js_or_default(config)?;
        let board = board::generate_board(&config, &mut rng_for(seed)).map_err(config_error)?;
        to_js(&board.tiles())
    }

    /// Recompute `isAccessible` on a tile array and return the updated array.
    #[wasm_bindgen(js_name = "updateAccessibility")]
    pub fn wasm_update_accessibility(tiles: JsValue) -> Result<JsValue, JsError> {
        let mut tiles: Vec<Tile> = serde_wasm_bindgen::from_value(tiles)?;
        accessibility::update_accessibility(&mut tiles);
        to_js(&tiles)
    }

    /// Map a board position to the centre of its tile inside `bounds`.
    /// Returns `{ x, y }`.
    #[wasm_bindgen(js_name = "screenPosition")]
    pub fn wasm_screen_position(
        position: JsValue,
        config: JsValue,
        bounds: JsValue,
        geometry: JsValue,
    ) -> Result<JsValue, JsError> {
        let position: TilePosition = serde_wasm_bindgen::from_value(position)?;
        let config: LevelConfig = from_js_or_default(config)?;
        let bounds: Rect = serde_wasm_bindgen::from_value(bounds)?;
        let geometry: BoardGeometry = from_js_or_default(geometry)?;
        to_js(&board::screen_position(&position, &config, &bounds, &geometry))
    }

    /// Find a triplet across held tiles and the board.
    /// Returns `{ type, tiles, fromHand }` or `null`.
    #[wasm_bindgen(js_name = "findHint")]
    pub fn wasm_find_hint(hand: JsValue, board: JsValue) -> Result<JsValue, JsError> {
        let hand: Vec<HeldTile> = serde_wasm_bindgen::from_value(hand)?;
        let board: Vec<Tile> = serde_wasm_bindgen::from_value(board)?;
        match hint::find_hint(&hand, &board) {
            Some(hint) => to_js(&hint),
            None => Ok(JsValue::NULL),
        }
    }

    /// Symbol and colour for a tile type index. Returns `{ symbol, color }`.
    #[wasm_bindgen(js_name = "tileAttributes")]
    pub fn wasm_tile_attributes(tile_type: u8) -> Result<JsValue, JsError> {
        let tile_type = TileType::try_from(tile_type).map_err(config_error)?;
        to_js(&tile_type.attributes())
    }

    /// Preset configuration for a 1-based level number.
    #[wasm_bindgen(js_name = "levelConfig")]
    pub fn wasm_level_config(level: u32) -> Result<JsValue, JsError> {
        to_js(&LevelConfig::for_level(level))
    }

    /// Ping function to verify WASM is loaded.
    #[wasm_bindgen(js_name = "ping")]
    pub fn wasm_ping() -> String {
        "WASM tile engine ready".to_string()
    }

    /// One play session, owned by the JS side.
    #[wasm_bindgen]
    pub struct Game {
        session: GameSession,
    }

    #[wasm_bindgen]
    impl Game {
        #[wasm_bindgen(constructor)]
        pub fn new(level: u32, config: JsValue, seed: Option<u32>) -> Result<Game, JsError> {
            let config: SessionConfig = from_js_or_default(config)?;
            let level_config = LevelConfig::for_level(level);
            let session = GameSession::new(level_config, config, rng_for(seed)).map_err(config_error)?;
            log(&format!("level {} started with {} tiles", level, session.board().len()));
            Ok(Game { session })
        }

        /// Pick a board tile. Returns `{ kind, slot?, result? }`.
        pub fn pick(&mut self, id: &str) -> Result<JsValue, JsError> {
            let id = self.checked_id(id)?;
            let outcome = self.session.pick(id);
            self.log_if_over();
            to_js(&outcome)
        }

        /// Undo the last pick. Returns the returned tile's id, if any.
        pub fn undo(&mut self) -> Option<String> {
            self.session.undo().map(|id| id.to_string())
        }

        /// Resolve a hinted triplet. Returns the hint or `null`.
        pub fn hint(&mut self) -> Result<JsValue, JsError> {
            match self.session.apply_hint() {
                Some(hint) => {
                    self.log_if_over();
                    to_js(&hint)
                }
                None => {
                    log("no hint available");
                    Ok(JsValue::NULL)
                }
            }
        }

        pub fn tiles(&self) -> Result<JsValue, JsError> {
            to_js(&self.session.board().tiles())
        }

        /// Ids of every tile that can be picked right now.
        #[wasm_bindgen(js_name = "accessibleIds")]
        pub fn accessible_ids(&self) -> js_sys::Array {
            self.session
                .board()
                .tiles()
                .iter()
                .filter(|t| t.is_accessible)
                .map(|t| JsValue::from_str(&t.id.to_string()))
                .collect()
        }

        /// Slot contents; empty slots are `undefined`.
        pub fn slots(&self) -> Result<JsValue, JsError> {
            to_js(&self.session.hand().slots())
        }

        #[wasm_bindgen(js_name = "slotScreenPosition")]
        pub fn slot_screen_position(&self, index: usize) -> Result<JsValue, JsError> {
            to_js(&self.session.hand().slot_screen_position(index))
        }

        pub fn score(&self) -> u32 {
            self.session.score()
        }

        /// `"playing"`, `"won"` or `"lost"`.
        pub fn status(&self) -> String {
            match self.session.status() {
                GameStatus::Playing => "playing",
                GameStatus::Won => "won",
                GameStatus::Lost => "lost",
            }
            .to_string()
        }

        #[wasm_bindgen(js_name = "remainingTiles")]
        pub fn remaining_tiles(&self) -> usize {
            self.session.remaining_board_tiles()
        }

        #[wasm_bindgen(js_name = "undosRemaining")]
        pub fn undos_remaining(&self) -> Option<u32> {
            self.session.undos_remaining()
        }

        pub fn restart(&mut self, level: u32) -> Result<(), JsError> {
            self.session
                .restart(LevelConfig::for_level(level))
                .map_err(config_error)?;
            log(&format!("level {} restarted", level));
            Ok(())
        }
    }

    impl Game {
        fn checked_id(&self, id: &str) -> Result<TileId, JsError> {
            let id: TileId = id.parse().map_err(config_error)?;
            if id.index() < self.session.board().len() {
                Ok(id)
            } else {
                Err(JsError::new(&format!("{} is not on this board", id)))
            }
        }

        fn log_if_over(&self) {
            match self.session.status() {
                GameStatus::Won => log(&format!("level cleared, score {}", self.session.score())),
                GameStatus::Lost => log("hand full, game over"),
                GameStatus::Playing => {}
            }
        }
    }

    /// Rebuild and validate a board passed back from JS.
    #[wasm_bindgen(js_name = "validateBoard")]
    pub fn wasm_validate_board(tiles: JsValue) -> Result<usize, JsError> {
        let tiles: Vec<Tile> = serde_wasm_bindgen::from_value(tiles)?;
        let board = Board::from_tiles(tiles).map_err(config_error)?;
        Ok(board.remaining())
    }
}
