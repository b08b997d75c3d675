use serde::{Deserialize, Serialize};

use crate::engine::InvalidStateError;
use crate::game::{Game, LastMove};

/// Serializable snapshot of a game.
///
/// `won`, `over`, `score` and `last_move` may be absent on input. Missing
/// flags are recomputed from the board when a [`Game`] is rebuilt; present
/// ones are trusted. Unknown fields (session ids, timestamps) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Rows of tile values, top to bottom. Shape is checked on rebuild.
    pub board: Vec<Vec<u32>>,
    #[serde(default)]
    pub score: u64,
    #[serde(rename = "gameWon", alias = "won", default, skip_serializing_if = "Option::is_none")]
    pub won: Option<bool>,
    #[serde(rename = "gameOver", alias = "over", default, skip_serializing_if = "Option::is_none")]
    pub over: Option<bool>,
    #[serde(rename = "lastMoveMade", alias = "lastMove", default)]
    pub last_move: LastMove,
}

#[derive(thiserror::Error, Debug)]
pub enum SerializationError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid game state: {0}")]
    InvalidState(#[from] InvalidStateError),
}

/// Encode a state record as JSON.
pub fn to_json(state: &GameState) -> Result<String, SerializationError> { Ok(serde_json::to_string(state)?) }

/// Decode a state record from JSON. The board shape is not checked here.
pub fn from_json(json: &str) -> Result<GameState, SerializationError> { Ok(serde_json::from_str(json)?) }

/// Decode JSON straight into a validated [`Game`].
///
/// ```
/// use ai_2048_search::serialization::game_from_json;
/// let json = r#"{"board":[[2,0,0,0],[0,0,0,0],[0,0,0,0],[0,0,0,2]],"score":0}"#;
/// let game = game_from_json(json).unwrap();
/// assert!(!game.is_over());
/// assert!(game_from_json(r#"{"board":[[2,0,0,0]]}"#).is_err());
/// ```
pub fn game_from_json(json: &str) -> Result<Game, SerializationError> { Ok(Game::from_state(&from_json(json)?)?) }
