//! State record exchanged with session servers and drivers.
//!
//! The core has no wire format of its own. This module defines the plain
//! [`GameState`] record that outer layers store and ship as JSON, using the
//! field names those layers already speak (`gameWon`, `gameOver`,
//! `lastMoveMade`), plus helpers to convert between JSON, records and games.

mod state;

pub use state::{
    GameState,
    SerializationError,
    to_json,
    from_json,
    game_from_json,
};
