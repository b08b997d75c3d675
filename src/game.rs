//! A running game: board, score and status flags.
//!
//! [`Game::make_move`] is the only state-mutating entry point. It slides the
//! board, and only if something changed it records the move, spawns a tile,
//! adds the merge sum to the score and recomputes `won`/`over`.
//!
//! ```
//! use ai_2048_search::engine::Direction;
//! use ai_2048_search::game::Game;
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! let mut rng = StdRng::seed_from_u64(9);
//! let mut game = Game::new(&mut rng);
//! let moved = Direction::ALL.iter().any(|&d| game.make_move(d, &mut rng));
//! assert!(moved);
//! assert!(game.board().count_empty() >= 13);
//! assert_ne!(game.last_move().name(), "game started");
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::engine::{Board, Direction, InvalidStateError};
use crate::serialization::GameState;

const GAME_STARTED: &str = "game started";

/// The last accepted move, or the sentinel for a fresh game.
///
/// On the wire this is a plain string: `"game started"` or a direction name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum LastMove {
    #[default]
    GameStarted,
    Moved(Direction),
}

impl LastMove {
    pub fn name(self) -> &'static str {
        match self {
            LastMove::GameStarted => GAME_STARTED,
            LastMove::Moved(dir) => dir.name(),
        }
    }
}

impl From<LastMove> for String {
    fn from(m: LastMove) -> Self { m.name().to_string() }
}

impl TryFrom<String> for LastMove {
    type Error = InvalidStateError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if s == GAME_STARTED {
            return Ok(LastMove::GameStarted);
        }
        Direction::from_name(&s).map(LastMove::Moved).ok_or(InvalidStateError::LastMove(s))
    }
}

impl fmt::Display for LastMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

/// One game of 2048.
///
/// `Clone` gives a fully independent copy; speculative play on a clone
/// never touches the game it was cloned from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    board: Board,
    score: u64,
    won: bool,
    over: bool,
    last_move: LastMove,
}

impl Game {
    /// Start a game on an empty board with two random tiles.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self { Self::from_board(Board::new(rng)) }

    /// Start from an arbitrary board with a zero score; flags are derived from the board.
    pub fn from_board(board: Board) -> Self {
        Game { board, score: 0, won: board.is_won(), over: board.is_terminal(), last_move: LastMove::GameStarted }
    }

    /// Rebuild a game from a state record.
    ///
    /// Stored `won`/`over` flags are kept verbatim; absent ones are recomputed.
    pub fn from_state(state: &GameState) -> Result<Self, InvalidStateError> {
        let board = Board::try_from_rows(&state.board)?;
        Ok(Game {
            board,
            score: state.score,
            won: state.won.unwrap_or_else(|| board.is_won()),
            over: state.over.unwrap_or_else(|| board.is_terminal()),
            last_move: state.last_move,
        })
    }

    /// Snapshot this game as a state record.
    pub fn state(&self) -> GameState {
        GameState {
            board: self.board.to_vecs(),
            score: self.score,
            won: Some(self.won),
            over: Some(self.over),
            last_move: self.last_move,
        }
    }

    /// Play `dir`. Returns whether the move changed the board.
    ///
    /// A move that changes nothing leaves the game exactly as it was: no
    /// tile is spawned and the score is untouched.
    pub fn make_move<R: Rng + ?Sized>(&mut self, dir: Direction, rng: &mut R) -> bool {
        let outcome = self.board.apply_move(dir);
        if outcome.changed {
            self.score += outcome.gained;
            self.last_move = LastMove::Moved(dir);
            self.board.spawn_tile(rng);
            self.won = self.board.is_won();
            self.over = self.board.is_terminal();
        }
        outcome.changed
    }

    /// Play a move by wire index. Indices outside `0..=3` are rejected with `false`.
    pub fn make_move_index<R: Rng + ?Sized>(&mut self, index: i64, rng: &mut R) -> bool {
        match Direction::from_index(index) {
            Some(dir) => self.make_move(dir, rng),
            None => false,
        }
    }

    /// Play a move given as a name (`"up"`) or numeric string (`"0"`).
    /// Unknown tokens are rejected with `false`.
    pub fn make_move_named<R: Rng + ?Sized>(&mut self, token: &str, rng: &mut R) -> bool {
        match Direction::parse(token) {
            Some(dir) => self.make_move(dir, rng),
            None => false,
        }
    }

    #[inline]
    pub fn board(&self) -> &Board { &self.board }

    #[inline]
    pub fn score(&self) -> u64 { self.score }

    #[inline]
    pub fn is_won(&self) -> bool { self.won }

    #[inline]
    pub fn is_over(&self) -> bool { self.over }

    #[inline]
    pub fn last_move(&self) -> LastMove { self.last_move }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "score: {} | last move: {}{}", self.score, self.last_move, self.board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn board(rows: [[u32; 4]; 4]) -> Board { Board::from_rows(rows) }

    #[test]
    fn new_game_has_two_tiles() {
        let mut rng = StdRng::seed_from_u64(21);
        let game = Game::new(&mut rng);
        assert_eq!(game.board().count_empty(), 14);
        assert_eq!(game.score(), 0);
        assert!(!game.is_won());
        assert!(!game.is_over());
        assert_eq!(game.last_move(), LastMove::GameStarted);
    }

    #[test]
    fn accepted_move_scores_and_spawns() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut game = Game::from_board(board([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]));
        assert!(game.make_move(Direction::Left, &mut rng));
        assert_eq!(game.score(), 4);
        assert_eq!(game.board().tile(0, 0), 4);
        assert_eq!(game.board().count_empty(), 14);
        assert_eq!(game.last_move(), LastMove::Moved(Direction::Left));
    }

    #[test]
    fn noop_move_is_not_a_turn() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut game = Game::from_board(board([[2, 4, 8, 16], [0; 4], [0; 4], [0; 4]]));
        let before = game.clone();
        assert!(!game.make_move(Direction::Left, &mut rng));
        assert!(!game.make_move(Direction::Up, &mut rng));
        assert_eq!(game, before);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut game = Game::from_board(board([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]));
        let before = game.clone();
        assert!(!game.make_move_index(4, &mut rng));
        assert!(!game.make_move_index(-1, &mut rng));
        assert!(!game.make_move_named("sideways", &mut rng));
        assert_eq!(game, before);
        assert!(game.make_move_named("3", &mut rng));
        assert_eq!(game.last_move(), LastMove::Moved(Direction::Left));
    }

    #[test]
    fn named_move() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut game = Game::from_board(board([[2, 0, 0, 0], [2, 0, 0, 0], [0; 4], [0; 4]]));
        assert!(game.make_move_named("up", &mut rng));
        assert_eq!(game.board().tile(0, 0), 4);
        assert_eq!(game.score(), 4);
    }

    #[test]
    fn merging_to_2048_wins() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut game = Game::from_board(board([[1024, 1024, 0, 0], [0; 4], [0; 4], [0; 4]]));
        assert!(!game.is_won());
        assert!(game.make_move(Direction::Right, &mut rng));
        assert!(game.is_won());
        assert_eq!(game.score(), 2048);
    }

    #[test]
    fn filling_last_cell_can_end_game() {
        // After sliding right the only gap is (0, 0); any spawn there leaves no moves.
        let start = board([[8, 16, 32, 0], [16, 32, 64, 128], [32, 64, 128, 256], [64, 128, 256, 512]]);
        let mut rng = StdRng::seed_from_u64(8);
        let mut game = Game::from_board(start);
        assert!(!game.is_over());
        assert!(game.make_move(Direction::Right, &mut rng));
        assert_eq!(game.board().count_empty(), 0);
        assert!(game.is_over());
    }

    #[test]
    fn clone_is_independent() {
        let mut rng = StdRng::seed_from_u64(12);
        let game = Game::from_board(board([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]));
        let mut copy = game.clone();
        assert!(copy.make_move(Direction::Left, &mut rng));
        assert_eq!(game.board().tile(0, 0), 2);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn random_play_keeps_invariants() {
        let mut rng = StdRng::seed_from_u64(2024);
        let mut game = Game::new(&mut rng);
        for i in 0..400 {
            if game.is_over() {
                game = Game::new(&mut rng);
            }
            let dir = Direction::ALL[(i * 7 + i / 3) % 4];
            let before_score = game.score();
            let (slid, outcome) = game.board().shifted(dir);
            let accepted = game.make_move(dir, &mut rng);
            assert_eq!(accepted, outcome.changed);
            if !accepted {
                assert_eq!(game.score(), before_score);
                continue;
            }
            assert_eq!(game.score(), before_score + outcome.gained);
            // Exactly one previously empty cell now holds the spawned 2 or 4.
            let diffs: Vec<(u32, u32)> =
                slid.iter().zip(game.board().iter()).filter(|(a, b)| a != b).collect();
            assert_eq!(diffs.len(), 1, "{slid:?} -> {:?}", game.board());
            let (was, now) = diffs[0];
            assert_eq!(was, 0);
            assert!(now == 2 || now == 4);
            assert_eq!(game.is_over(), game.board().is_terminal());
        }
    }
}
