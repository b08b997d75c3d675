//! Fixed-depth exhaustive search player.
//!
//! [`Agent::evaluate_move`] enumerates all four directions at every level
//! down to `depth`, scoring leaves with [`heuristic::evaluate`]. There is no
//! pruning and no caching: a depth-`d` search visits exactly `4^d` leaves and
//! clones the game once per edge, so `depth` is the cost knob.
//!
//! Before a direction is returned it is re-checked against the real board;
//! directions that would not change anything are skipped. If none is valid
//! (the game is over) a random direction with score 0 comes back.
//!
//! Quick start
//! ```
//! use ai_2048_search::agent::{Agent, AgentConfig};
//! use ai_2048_search::game::Game;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(123);
//! let game = Game::new(&mut rng);
//! let mut agent = Agent::with_config(game, AgentConfig { depth: 3, ..Default::default() });
//! let result = agent.evaluate_move(&mut rng);
//! assert!(result.direction.is_some());
//! assert_eq!(agent.last_stats().leaves, 64);
//! ```

use log::debug;
use rand::Rng;

use crate::engine::{Direction, InvalidStateError};
use crate::game::Game;
use crate::serialization::GameState;

pub mod heuristic;
mod search;

pub use heuristic::HeuristicWeights;
pub use search::Agent;

/// Search depth used when none is given.
pub const DEFAULT_DEPTH: u32 = 5;

/// Configurable knobs for the agent.
///
/// - `depth`: plies searched; cost grows as `4^depth`.
/// - `weights`: leaf evaluation weights.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    pub depth: u32,
    pub weights: HeuristicWeights,
}

impl Default for AgentConfig {
    fn default() -> Self { Self { depth: DEFAULT_DEPTH, weights: HeuristicWeights::default() } }
}

/// A scored direction.
///
/// `direction` is `None` only for leaves, before a parent tags them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult {
    pub direction: Option<Direction>,
    pub score: f64,
}

impl SearchResult {
    #[inline]
    pub(crate) fn leaf(score: f64) -> Self { Self { direction: None, score } }

    /// Wire form of the direction: `0..=3`, or `-1` for a leaf.
    pub fn index(&self) -> i8 { self.direction.map_or(-1, |d| d.index() as i8) }
}

/// Node counts for the last search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Every search node, leaves included.
    pub nodes: u64,
    /// Leaves scored by the heuristic.
    pub leaves: u64,
}

/// One turn of a session driver: state record in, one direction out.
///
/// Depth is raised to at least 1 so a direction is always chosen.
///
/// ```
/// use ai_2048_search::agent::{choose_move, AgentConfig};
/// use ai_2048_search::serialization::from_json;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let state = from_json(r#"{"board":[[2,4,8,16],[0,0,0,0],[0,0,0,0],[0,0,0,0]]}"#).unwrap();
/// let cfg = AgentConfig { depth: 2, ..Default::default() };
/// let dir = choose_move(&state, &cfg, &mut StdRng::seed_from_u64(1)).unwrap();
/// assert_eq!(dir.name(), "down");
/// ```
pub fn choose_move<R: Rng + ?Sized>(
    state: &GameState,
    cfg: &AgentConfig,
    rng: &mut R,
) -> Result<Direction, InvalidStateError> {
    let game = Game::from_state(state)?;
    let cfg = AgentConfig { depth: cfg.depth.max(1), ..cfg.clone() };
    let mut agent = Agent::with_config(game, cfg);
    let result = agent.evaluate_move(rng);
    debug!("chose {:?} from state with score {}", result.direction, state.score);
    // Any search of depth >= 1 tags its result with a direction.
    Ok(result.direction.unwrap_or(Direction::Up))
}
