use log::{debug, trace};
use rand::Rng;

use crate::engine::Direction;
use crate::game::Game;

use super::heuristic::evaluate;
use super::{AgentConfig, SearchResult, SearchStats};

/// Exhaustive depth-limited search over one game.
///
/// The agent owns a snapshot of the game it decides for. Drivers replace it
/// wholesale with [`Agent::set_game`] (or build a new agent) after each real
/// move. Searching never mutates it.
pub struct Agent {
    game: Game,
    cfg: AgentConfig,
    stats: SearchStats,
}

impl Agent {
    pub fn new(game: Game) -> Self { Self::with_config(game, AgentConfig::default()) }

    pub fn with_config(game: Game, cfg: AgentConfig) -> Self { Self { game, cfg, stats: SearchStats::default() } }

    pub fn with_depth(game: Game, depth: u32) -> Self {
        Self::with_config(game, AgentConfig { depth, ..Default::default() })
    }

    #[inline]
    pub fn game(&self) -> &Game { &self.game }

    #[inline]
    pub fn set_game(&mut self, game: Game) { self.game = game; }

    #[inline]
    pub fn config(&self) -> &AgentConfig { &self.cfg }

    /// Search to the configured depth.
    ///
    /// `rng` drives tile spawns inside the search tree and the terminal
    /// fallback; seed it for reproducible decisions.
    pub fn evaluate_move<R: Rng + ?Sized>(&mut self, rng: &mut R) -> SearchResult {
        self.evaluate_move_at(self.cfg.depth, rng)
    }

    /// Search to an explicit depth. Depth 0 returns the bare leaf score.
    pub fn evaluate_move_at<R: Rng + ?Sized>(&mut self, level: u32, rng: &mut R) -> SearchResult {
        let mut stats = SearchStats::default();
        let result = self.search(&self.game, level, &mut stats, rng);
        self.stats = stats;
        debug!(
            "depth {} search picked {:?} (score {:.3}) over {} nodes / {} leaves",
            level, result.direction, result.score, stats.nodes, stats.leaves
        );
        result
    }

    /// Statistics collected from the last call to [`Agent::evaluate_move`]
    /// or [`Agent::evaluate_move_at`].
    #[inline]
    pub fn last_stats(&self) -> SearchStats { self.stats }

    fn search<R: Rng + ?Sized>(&self, game: &Game, level: u32, stats: &mut SearchStats, rng: &mut R) -> SearchResult {
        stats.nodes += 1;
        if level == 0 {
            stats.leaves += 1;
            return SearchResult::leaf(evaluate(game.board(), &self.cfg.weights));
        }

        // No-op moves still recurse, on the unchanged clone.
        let mut ranked = Direction::ALL.map(|dir| {
            let mut child = game.clone();
            child.make_move(dir, rng);
            let mut result = self.search(&child, level - 1, stats, rng);
            result.direction = Some(dir);
            result
        });
        // Stable: ties keep direction order.
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

        let board = game.board();
        for result in ranked {
            match result.direction {
                Some(dir) if board.can_move(dir) => return result,
                _ => trace!("skipping no-op {:?} (score {:.3})", result.direction, result.score),
            }
        }

        debug_assert!(board.is_terminal(), "no valid direction on a live board");
        let dir = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];
        SearchResult { direction: Some(dir), score: 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Board;
    use rand::{rngs::StdRng, SeedableRng};

    fn game(rows: [[u32; 4]; 4]) -> Game { Game::from_board(Board::from_rows(rows)) }

    #[test]
    fn leaf_at_depth_zero() {
        let mut rng = StdRng::seed_from_u64(1);
        let g = game([[2, 2, 4, 8], [0; 4], [0; 4], [0; 4]]);
        let mut agent = Agent::with_depth(g, 0);
        let result = agent.evaluate_move(&mut rng);
        assert_eq!(result.direction, None);
        assert_eq!(result.index(), -1);
        assert!((result.score - 28.25).abs() < 1e-9);
        assert_eq!(agent.last_stats(), SearchStats { nodes: 1, leaves: 1 });
    }

    #[test]
    fn only_valid_direction_is_chosen() {
        // Up, left and right change nothing; only down moves tiles.
        let g = game([[2, 4, 8, 16], [0; 4], [0; 4], [0; 4]]);
        for depth in 1..=3 {
            for seed in 0..5 {
                let mut rng = StdRng::seed_from_u64(seed);
                let mut agent = Agent::with_depth(g.clone(), depth);
                assert_eq!(agent.evaluate_move(&mut rng).direction, Some(Direction::Down));
            }
        }
    }

    #[test]
    fn terminal_board_falls_back_to_random_direction() {
        let g = game([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        assert!(g.board().is_terminal());
        let mut seen = [false; 4];
        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut agent = Agent::with_depth(g.clone(), 2);
            let result = agent.evaluate_move(&mut rng);
            assert_eq!(result.score, 0.0);
            let dir = result.direction.expect("fallback always picks a direction");
            seen[dir.index()] = true;
        }
        assert!(seen.iter().all(|&s| s), "fallback should reach every direction");
    }

    #[test]
    fn search_is_exhaustive() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut agent = Agent::with_depth(Game::new(&mut rng), 3);
        agent.evaluate_move(&mut rng);
        assert_eq!(agent.last_stats(), SearchStats { nodes: 1 + 4 + 16 + 64, leaves: 64 });
        agent.evaluate_move_at(4, &mut rng);
        assert_eq!(agent.last_stats().leaves, 256);
    }

    #[test]
    fn search_does_not_touch_the_game() {
        let mut rng = StdRng::seed_from_u64(17);
        let g = Game::new(&mut rng);
        let mut agent = Agent::with_depth(g.clone(), 3);
        agent.evaluate_move(&mut rng);
        assert_eq!(agent.game(), &g);
    }

    #[test]
    fn chosen_direction_always_changes_board() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut g = Game::new(&mut rng);
        let mut agent = Agent::with_depth(g.clone(), 2);
        for _ in 0..40 {
            if g.is_over() {
                break;
            }
            let dir = agent.evaluate_move(&mut rng).direction.expect("depth 2 tags a direction");
            assert!(g.make_move(dir, &mut rng));
            agent.set_game(g.clone());
        }
    }

    #[test]
    fn seeded_search_is_reproducible() {
        let start = Game::new(&mut StdRng::seed_from_u64(5));
        let pick = |seed| {
            let mut agent = Agent::with_depth(start.clone(), 3);
            agent.evaluate_move(&mut StdRng::seed_from_u64(seed))
        };
        assert_eq!(pick(42), pick(42));
    }
}
