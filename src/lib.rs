//! ai-2048-search: a 2048 game engine + fixed-depth exhaustive search player
//!
//! This crate provides:
//! - A value-type `Board` with the move mechanics (`apply_move`, `rotate90`, `spawn_tile`, ...)
//! - A `Game` that tracks score, win/over flags and the last move
//! - A search `Agent` (`agent` module) scoring leaves with hand-tuned heuristics
//! - The `GameState` record outer layers exchange as JSON (`serialization` module)
//!
//! All randomness (tile spawns, the terminal fallback move) goes through a
//! caller-supplied `rand::Rng`; pass a seeded `StdRng` for determinism.
//!
//! Quick start:
//! ```
//! use ai_2048_search::engine::{Board, Direction};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let b0 = Board::new(&mut rng);
//! let (b1, outcome) = b0.shifted(Direction::Left);
//! assert_eq!(outcome.changed, b1 != b0);
//! ```
//!
//! Full loop (simplest possible)
//! ```
//! use ai_2048_search::agent::{Agent, AgentConfig};
//! use ai_2048_search::game::Game;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // 1) Start a game and a shallow policy (deterministic via seeded RNG)
//! let mut rng = StdRng::seed_from_u64(123);
//! let mut game = Game::new(&mut rng);
//! let cfg = AgentConfig { depth: 2, ..Default::default() };
//! let mut moves = 0u32;
//!
//! // 2) Loop a few moves; each turn gets a fresh agent over the latest state
//! while !game.is_over() && moves < 4 {
//!     let mut agent = Agent::with_config(game.clone(), cfg.clone());
//!     let dir = agent.evaluate_move(&mut rng).direction.unwrap();
//!     assert!(game.make_move(dir, &mut rng));
//!     moves += 1;
//! }
//!
//! // 3) Inspect final state
//! assert!(game.score() > 0 || moves > 0);
//! ```
//!
pub mod engine;
pub mod game;
pub mod agent;
pub mod serialization;
