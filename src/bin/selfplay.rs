use ai_2048_search::agent::{choose_move, AgentConfig, HeuristicWeights, DEFAULT_DEPTH};
use ai_2048_search::game::Game;
use ai_2048_search::serialization::{from_json, to_json};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use rand::{rngs::StdRng, SeedableRng};
use std::io;
use std::time::{Duration, Instant};

/// Play games against the search agent, passing state through the JSON
/// record each turn the way a remote session driver does.
#[derive(Debug, Parser)]
#[command(name = "selfplay", about = "Run the exhaustive-search player on local 2048 sessions")]
struct Args {
    /// Number of games to play
    #[arg(short, long, default_value_t = 1)]
    games: u32,

    /// Search depth (cost grows as 4^depth)
    #[arg(short, long, default_value_t = DEFAULT_DEPTH)]
    depth: u32,

    /// Seed for the game and search RNG (random if absent)
    #[arg(long)]
    seed: Option<u64>,

    /// Stop each game after this many moves
    #[arg(long)]
    max_moves: Option<u64>,

    /// Weight of the max-tile placement term (off by default)
    #[arg(long, default_value_t = 0.0)]
    position_weight: f64,

    /// Weight of the chain term (off by default)
    #[arg(long, default_value_t = 0.0)]
    chain_weight: f64,

    /// Log every search decision
    #[arg(short, long)]
    verbose: bool,

    /// Disable the progress spinner
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy)]
struct GameSummary {
    moves: u64,
    score: u64,
    highest_tile: u32,
    won: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose)?;

    let cfg = AgentConfig {
        depth: args.depth,
        weights: HeuristicWeights {
            position: args.position_weight,
            chain: args.chain_weight,
            ..Default::default()
        },
    };
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    if args.depth > 6 {
        warn!("depth {} searches {} leaves per move; expect slow play", args.depth, 4u64.pow(args.depth));
    }

    let pb = if args.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner} {elapsed_precise} | {msg}")?
                .tick_chars("⠁⠃⠇⠧⠷⠿⠻⠟⠯⠷⠧⠇⠃"),
        );
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    };

    let start = Instant::now();
    let mut summaries = Vec::with_capacity(args.games as usize);
    for game_idx in 0..args.games {
        let summary = play_session(&cfg, args.max_moves, &mut rng, &pb, game_idx)?;
        info!(
            "game {}: {} moves, score {}, highest tile {}",
            game_idx + 1,
            summary.moves,
            summary.score,
            summary.highest_tile
        );
        summaries.push(summary);
    }
    pb.finish_and_clear();

    let elapsed = start.elapsed().as_secs_f64().max(1e-6);
    let total_moves: u64 = summaries.iter().map(|s| s.moves).sum();
    for (i, s) in summaries.iter().enumerate() {
        println!(
            "Game {}: moves {} | score {} | highest tile {}{}",
            i + 1,
            s.moves,
            s.score,
            s.highest_tile,
            if s.won { " | won" } else { "" }
        );
    }
    if !summaries.is_empty() {
        let n = summaries.len() as f64;
        let mean_score = summaries.iter().map(|s| s.score as f64).sum::<f64>() / n;
        let wins = summaries.iter().filter(|s| s.won).count();
        println!(
            "Games: {} | mean score: {:.1} | wins: {} | moves/sec: {:.1}",
            summaries.len(),
            mean_score,
            wins,
            total_moves as f64 / elapsed
        );
    }
    Ok(())
}

/// One session: the `server` game is authoritative, the driver only ever
/// sees its JSON record and answers with a direction index.
fn play_session(
    cfg: &AgentConfig,
    max_moves: Option<u64>,
    rng: &mut StdRng,
    pb: &ProgressBar,
    game_idx: u32,
) -> anyhow::Result<GameSummary> {
    let mut server = Game::new(rng);
    let mut moves = 0u64;
    loop {
        let record = to_json(&server.state())?;
        let state = from_json(&record)?;
        if state.over.unwrap_or(false) {
            break;
        }
        if max_moves.is_some_and(|limit| moves >= limit) {
            break;
        }
        let dir = choose_move(&state, cfg, rng)?;
        if !server.make_move_index(dir.index() as i64, rng) {
            anyhow::bail!("agent chose no-op move {} on a live board", dir);
        }
        moves += 1;
        debug!("game {} move {}: {} -> score {}", game_idx + 1, moves, dir, server.score());
        pb.set_message(format!("game {} | moves: {} | score: {}", game_idx + 1, moves, server.score()));
    }
    Ok(GameSummary {
        moves,
        score: server.score(),
        highest_tile: server.board().max_tile(),
        won: server.is_won(),
    })
}

fn setup_logging(verbose: bool) -> anyhow::Result<()> {
    let level = if verbose { log::LevelFilter::Debug } else { log::LevelFilter::Warn };
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{}][{}] {}", record.target(), record.level(), message))
        })
        .level(level)
        .chain(io::stderr())
        .apply()?;
    Ok(())
}
