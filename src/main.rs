use ai_2048_search::agent::Agent;
use ai_2048_search::game::Game;

fn main() {
    let mut rng = rand::thread_rng();
    let mut game = Game::new(&mut rng);
    println!("{}", game);
    let mut move_count = 0;
    let mut total_leaves: u64 = 0;
    while !game.is_over() {
        let mut agent = Agent::new(game.clone());
        let direction = match agent.evaluate_move(&mut rng).direction {
            Some(dir) => dir,
            None => break,
        };
        if !game.make_move(direction, &mut rng) {
            break;
        }
        move_count += 1;
        total_leaves = total_leaves.saturating_add(agent.last_stats().leaves);
        println!("{}", game);
    }
    println!(
        "Moves made: {}, Score: {}, Highest tile: {}, Leaves evaluated: {}",
        move_count,
        game.score(),
        game.board().max_tile(),
        total_leaves
    );
}
