use clap::Parser;
use frontend::logging;
use log::{LevelFilter, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;
use xiangqi::display_format::DisplayFormat;
use xiangqi::game::Game;
use xiangqi::search::{SearchConfig, Searcher};

/// Lets the computer play against itself from the opening.
#[derive(Parser, Debug)]
struct Arguments {
    #[arg(short, long, default_value_t = 2, help = "search depth in plies")]
    depth: u32,

    #[arg(short, long, default_value_t = 3000, help = "search time budget per move in milliseconds")]
    budget_ms: u64,

    #[arg(short, long, default_value_t = 200, help = "stop after this many plies")]
    plies: usize,

    #[arg(short, long, default_value_t = 2, help = "random plies played before searching")]
    random_plies: usize,

    #[arg(short, long, help = "seed for the random opening plies")]
    seed: Option<u64>,

    #[arg(short, long, default_value_t = false, help = "only print the final position")]
    quiet: bool,

    #[arg(long, default_value_t = false, help = "latin letters and no terminal colours")]
    plain: bool,

    #[arg(long, help = "log level, overrides RUST_LOG")]
    log_level: Option<LevelFilter>,

    #[arg(long, help = "append the log to this file instead of stderr")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let arguments = Arguments::parse();
    logging::init(arguments.log_level, arguments.log_file.as_deref())?;

    if arguments.plain {
        DisplayFormat::configure(false, false);
    }

    let mut random = match arguments.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    let searcher = Searcher::new(SearchConfig {
        depth: arguments.depth,
        budget: Duration::from_millis(arguments.budget_ms),
    });

    let mut game = Game::opening();

    for ply in 0..arguments.plies {
        if game.is_over() {
            break;
        }

        let mv = if ply < arguments.random_plies {
            let moves = game.moves();
            moves[random.random_range(0..moves.len())]
        } else {
            let report = searcher.search(&game);
            info!("{} {report}", game.side_to_move());
            report.best.ok_or("search found no move in a live game")?
        };

        if !game.play(mv) {
            return Err(format!("search produced illegal move {mv}").into());
        }

        if !arguments.quiet {
            println!("{}", game.display(DisplayFormat::pretty()));
        }
    }

    if arguments.quiet {
        println!("{}", game.display(DisplayFormat::pretty()));
    }

    match game.outcome() {
        Some(outcome) => println!("{}", outcome.display(DisplayFormat::pretty())),
        None => println!("no result after {} plies", game.history().len()),
    }

    Ok(())
}
