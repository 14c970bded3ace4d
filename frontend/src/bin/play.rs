use clap::{Parser, Subcommand, ValueEnum};
use frontend::command::read_input;
use frontend::logging;
use log::LevelFilter;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Duration;
use xiangqi::controller::{Controller, Mode};
use xiangqi::display_format::DisplayFormat;
use xiangqi::game::Game;
use xiangqi::location::{Location, Move};
use xiangqi::piece::Side;
use xiangqi::search::{SearchConfig, display_ranking};
use xiangqi::snapshot::Snapshot;

#[derive(Parser, Debug)]
struct Arguments {
    #[arg(short, long, value_enum, default_value_t = Opponent::Computer, help = "who plays against you")]
    against: Opponent,

    #[arg(short, long, value_enum, default_value_t = Colour::Black, help = "side played by the computer")]
    computer: Colour,

    #[arg(short, long, default_value_t = 3, help = "search depth in plies")]
    depth: u32,

    #[arg(short, long, default_value_t = 3000, help = "search time budget in milliseconds")]
    budget_ms: u64,

    #[arg(long, default_value_t = false, help = "latin letters instead of chinese glyphs")]
    latin: bool,

    #[arg(long, default_value_t = false, help = "no terminal colours")]
    plain: bool,

    #[arg(long, help = "log level, overrides RUST_LOG")]
    log_level: Option<LevelFilter>,

    #[arg(long, help = "append the log to this file instead of stderr")]
    log_file: Option<PathBuf>,
}

#[derive(ValueEnum, Copy, Clone, Debug)]
enum Opponent {
    Human,
    Computer,
}

#[derive(ValueEnum, Copy, Clone, Debug)]
enum Colour {
    Red,
    Black,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(alias = "p", about = "play a move such as b7e7")]
    Play { mv: Move },
    #[command(about = "list legal moves, of one square if given")]
    Moves { square: Option<Location> },
    #[command(alias = "u", about = "take back the last move")]
    Undo,
    #[command(about = "rank the best moves for the side to play")]
    Hint {
        #[arg(default_value_t = 5)]
        count: usize,
    },
    #[command(about = "start a new game")]
    New,
    #[command(about = "save the game to a file")]
    Save { path: PathBuf },
    #[command(about = "load a game from a file")]
    Load { path: PathBuf },
    #[command(alias = "q")]
    Quit,
}

fn main() -> Result<(), Box<dyn Error>> {
    let arguments = Arguments::parse();
    logging::init(arguments.log_level, arguments.log_file.as_deref())?;

    DisplayFormat::configure(!arguments.latin, !arguments.plain);

    let mode = match arguments.against {
        Opponent::Human => Mode::HumanVsHuman,
        Opponent::Computer => Mode::HumanVsComputer {
            computer: match arguments.computer {
                Colour::Red => Side::Red,
                Colour::Black => Side::Black,
            },
        },
    };

    let config = SearchConfig {
        depth: arguments.depth,
        budget: Duration::from_millis(arguments.budget_ms),
    };

    let mut controller = Controller::new(mode, config);
    let mut show = true;

    loop {
        if controller.is_computer_turn() {
            let reply = controller.respond()?;
            println!("computer played {reply}");
            show = true;
        }

        if show {
            println!("{}", controller.game().display(DisplayFormat::pretty()));
        }
        show = false;

        let Some(command) = read_input::<Command>() else {
            return Ok(());
        };

        match command {
            Command::Play { mv } => match controller.play(mv) {
                Ok(reply) => {
                    if let Some(reply) = reply {
                        println!("computer played {reply}");
                    }
                    show = true;
                }
                Err(err) => println!("{err}"),
            },
            Command::Moves { square } => {
                let game = controller.game();
                let moves = match square {
                    Some(square) => game.moves_from(square),
                    None => game.moves(),
                };
                let moves: Vec<String> = moves.iter().map(Move::to_string).collect();
                println!("{} legal moves: {}", moves.len(), moves.join(" "));
            }
            Command::Undo => match controller.undo() {
                Ok(plies) => {
                    println!("took back {plies} plies");
                    show = true;
                }
                Err(err) => println!("{err}"),
            },
            Command::Hint { count } => {
                let mut ranking = controller.searcher().rank(controller.game());
                ranking.truncate(count);
                println!("{}", display_ranking(&ranking, DisplayFormat::pretty(), controller.game()));
            }
            Command::New => {
                controller.reset();
                show = true;
            }
            Command::Save { path } => match save(controller.game(), &path) {
                Ok(()) => println!("saved to {}", path.display()),
                Err(err) => println!("failed to save: {err}"),
            },
            Command::Load { path } => match load(&path) {
                Ok(game) => {
                    controller.load(game);
                    show = true;
                }
                Err(err) => println!("failed to load: {err}"),
            },
            Command::Quit => return Ok(()),
        }
    }
}

fn save(game: &Game, path: &Path) -> Result<(), Box<dyn Error>> {
    let text = serde_json::to_string_pretty(&game.snapshot())?;
    std::fs::write(path, text)?;
    Ok(())
}

fn load(path: &Path) -> Result<Game, Box<dyn Error>> {
    let text = std::fs::read_to_string(path)?;
    let snapshot: Snapshot = serde_json::from_str(&text)?;
    Ok(Game::restore(&snapshot)?)
}
