use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use xiangqi::game::Game;
use xiangqi::location::{Location, Move};
use xiangqi::piece::{PieceKind, Side};
use xiangqi::search::{SearchConfig, Searcher, evaluate};

const GAMES: u64 = 12;
const PLIES: usize = 120;

fn state(game: &Game) -> impl PartialEq + std::fmt::Debug + use<> {
    (game.fen(), game.history().to_vec(), game.outcome())
}

fn random_square(random: &mut StdRng) -> Location {
    Location::new(random.random_range(0..10), random.random_range(0..9)).unwrap()
}

/// Plays random legal moves, checking the invariants before every ply.
fn playout(seed: u64, mut check: impl FnMut(&mut Game, &mut StdRng)) -> Game {
    let mut random = StdRng::seed_from_u64(seed);
    let mut game = Game::opening();

    for _ in 0..PLIES {
        check(&mut game, &mut random);

        let moves = game.moves();
        if moves.is_empty() {
            break;
        }
        let mv = moves[random.random_range(0..moves.len())];
        assert!(game.play(mv), "listed move {mv} was rejected");
    }

    game
}

#[test]
fn every_reachable_state_has_one_king_per_side() {
    for seed in 0..GAMES {
        playout(seed, |game, _| {
            for side in [Side::Red, Side::Black] {
                assert_eq!(game.board().count(PieceKind::King, side), 1);
            }
        });
    }
}

#[test]
fn rejected_moves_change_nothing() {
    for seed in 0..GAMES {
        playout(seed, |game, random| {
            let legal = game.moves();
            for _ in 0..20 {
                let mv = Move::new(random_square(random), random_square(random));
                if legal.contains(&mv) {
                    continue;
                }

                let before = state(game);
                assert!(!game.attempt_move(mv.from, mv.to), "{mv} should be rejected");
                assert_eq!(state(game), before);
            }
        });
    }
}

#[test]
fn undo_restores_the_exact_state() {
    for seed in 0..GAMES {
        playout(seed, |game, _| {
            let before = state(game);
            let side = game.side_to_move();

            for mv in game.moves() {
                let captured = game.board()[mv.to];
                assert!(game.play(mv));
                assert_eq!(game.side_to_move(), side.opponent());

                let ply = game.undo().unwrap();
                assert_eq!(ply.mv, mv);
                assert_eq!(ply.captured, captured);
                assert_eq!(state(game), before);
            }
        });
    }
}

#[test]
fn terminal_exactly_when_no_legal_move() {
    for seed in 0..GAMES {
        let game = playout(seed, |game, _| {
            let side = game.side_to_move();
            let no_moves = game.board().clone().legal_moves(side).is_empty();
            assert_eq!(game.is_over(), no_moves);
            if no_moves {
                assert_eq!(game.winner(), Some(side.opponent()));
            }
        });

        if game.moves().is_empty() {
            assert!(game.is_over());
        }
    }
}

#[test]
fn shallow_search_always_suggests_a_legal_move() {
    let searcher = Searcher::new(SearchConfig {
        depth: 1,
        budget: Duration::from_secs(60),
    });

    for seed in 0..GAMES {
        let mut ply = 0;
        playout(seed, |game, _| {
            ply += 1;
            if ply % 8 != 0 || game.is_over() {
                return;
            }

            let best = searcher.best_move(game).expect("live game has a move");
            assert!(game.clone().play(best), "search suggested illegal {best}");
        });
    }
}

#[test]
fn evaluation_is_symmetric() {
    for seed in 0..GAMES {
        playout(seed, |game, _| {
            let board = game.board();
            for side in [Side::Red, Side::Black] {
                assert_eq!(evaluate(board, side), evaluate(&board.mirror(), side.opponent()));
                assert_eq!(evaluate(board, side), -evaluate(board, side.opponent()));
            }
        });
    }
}
