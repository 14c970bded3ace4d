//! Fixed depth negamax with alpha-beta pruning.
//!
//! The searcher copies the game's board once and then plays and takes back
//! moves on that single copy; no board is cloned below the root.

use crate::board::Board;
use crate::display_format::DisplayFormat;
use crate::game::Game;
use crate::location::Move;
use crate::piece::{PieceKind, Side};
use log::{debug, warn};
use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};

/// Score of a side that has no legal move left. Far outside anything the
/// material evaluation can reach.
pub const LOSS: i32 = -1_000_000;

const INFINITY: i32 = i32::MAX;

pub const CROSSED_SOLDIER_BONUS: i32 = 20;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    /// Plies searched below the side to move, at least one.
    pub depth: u32,
    /// Wall clock budget, checked between root moves.
    pub budget: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: 3,
            budget: Duration::from_secs(3),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SearchReport {
    pub best: Option<Move>,
    pub score: i32,
    pub depth: u32,
    pub searched: usize,
    pub total: usize,
    pub nodes: u64,
    pub elapsed: Duration,
    pub timed_out: bool,
}

pub struct Searcher {
    config: SearchConfig,
}

struct Context {
    nodes: u64,
}

impl Searcher {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> SearchConfig {
        self.config
    }

    pub fn best_move(&self, game: &Game) -> Option<Move> {
        self.search(game).best
    }

    pub fn best_move_at(&self, game: &Game, depth: u32) -> Option<Move> {
        Self::new(SearchConfig { depth, ..self.config }).best_move(game)
    }

    pub fn search(&self, game: &Game) -> SearchReport {
        let start = Instant::now();
        let depth = self.config.depth.max(1);
        let side = game.side_to_move();

        let mut board = game.board().clone();
        let mut context = Context { nodes: 0 };
        let moves = if game.is_over() { Vec::new() } else { ordered_moves(&mut board, side) };

        let mut report = SearchReport {
            best: None,
            score: LOSS,
            depth,
            searched: 0,
            total: moves.len(),
            nodes: 0,
            elapsed: Duration::ZERO,
            timed_out: false,
        };

        let mut alpha = -INFINITY;
        let beta = INFINITY;

        for &mv in &moves {
            let capture = board.play(mv);
            let value = -negamax(&mut board, depth - 1, -beta, -alpha, side.opponent(), &mut context);
            board.undo(mv, capture);
            report.searched += 1;

            if report.best.is_none() || value > report.score {
                report.best = Some(mv);
                report.score = value;
            }

            alpha = alpha.max(value);
            if alpha >= beta {
                break;
            }

            if start.elapsed() > self.config.budget {
                report.timed_out = report.searched < moves.len();
                break;
            }
        }

        report.nodes = context.nodes;
        report.elapsed = start.elapsed();

        if report.timed_out {
            warn!(
                "search budget of {:?} ran out after {} of {} root moves",
                self.config.budget, report.searched, report.total
            );
        }
        debug!("{report}");

        report
    }

    pub fn rank(&self, game: &Game) -> Vec<(Move, i32)> {
        if game.is_over() {
            return Vec::new();
        }

        let depth = self.config.depth.max(1);
        let side = game.side_to_move();
        let mut board = game.board().clone();
        let mut context = Context { nodes: 0 };

        let mut ranked: Vec<(Move, i32)> = ordered_moves(&mut board, side)
            .into_iter()
            .map(|mv| {
                let capture = board.play(mv);
                let value = -negamax(&mut board, depth - 1, -INFINITY, INFINITY, side.opponent(), &mut context);
                board.undo(mv, capture);
                (mv, value)
            })
            .collect();

        ranked.sort_by_key(|&(_, value)| std::cmp::Reverse(value));
        debug!("ranked {} moves in {} nodes", ranked.len(), context.nodes);
        ranked
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl Display for SearchReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.best {
            Some(mv) => write!(f, "best {mv} score {}", self.score)?,
            None => write!(f, "no move")?,
        }
        write!(
            f,
            " depth {} moves {}/{} nodes {} in {:?}",
            self.depth, self.searched, self.total, self.nodes, self.elapsed
        )
    }
}

/// Negamax value of `board` for `side` searched `depth` plies deep. The
/// board is returned in the state it was given.
pub fn score(board: &mut Board, depth: u32, alpha: i32, beta: i32, side: Side) -> i32 {
    negamax(board, depth, alpha, beta, side, &mut Context { nodes: 0 })
}

fn negamax(board: &mut Board, depth: u32, mut alpha: i32, beta: i32, side: Side, context: &mut Context) -> i32 {
    context.nodes += 1;

    if depth == 0 {
        return evaluate(board, side);
    }

    let moves = ordered_moves(board, side);
    if moves.is_empty() {
        return LOSS;
    }

    let mut best = -INFINITY;
    for mv in moves {
        let capture = board.play(mv);
        let value = -negamax(board, depth - 1, -beta, -alpha, side.opponent(), context);
        board.undo(mv, capture);

        best = best.max(value);
        alpha = alpha.max(value);
        if alpha >= beta {
            break;
        }
    }

    best
}

pub fn ordered_moves(board: &mut Board, side: Side) -> Vec<Move> {
    let mut moves = board.legal_moves(side);
    moves.sort_by_key(|mv| std::cmp::Reverse(board[mv.to].map_or(0, |victim| victim.kind().value())));
    moves
}

pub fn evaluate(board: &Board, side: Side) -> i32 {
    board
        .iter()
        .map(|(location, piece)| {
            let mut value = piece.kind().value();
            if piece.kind() == PieceKind::Soldier && location.across_river(piece.side()) {
                value += CROSSED_SOLDIER_BONUS;
            }
            if piece.side() == side { value } else { -value }
        })
        .sum()
}

pub fn display_ranking(ranking: &[(Move, i32)], format: DisplayFormat, game: &Game) -> String {
    ranking
        .iter()
        .map(|&(mv, value)| {
            let piece = game.board()[mv.from].map(|piece| piece.display(format.with_concise(true)).to_string());
            format!("{} {mv} {value}", piece.unwrap_or_default())
        })
        .collect::<Vec<_>>()
        .join("\n")
}
