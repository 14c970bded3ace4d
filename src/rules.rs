//! Movement rules. Everything here works on a bare [`Board`] so that the game
//! and the search share one implementation of piece geometry and safety.

use crate::board::Board;
use crate::location::{Location, Move};
use crate::piece::{PieceKind, Side};

const ORTHOGONAL: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const HORSE: [(i8, i8); 8] = [(2, 1), (2, -1), (-2, 1), (-2, -1), (1, 2), (1, -2), (-1, 2), (-1, -2)];

impl Board {
    /// Checks the geometry and obstruction rules of the piece standing on
    /// `mv.from`, ignoring whose turn it is and whether its own king ends up
    /// exposed.
    pub fn is_pseudo_legal(&self, mv: Move) -> bool {
        if mv.from == mv.to {
            return false;
        }

        let Some(piece) = self[mv.from] else {
            return false;
        };

        let side = piece.side();
        if self[mv.to].is_some_and(|target| target.side() == side) {
            return false;
        }

        let rows = mv.to.row() - mv.from.row();
        let cols = mv.to.col() - mv.from.col();
        let straight = rows == 0 || cols == 0;

        match piece.kind() {
            PieceKind::King => rows.abs() + cols.abs() == 1 && mv.to.in_palace(side),
            PieceKind::Advisor => rows.abs() == 1 && cols.abs() == 1 && mv.to.in_palace(side),
            PieceKind::Elephant => {
                rows.abs() == 2
                    && cols.abs() == 2
                    && !mv.to.across_river(side)
                    && mv.from.shift(rows / 2, cols / 2).is_some_and(|eye| self[eye].is_none())
            }
            PieceKind::Horse => {
                let leg = match (rows.abs(), cols.abs()) {
                    (2, 1) => mv.from.shift(rows.signum(), 0),
                    (1, 2) => mv.from.shift(0, cols.signum()),
                    _ => return false,
                };
                leg.is_some_and(|leg| self[leg].is_none())
            }
            PieceKind::Chariot => straight && self.count_between(mv.from, mv.to) == 0,
            PieceKind::Cannon => {
                let screens = if self[mv.to].is_some() { 1 } else { 0 };
                straight && self.count_between(mv.from, mv.to) == screens
            }
            PieceKind::Soldier => {
                if rows.abs() + cols.abs() != 1 {
                    false
                } else if rows == side.forward() {
                    true
                } else {
                    rows == 0 && mv.from.across_river(side)
                }
            }
        }
    }

    pub fn is_square_attacked(&self, square: Location, attacker: Side) -> bool {
        self.pieces(attacker)
            .any(|(from, _)| self.is_pseudo_legal(Move::new(from, square)))
    }

    pub fn in_check(&self, side: Side) -> bool {
        match self.find_king(side) {
            Some(king) => self.is_square_attacked(king, side.opponent()),
            None => unreachable!("{side} king is missing from the board"),
        }
    }

    pub fn kings_facing(&self) -> bool {
        let (Some(red), Some(black)) = (self.find_king(Side::Red), self.find_king(Side::Black)) else {
            return false;
        };
        red.col() == black.col() && self.count_between(red, black) == 0
    }

    pub fn is_safe(&self, side: Side) -> bool {
        !self.in_check(side) && !self.kings_facing()
    }

    pub fn leaves_safe(&mut self, mv: Move) -> bool {
        let Some(piece) = self[mv.from] else {
            return false;
        };

        let capture = self.play(mv);
        let safe = self.is_safe(piece.side());
        self.undo(mv, capture);
        safe
    }

    pub fn is_legal(&mut self, mv: Move) -> bool {
        self.is_pseudo_legal(mv) && self.leaves_safe(mv)
    }

    pub fn fill_pseudo_legal(&self, from: Location, moves: &mut Vec<Move>) {
        let Some(piece) = self[from] else {
            return;
        };

        let mut push = |to: Option<Location>| {
            if let Some(to) = to
                && self.is_pseudo_legal(Move::new(from, to))
            {
                moves.push(Move::new(from, to));
            }
        };

        match piece.kind() {
            PieceKind::King | PieceKind::Soldier => {
                for (rows, cols) in ORTHOGONAL {
                    push(from.shift(rows, cols));
                }
            }
            PieceKind::Advisor => {
                for (rows, cols) in DIAGONAL {
                    push(from.shift(rows, cols));
                }
            }
            PieceKind::Elephant => {
                for (rows, cols) in DIAGONAL {
                    push(from.shift(rows * 2, cols * 2));
                }
            }
            PieceKind::Horse => {
                for (rows, cols) in HORSE {
                    push(from.shift(rows, cols));
                }
            }
            PieceKind::Chariot | PieceKind::Cannon => {
                for (rows, cols) in ORTHOGONAL {
                    let mut to = from.shift(rows, cols);
                    while let Some(location) = to {
                        push(to);
                        to = location.shift(rows, cols);
                    }
                }
            }
        }
    }

    pub fn pseudo_legal_moves(&self, side: Side) -> Vec<Move> {
        let mut moves = Vec::new();
        for (from, _) in self.pieces(side) {
            self.fill_pseudo_legal(from, &mut moves);
        }
        moves
    }

    pub fn legal_moves(&mut self, side: Side) -> Vec<Move> {
        let mut moves = self.pseudo_legal_moves(side);
        moves.retain(|&mv| self.leaves_safe(mv));
        moves
    }

    pub fn legal_moves_from(&mut self, from: Location) -> Vec<Move> {
        let mut moves = Vec::new();
        self.fill_pseudo_legal(from, &mut moves);
        moves.retain(|&mv| self.leaves_safe(mv));
        moves
    }

    pub fn has_any_legal_move(&mut self, side: Side) -> bool {
        let mut moves = Vec::new();
        for from in Location::all() {
            if !self[from].is_some_and(|piece| piece.side() == side) {
                continue;
            }

            moves.clear();
            self.fill_pseudo_legal(from, &mut moves);
            if moves.iter().any(|&mv| self.leaves_safe(mv)) {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::Piece;

    fn at(row: i8, col: i8) -> Location {
        Location::new(row, col).unwrap()
    }

    fn mv(from: (i8, i8), to: (i8, i8)) -> Move {
        Move::new(at(from.0, from.1), at(to.0, to.1))
    }

    fn board(fen: &str) -> Board {
        Board::from_fen(fen).unwrap()
    }

    #[test]
    fn opening_has_forty_four_moves() {
        let mut board = Board::opening();
        assert_eq!(board.legal_moves(Side::Red).len(), 44);
        assert_eq!(board.legal_moves(Side::Black).len(), 44);
        assert_eq!(board, Board::opening());
    }

    #[test]
    fn soldier_moves_forward_then_sideways() {
        let before = board("3k5/9/9/9/9/9/4P4/9/9/4K4");
        assert!(before.is_pseudo_legal(mv((6, 4), (5, 4))));
        assert!(!before.is_pseudo_legal(mv((6, 4), (6, 3))));
        assert!(!before.is_pseudo_legal(mv((6, 4), (6, 5))));
        assert!(!before.is_pseudo_legal(mv((6, 4), (7, 4))));
        assert!(!before.is_pseudo_legal(mv((6, 4), (4, 4))));

        let after = board("3k5/9/9/9/4P4/9/9/9/9/4K4");
        assert!(after.is_pseudo_legal(mv((4, 4), (3, 4))));
        assert!(after.is_pseudo_legal(mv((4, 4), (4, 3))));
        assert!(after.is_pseudo_legal(mv((4, 4), (4, 5))));
        assert!(!after.is_pseudo_legal(mv((4, 4), (5, 4))));
        assert!(!after.is_pseudo_legal(mv((4, 4), (4, 2))));
    }

    #[test]
    fn black_soldier_moves_down_the_board() {
        let before = board("3k5/9/9/4p4/9/9/9/9/9/4K4");
        assert!(before.is_pseudo_legal(mv((3, 4), (4, 4))));
        assert!(!before.is_pseudo_legal(mv((3, 4), (2, 4))));
        assert!(!before.is_pseudo_legal(mv((3, 4), (3, 3))));

        let after = board("3k5/9/9/9/9/4p4/9/9/9/3K5");
        assert!(after.is_pseudo_legal(mv((5, 4), (5, 3))));
        assert!(after.is_pseudo_legal(mv((5, 4), (6, 4))));
        assert!(!after.is_pseudo_legal(mv((5, 4), (4, 4))));
    }

    #[test]
    fn cannon_needs_a_screen_and_chariot_never_jumps() {
        let chariot = board("3k5/9/9/9/9/R3p3h/9/9/9/4K4");
        assert!(!chariot.is_pseudo_legal(mv((5, 0), (5, 8))));
        assert!(chariot.is_pseudo_legal(mv((5, 0), (5, 4))));
        assert!(chariot.is_pseudo_legal(mv((5, 0), (5, 3))));

        let cannon = board("3k5/9/9/9/9/C3p3h/9/9/9/4K4");
        assert!(cannon.is_pseudo_legal(mv((5, 0), (5, 8))));
        assert!(!cannon.is_pseudo_legal(mv((5, 0), (5, 4))));
        assert!(cannon.is_pseudo_legal(mv((5, 0), (5, 3))));
        assert!(!cannon.is_pseudo_legal(mv((5, 0), (5, 6))));
        assert!(!cannon.is_pseudo_legal(mv((5, 0), (4, 1))));
    }

    #[test]
    fn cannon_cannot_capture_over_two_screens() {
        let board = board("3k5/9/9/9/9/C1P1p3h/9/9/9/4K4");
        assert!(!board.is_pseudo_legal(mv((5, 0), (5, 8))));
        assert!(board.is_pseudo_legal(mv((5, 0), (5, 4))));
    }

    #[test]
    fn horse_leg_can_be_blocked() {
        let open = board("3k5/9/9/9/9/9/9/4H4/9/4K4");
        assert!(open.is_pseudo_legal(mv((7, 4), (5, 3))));
        assert!(open.is_pseudo_legal(mv((7, 4), (6, 2))));
        assert!(!open.is_pseudo_legal(mv((7, 4), (5, 6))));

        let blocked = board("3k5/9/9/9/9/9/4P4/3PH4/9/4K4");
        assert!(!blocked.is_pseudo_legal(mv((7, 4), (5, 3))));
        assert!(!blocked.is_pseudo_legal(mv((7, 4), (5, 5))));
        assert!(!blocked.is_pseudo_legal(mv((7, 4), (6, 2))));
        assert!(blocked.is_pseudo_legal(mv((7, 4), (6, 6))));
    }

    #[test]
    fn elephant_stays_home_and_respects_its_eye() {
        let board = board("3k5/9/9/9/9/2E6/9/9/9/2E1K4");
        assert!(board.is_pseudo_legal(mv((9, 2), (7, 4))));
        assert!(board.is_pseudo_legal(mv((9, 2), (7, 0))));
        assert!(!board.is_pseudo_legal(mv((5, 2), (3, 4))));
        assert!(board.is_pseudo_legal(mv((5, 2), (7, 4))));

        let blocked = Board::from_fen("3k5/9/9/9/9/9/9/9/3P5/2E1K4").unwrap();
        assert!(!blocked.is_pseudo_legal(mv((9, 2), (7, 4))));
        assert!(blocked.is_pseudo_legal(mv((9, 2), (7, 0))));
    }

    #[test]
    fn king_and_advisor_stay_in_the_palace() {
        let board = board("3k5/9/9/9/9/9/9/3A5/9/3K5");
        assert!(board.is_pseudo_legal(mv((9, 3), (9, 4))));
        assert!(board.is_pseudo_legal(mv((9, 3), (8, 3))));
        assert!(!board.is_pseudo_legal(mv((9, 3), (9, 2))));
        assert!(!board.is_pseudo_legal(mv((9, 3), (8, 4))));
        assert!(board.is_pseudo_legal(mv((7, 3), (8, 4))));
        assert!(!board.is_pseudo_legal(mv((7, 3), (6, 2))));
        assert!(!board.is_pseudo_legal(mv((7, 3), (6, 4))));
    }

    #[test]
    fn cannot_capture_own_piece_or_move_empty_square() {
        let board = Board::opening();
        assert!(!board.is_pseudo_legal(mv((9, 0), (9, 1))));
        assert!(!board.is_pseudo_legal(mv((5, 0), (4, 0))));
        assert!(!board.is_pseudo_legal(mv((9, 0), (9, 0))));
    }

    #[test]
    fn detects_attacks_and_check() {
        let board = board("4k4/9/3H5/9/9/9/9/9/9/3K5");
        assert!(board.is_square_attacked(at(0, 4), Side::Red));
        assert!(board.in_check(Side::Black));
        assert!(!board.in_check(Side::Red));

        let blocked = Board::from_fen("4k4/3a5/3H5/9/9/9/9/9/9/3K5").unwrap();
        assert!(!blocked.in_check(Side::Black));
    }

    #[test]
    fn detects_facing_kings() {
        assert!(board("4k4/9/9/9/9/9/9/9/9/4K4").kings_facing());
        assert!(!board("4k4/9/9/9/4p4/9/9/9/9/4K4").kings_facing());
        assert!(!board("4k4/9/9/9/9/9/9/9/9/3K5").kings_facing());
    }

    #[test]
    fn pinned_pieces_may_only_slide_along_the_file() {
        let mut cannon = board("4k4/9/9/9/4C4/9/9/9/9/4K4");
        let moves = cannon.legal_moves_from(at(4, 4));
        assert!(!moves.is_empty());
        assert!(moves.iter().all(|mv| mv.to.col() == 4));
        assert!(!cannon.is_legal(mv((4, 4), (4, 0))));
        assert!(cannon.is_legal(mv((4, 4), (1, 4))));

        let mut horse = board("4k4/9/9/9/4H4/9/9/9/9/4K4");
        let mut pseudo = Vec::new();
        horse.fill_pseudo_legal(at(4, 4), &mut pseudo);
        assert_eq!(pseudo.len(), 8);
        assert!(horse.legal_moves_from(at(4, 4)).is_empty());
    }

    #[test]
    fn king_cannot_step_into_the_open_file() {
        let mut board = board("4k4/9/9/9/9/9/9/9/9/3K5");
        assert!(board.is_pseudo_legal(mv((9, 3), (9, 4))));
        assert!(!board.leaves_safe(mv((9, 3), (9, 4))));
        assert!(board.is_legal(mv((9, 3), (8, 3))));
    }

    #[test]
    fn mated_side_has_no_legal_move() {
        let mut board = board("R3k4/8R/9/9/9/9/9/9/9/3K5");
        assert!(board.in_check(Side::Black));
        assert!(!board.has_any_legal_move(Side::Black));
        assert!(board.legal_moves(Side::Black).is_empty());
        assert!(board.has_any_legal_move(Side::Red));
    }

    #[test]
    fn stalemated_side_has_no_legal_move() {
        let mut board = board("4k4/R8/9/9/9/5R3/9/9/9/3K5");
        assert!(!board.in_check(Side::Black));
        assert!(!board.has_any_legal_move(Side::Black));
    }

    #[test]
    fn legal_move_generation_matches_brute_force() {
        let mut board = Board::from_fen("r1eakae2/4h4/1c2c1h2/p1p1p1p1p/9/2P6/P3P1P1P/1C2C2H1/9/RHEAKAE1R").unwrap();
        for side in [Side::Red, Side::Black] {
            let generated = board.legal_moves(side);

            let mut expected = Vec::new();
            for from in Location::all() {
                if board[from].is_none_or(|piece: Piece| piece.side() != side) {
                    continue;
                }
                for to in Location::all() {
                    let candidate = Move::new(from, to);
                    if board.is_legal(candidate) {
                        expected.push(candidate);
                    }
                }
            }

            assert_eq!(generated.len(), expected.len());
            assert!(expected.iter().all(|mv| generated.contains(mv)));
        }
    }
}
