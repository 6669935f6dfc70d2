//! Piece mobility and central control.
//!
//! Mobility counts the destination squares of each piece's legal moves, so
//! a pinned piece earns nothing. Moves landing on d4, e4, d5 or e5 earn an
//! extra bonus.

use kibitz_core::{Color, PieceKind, SquareSet};

use crate::eval::board::EvalBoard;
use crate::eval::score::{S, Score};

/// Per-square bonus indexed by [`PieceKind::index`].
const MOBILITY: [Score; PieceKind::COUNT] = [
    S(1, 1),
    S(4, 4),
    S(3, 5),
    S(2, 4),
    S(1, 2),
    S(0, 3),
];

/// Bonus per central square a piece can move to.
const CENTER_CONTROL: Score = S(6, 2);

fn side_mobility(board: &EvalBoard, color: Color) -> Score {
    let mut score = Score::ZERO;
    for sq in board.side(color) {
        let Some(piece) = board.piece_on(sq) else {
            continue;
        };
        let reach = board.reach(sq);
        score += MOBILITY[piece.kind.index()] * reach.count() as i32;
        score += CENTER_CONTROL * (reach & SquareSet::CENTER).count() as i32;
    }
    score
}

/// Mobility balance, White-relative.
pub fn mobility(board: &EvalBoard) -> Score {
    side_mobility(board, Color::White) - side_mobility(board, Color::Black)
}

#[cfg(test)]
mod tests {
    use kibitz_core::{ChessPosition, Color};

    use super::*;

    fn board(fen: &str) -> EvalBoard {
        EvalBoard::capture(&ChessPosition::from_fen(fen).unwrap())
    }

    #[test]
    fn startpos_is_balanced() {
        assert_eq!(mobility(&board(kibitz_core::STARTING_FEN)), Score::ZERO);
    }

    #[test]
    fn centralised_knight_is_more_mobile() {
        let center = board("4k3/8/8/8/4N3/8/8/4K3 w - - 0 1");
        let corner = board("4k3/8/8/8/8/8/8/N3K3 w - - 0 1");
        assert!(
            side_mobility(&center, Color::White).mg > side_mobility(&corner, Color::White).mg
        );
    }

    #[test]
    fn center_control_counts() {
        // Knight on f3: seven moves, d4 and e5 among them. King on e1: five.
        let b = board("4k3/8/8/8/8/5N2/8/4K3 w - - 0 1");
        let expected = MOBILITY[PieceKind::Knight.index()] * 7
            + MOBILITY[PieceKind::King.index()] * 5
            + CENTER_CONTROL * 2;
        assert_eq!(side_mobility(&b, Color::White), expected);
    }

    #[test]
    fn pinned_knight_earns_nothing() {
        // The e7 rook pins the e2 knight to the e1 king; with the king on d1
        // the knight is free. Both kings have four moves.
        let pinned = board("4k3/4r3/8/8/8/8/4N3/4K3 w - - 0 1");
        let free = board("4k3/4r3/8/8/8/8/4N3/3K4 w - - 0 1");
        let king = MOBILITY[PieceKind::King.index()] * 4;
        assert_eq!(side_mobility(&pinned, Color::White), king);
        assert_eq!(
            side_mobility(&free, Color::White),
            king + MOBILITY[PieceKind::Knight.index()] * 6 + CENTER_CONTROL
        );
        assert!(mobility(&pinned).mg < mobility(&free).mg);
    }

    #[test]
    fn pawns_and_kings_are_counted() {
        let b = board("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1");
        // e2 pawn: e3 and e4. King: d1, d2, f1, f2.
        let expected = MOBILITY[PieceKind::Pawn.index()] * 2
            + CENTER_CONTROL
            + MOBILITY[PieceKind::King.index()] * 4;
        assert_eq!(side_mobility(&b, Color::White), expected);
    }
}
