//! Rook coordination and file placement.

use kibitz_core::{Color, PieceKind, Square};

use crate::eval::board::EvalBoard;
use crate::eval::score::{S, Score};

/// Two rooks defending each other along a rank or file.
const CONNECTED_ROOKS: Score = S(15, 10);

/// No pawns of either colour on the rook's file.
const OPEN_FILE: Score = S(20, 10);

/// No own pawns on the rook's file.
const SEMI_OPEN_FILE: Score = S(10, 5);

fn pawns_on_file(board: &EvalBoard, color: Color, file: u8) -> bool {
    board.pieces(color, PieceKind::Pawn).any(|sq| sq.file() == file)
}

fn side_rooks(board: &EvalBoard, color: Color) -> Score {
    let rooks: Vec<Square> = board.pieces(color, PieceKind::Rook).collect();
    let mut score = Score::ZERO;

    for &rook in &rooks {
        let own = pawns_on_file(board, color, rook.file());
        let enemy = pawns_on_file(board, !color, rook.file());
        if !own && !enemy {
            score += OPEN_FILE;
        } else if !own {
            score += SEMI_OPEN_FILE;
        }
    }

    if let [first, second, ..] = rooks.as_slice() {
        if board.attacks(*first).contains(*second) {
            score += CONNECTED_ROOKS;
        }
    }
    score
}

/// Rook placement balance, White-relative.
pub fn rooks(board: &EvalBoard) -> Score {
    side_rooks(board, Color::White) - side_rooks(board, Color::Black)
}
