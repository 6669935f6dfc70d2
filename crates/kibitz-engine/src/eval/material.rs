//! Material balance.
//!
//! Scores are White-relative (positive = White ahead).

use kibitz_core::{Color, PieceKind};

use crate::eval::board::EvalBoard;
use crate::eval::score::{S, Score};

/// Material values indexed by [`PieceKind::index`].
///
/// | Piece  | mg  | eg  |
/// |--------|-----|-----|
/// | Pawn   | 100 | 120 |
/// | Knight | 320 | 280 |
/// | Bishop | 330 | 320 |
/// | Rook   | 500 | 520 |
/// | Queen  | 900 | 920 |
/// | King   |   0 |   0 |
///
/// The king is never traded; its growing endgame worth lives in its
/// piece-square table.
pub const MATERIAL_VALUE: [Score; PieceKind::COUNT] = [
    S(100, 120),
    S(320, 280),
    S(330, 320),
    S(500, 520),
    S(900, 920),
    S(0, 0),
];

/// Middlegame value of a piece, with a king counted above everything else.
/// Used to rank victims and attackers.
pub const fn piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::King => 10_000,
        _ => MATERIAL_VALUE[kind.index()].mg,
    }
}

const BISHOP_PAIR: Score = S(30, 50);

/// Material balance plus the bishop-pair bonus.
pub fn material(board: &EvalBoard) -> Score {
    let mut score = Score::ZERO;
    for color in Color::ALL {
        let mut side = Score::ZERO;
        for kind in PieceKind::ALL {
            side += MATERIAL_VALUE[kind.index()] * board.count(color, kind) as i32;
        }
        if board.count(color, PieceKind::Bishop) >= 2 {
            side += BISHOP_PAIR;
        }
        score += side * color.sign();
    }
    score
}
