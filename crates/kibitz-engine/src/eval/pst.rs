//! Piece-square tables.
//!
//! Tables are written as the board is seen from White's side, rank 8 on the
//! first row, so a White piece on square `sq` reads entry `sq ^ 56` and a
//! Black piece reads entry `sq` directly. Knights, bishops, rooks and queens
//! share one table across both phases; pawns and kings have separate
//! middlegame and endgame tables.

use kibitz_core::{Color, PieceKind, Square};

use crate::eval::board::EvalBoard;
use crate::eval::score::{S, Score};

/// Divisor applied to the summed tables so positional terms stay well
/// below material.
pub const PST_SCALE: i32 = 2;

#[rustfmt::skip]
const PAWN_MG: [i8; 64] = [
     0,   0,   0,   0,   0,   0,   0,   0,
    50,  50,  50,  50,  50,  50,  50,  50,
    10,  10,  20,  30,  30,  20,  10,  10,
     5,   5,  10,  25,  25,  10,   5,   5,
     0,   0,   0,  20,  20,   0,   0,   0,
     5,  -5, -10,   0,   0, -10,  -5,   5,
     5,  10,  10, -20, -20,  10,  10,   5,
     0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const PAWN_EG: [i8; 64] = [
     0,   0,   0,   0,   0,   0,   0,   0,
    80,  80,  80,  80,  80,  80,  80,  80,
    50,  50,  50,  50,  50,  50,  50,  50,
    30,  30,  30,  30,  30,  30,  30,  30,
    15,  15,  15,  15,  15,  15,  15,  15,
     5,   5,   5,   5,   5,   5,   5,   5,
     0,   0,   0,   0,   0,   0,   0,   0,
     0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const KNIGHT: [i8; 64] = [
   -50, -40, -30, -30, -30, -30, -40, -50,
   -40, -20,   0,   0,   0,   0, -20, -40,
   -30,   0,  10,  15,  15,  10,   0, -30,
   -30,   5,  15,  20,  20,  15,   5, -30,
   -30,   0,  15,  20,  20,  15,   0, -30,
   -30,   5,  10,  15,  15,  10,   5, -30,
   -40, -20,   0,   5,   5,   0, -20, -40,
   -50, -40, -30, -30, -30, -30, -40, -50,
];

#[rustfmt::skip]
const BISHOP: [i8; 64] = [
   -20, -10, -10, -10, -10, -10, -10, -20,
   -10,   0,   0,   0,   0,   0,   0, -10,
   -10,   0,   5,  10,  10,   5,   0, -10,
   -10,   5,   5,  10,  10,   5,   5, -10,
   -10,   0,  10,  10,  10,  10,   0, -10,
   -10,  10,  10,  10,  10,  10,  10, -10,
   -10,   5,   0,   0,   0,   0,   5, -10,
   -20, -10, -10, -10, -10, -10, -10, -20,
];

#[rustfmt::skip]
const ROOK: [i8; 64] = [
     0,   0,   0,   0,   0,   0,   0,   0,
     5,  10,  10,  10,  10,  10,  10,   5,
    -5,   0,   0,   0,   0,   0,   0,  -5,
    -5,   0,   0,   0,   0,   0,   0,  -5,
    -5,   0,   0,   0,   0,   0,   0,  -5,
    -5,   0,   0,   0,   0,   0,   0,  -5,
    -5,   0,   0,   0,   0,   0,   0,  -5,
     0,   0,   0,   5,   5,   0,   0,   0,
];

#[rustfmt::skip]
const QUEEN: [i8; 64] = [
   -20, -10, -10,  -5,  -5, -10, -10, -20,
   -10,   0,   0,   0,   0,   0,   0, -10,
   -10,   0,   5,   5,   5,   5,   0, -10,
    -5,   0,   5,   5,   5,   5,   0,  -5,
     0,   0,   5,   5,   5,   5,   0,  -5,
   -10,   5,   5,   5,   5,   5,   0, -10,
   -10,   0,   5,   0,   0,   0,   0, -10,
   -20, -10, -10,  -5,  -5, -10, -10, -20,
];

#[rustfmt::skip]
const KING_MG: [i8; 64] = [
   -30, -40, -40, -50, -50, -40, -40, -30,
   -30, -40, -40, -50, -50, -40, -40, -30,
   -30, -40, -40, -50, -50, -40, -40, -30,
   -30, -40, -40, -50, -50, -40, -40, -30,
   -20, -30, -30, -40, -40, -30, -30, -20,
   -10, -20, -20, -20, -20, -20, -20, -10,
    20,  20,   0,   0,   0,   0,  20,  20,
    20,  30,  10,   0,   0,  10,  30,  20,
];

#[rustfmt::skip]
const KING_EG: [i8; 64] = [
   -50, -40, -30, -20, -20, -30, -40, -50,
   -30, -20, -10,   0,   0, -10, -20, -30,
   -30, -10,  20,  30,  30,  20, -10, -30,
   -30, -10,  30,  40,  40,  30, -10, -30,
   -30, -10,  30,  40,  40,  30, -10, -30,
   -30, -10,  20,  30,  30,  20, -10, -30,
   -30, -30,   0,   0,   0,   0, -30, -30,
   -50, -30, -30, -30, -30, -30, -30, -50,
];

const MG_TABLES: [&[i8; 64]; PieceKind::COUNT] = [&PAWN_MG, &KNIGHT, &BISHOP, &ROOK, &QUEEN, &KING_MG];
const EG_TABLES: [&[i8; 64]; PieceKind::COUNT] = [&PAWN_EG, &KNIGHT, &BISHOP, &ROOK, &QUEEN, &KING_EG];

/// Table entry for a `color` piece of `kind` on `sq`, from that piece's
/// own point of view (unscaled).
#[inline]
pub fn pst_value(kind: PieceKind, color: Color, sq: Square) -> Score {
    let idx = match color {
        Color::White => sq.flip_rank().index(),
        Color::Black => sq.index(),
    };
    let k = kind.index();
    S(MG_TABLES[k][idx] as i32, EG_TABLES[k][idx] as i32)
}

/// Summed, scaled piece-square score, White-relative.
pub fn pst(board: &EvalBoard) -> Score {
    let mut score = Score::ZERO;
    for color in Color::ALL {
        for sq in board.side(color) {
            if let Some(piece) = board.piece_on(sq) {
                score += pst_value(piece.kind, color, sq) * color.sign();
            }
        }
    }
    Score::new(score.mg / PST_SCALE, score.eg / PST_SCALE)
}

#[cfg(test)]
mod tests {
    use kibitz_core::{ChessPosition, Color, PieceKind, Square};

    use super::*;

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    #[test]
    fn colors_mirror() {
        for kind in PieceKind::ALL {
            for s in Square::all() {
                assert_eq!(
                    pst_value(kind, Color::White, s),
                    pst_value(kind, Color::Black, s.flip_rank()),
                    "{kind:?} on {s}"
                );
            }
        }
    }

    #[test]
    fn central_knight_beats_rim_knight() {
        let center = pst_value(PieceKind::Knight, Color::White, sq("e4"));
        let rim = pst_value(PieceKind::Knight, Color::White, sq("a1"));
        assert!(center.mg > rim.mg);
    }

    #[test]
    fn pawn_rewards_advance_in_endgame() {
        let seventh = pst_value(PieceKind::Pawn, Color::White, sq("e7"));
        let second = pst_value(PieceKind::Pawn, Color::White, sq("e2"));
        assert!(seventh.eg > second.eg);
        let black_second = pst_value(PieceKind::Pawn, Color::Black, sq("e2"));
        assert_eq!(black_second, seventh);
    }

    #[test]
    fn king_prefers_shelter_then_center() {
        let castled = pst_value(PieceKind::King, Color::White, sq("g1"));
        let central = pst_value(PieceKind::King, Color::White, sq("e4"));
        assert!(castled.mg > central.mg);
        assert!(central.eg > castled.eg);
    }

    #[test]
    fn startpos_is_balanced() {
        let board = EvalBoard::capture(&ChessPosition::startpos());
        assert_eq!(pst(&board), Score::ZERO);
    }
}
