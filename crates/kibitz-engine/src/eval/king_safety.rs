//! King safety: pawn shield and pressure on the king zone.

use kibitz_core::{Color, PieceKind, Square};

use crate::eval::board::EvalBoard;
use crate::eval::score::{S, Score};

/// Own pawn directly in front of the king (same or adjacent file).
const SHIELD_NEAR: Score = S(15, 0);

/// Own pawn two ranks in front of the king.
const SHIELD_FAR: Score = S(8, 0);

/// Penalty per king-adjacent square attacked by the enemy.
const ZONE_ATTACK: Score = S(-8, -2);

fn shield(board: &EvalBoard, color: Color, king: Square) -> Score {
    // Only a king still on its back two ranks hides behind pawns.
    if king.relative_rank(color) > 1 {
        return Score::ZERO;
    }
    let forward: i8 = if color == Color::White { 1 } else { -1 };
    let mut score = Score::ZERO;
    for df in -1..=1 {
        for (steps, bonus) in [(1, SHIELD_NEAR), (2, SHIELD_FAR)] {
            let Some(sq) = king.offset(df, forward * steps) else {
                continue;
            };
            let own_pawn = board
                .piece_on(sq)
                .is_some_and(|p| p.color == color && p.kind == PieceKind::Pawn);
            if own_pawn {
                score += bonus;
                break;
            }
        }
    }
    score
}

fn zone_pressure(board: &EvalBoard, color: Color, king: Square) -> Score {
    let enemy = board.attacked_by(!color);
    let attacked = board.attacks(king) & enemy;
    ZONE_ATTACK * attacked.count() as i32
}

fn side_safety(board: &EvalBoard, color: Color) -> Score {
    match board.king_square(color) {
        Some(king) => shield(board, color, king) + zone_pressure(board, color, king),
        None => Score::ZERO,
    }
}

/// King safety balance, White-relative.
pub fn king_safety(board: &EvalBoard) -> Score {
    side_safety(board, Color::White) - side_safety(board, Color::Black)
}

#[cfg(test)]
mod tests {
    use kibitz_core::ChessPosition;

    use super::*;

    fn board(fen: &str) -> EvalBoard {
        EvalBoard::capture(&ChessPosition::from_fen(fen).unwrap())
    }

    #[test]
    fn full_shield_after_castling() {
        let b = board("6k1/8/8/8/8/8/5PPP/6K1 w - - 0 1");
        let king = b.king_square(Color::White).unwrap();
        assert_eq!(shield(&b, Color::White, king), SHIELD_NEAR * 3);
    }

    #[test]
    fn advanced_pawn_counts_less() {
        let b = board("6k1/8/8/8/8/6P1/5P1P/6K1 w - - 0 1");
        let king = b.king_square(Color::White).unwrap();
        assert_eq!(shield(&b, Color::White, king), SHIELD_NEAR * 2 + SHIELD_FAR);
    }

    #[test]
    fn wandering_king_has_no_shield() {
        let b = board("6k1/8/8/8/4K3/4P3/8/8 w - - 0 1");
        let king = b.king_square(Color::White).unwrap();
        assert_eq!(shield(&b, Color::White, king), Score::ZERO);
    }

    #[test]
    fn mirrored_structures_cancel() {
        let b = board("6k1/5ppp/8/8/8/8/5PPP/6K1 w - - 0 1");
        assert_eq!(king_safety(&b), Score::ZERO);
    }

    #[test]
    fn attacked_zone_is_penalised() {
        // Black rook on the second rank sweeps the squares beside the king.
        let b = board("6k1/8/8/8/8/8/r7/6K1 w - - 0 1");
        let king = b.king_square(Color::White).unwrap();
        assert_eq!(zone_pressure(&b, Color::White, king), ZONE_ATTACK * 3);
    }
}
