//! Endgame detection from the count of non-king pieces.

use kibitz_core::{PieceKind, Position};

/// A position with at most this many non-king pieces is scored as an endgame.
pub const ENDGAME_MAX_PIECES: u32 = 12;

#[inline]
pub fn is_endgame_count(non_king_pieces: u32) -> bool {
    non_king_pieces <= ENDGAME_MAX_PIECES
}

/// Whether `pos` has thinned out enough to use endgame tables.
pub fn is_endgame<P: Position>(pos: &P) -> bool {
    let non_king = pos
        .occupied()
        .filter(|&sq| pos.piece_on(sq).is_some_and(|p| p.kind != PieceKind::King))
        .count() as u32;
    is_endgame_count(non_king)
}
