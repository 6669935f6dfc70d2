//! The rules seam consumed by the search: a position that can list its
//! legal moves, apply and undo them, and answer check/mate/draw queries.

use std::ops::{Deref, DerefMut};

use crate::chess_move::{Move, MoveList};
use crate::color::Color;
use crate::piece::Piece;
use crate::square::{Square, SquareSet};

/// A game position owned by a rules backend.
///
/// `make_move` and `unmake_move` must form an exactly reversible pair:
/// after `make_move(m); unmake_move();` every observable query returns
/// what it returned before. Prefer [`MoveGuard`] over calling them
/// directly so the undo runs on every exit path.
pub trait Position {
    /// Stable hash of placement, side to move, castling and en passant.
    fn key(&self) -> u64;

    fn side_to_move(&self) -> Color;

    /// All legal moves, annotated with piece, capture and flag data.
    fn legal_moves(&self) -> MoveList;

    /// Legal moves `color` would have with the move: the side to move's own
    /// moves, or the opponent's after a pass. `None` when `color` cannot be
    /// given the move, e.g. because the side to move is in check.
    fn legal_moves_for(&self, color: Color) -> Option<MoveList> {
        (color == self.side_to_move()).then(|| self.legal_moves())
    }

    /// Apply a legal move. Applying an illegal move is a contract violation.
    fn make_move(&mut self, mv: Move);

    /// Undo the most recent [`make_move`](Position::make_move).
    fn unmake_move(&mut self);

    /// Whether the side to move is in check.
    fn in_check(&self) -> bool;

    fn is_checkmate(&self) -> bool {
        self.in_check() && self.legal_moves().is_empty()
    }

    fn is_stalemate(&self) -> bool {
        !self.in_check() && self.legal_moves().is_empty()
    }

    /// Draw by rule: fifty-move rule, repetition, or insufficient material.
    /// Stalemate is reported separately by [`is_stalemate`](Position::is_stalemate).
    fn is_draw(&self) -> bool;

    fn piece_on(&self, sq: Square) -> Option<Piece>;

    /// Squares attacked by the piece standing on `sq`, whichever side owns it.
    fn attacks_from(&self, sq: Square) -> SquareSet;

    fn occupied(&self) -> SquareSet;

    /// Half-moves played since the start of the game.
    fn game_ply(&self) -> u32;

    /// Opening signature: placement, side to move, castling rights and
    /// en passant file, without move counters.
    fn signature(&self) -> String;

    /// Find the legal move with the given UCI text.
    fn find_move(&self, uci: &str) -> Option<Move> {
        self.legal_moves().into_iter().find(|mv| mv.to_uci() == uci)
    }
}

/// Scoped move application: the move is made on construction and undone
/// when the guard is dropped.
///
/// ```ignore
/// let score = {
///     let mut child = MoveGuard::new(pos, mv);
///     -negamax(&mut *child, ...)?
/// };
/// ```
pub struct MoveGuard<'a, P: Position + ?Sized> {
    pos: &'a mut P,
}

impl<'a, P: Position + ?Sized> MoveGuard<'a, P> {
    pub fn new(pos: &'a mut P, mv: Move) -> Self {
        pos.make_move(mv);
        MoveGuard { pos }
    }
}

impl<P: Position + ?Sized> Deref for MoveGuard<'_, P> {
    type Target = P;

    fn deref(&self) -> &P {
        self.pos
    }
}

impl<P: Position + ?Sized> DerefMut for MoveGuard<'_, P> {
    fn deref_mut(&mut self) -> &mut P {
        self.pos
    }
}

impl<P: Position + ?Sized> Drop for MoveGuard<'_, P> {
    fn drop(&mut self) {
        self.pos.unmake_move();
    }
}
