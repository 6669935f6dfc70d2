//! Per-node snapshot of the position consumed by every evaluation term.
//!
//! The snapshot is taken once per evaluation so that the terms share a
//! single pass over the occupied squares, a single attack computation per
//! piece, and one legal move generation per side.

use kibitz_core::{Color, Piece, PieceKind, Position, Square, SquareSet};

use crate::eval::phase;

/// Piece placement and attack maps of one position.
pub struct EvalBoard {
    squares: [Option<Piece>; Square::COUNT],
    attacks: [SquareSet; Square::COUNT],
    reach: [SquareSet; Square::COUNT],
    occupied_by: [SquareSet; Color::COUNT],
    attacked_by: [SquareSet; Color::COUNT],
    side_to_move: Color,
    endgame: bool,
}

impl EvalBoard {
    pub fn capture<P: Position>(pos: &P) -> EvalBoard {
        let mut board = EvalBoard {
            squares: [None; Square::COUNT],
            attacks: [SquareSet::EMPTY; Square::COUNT],
            reach: [SquareSet::EMPTY; Square::COUNT],
            occupied_by: [SquareSet::EMPTY; Color::COUNT],
            attacked_by: [SquareSet::EMPTY; Color::COUNT],
            side_to_move: pos.side_to_move(),
            endgame: false,
        };

        let mut non_king = 0;
        for sq in pos.occupied() {
            let Some(piece) = pos.piece_on(sq) else {
                continue;
            };
            let attacks = pos.attacks_from(sq);
            let side = piece.color.index();

            board.squares[sq.index()] = Some(piece);
            board.attacks[sq.index()] = attacks;
            board.occupied_by[side].insert(sq);
            board.attacked_by[side] = board.attacked_by[side] | attacks;
            if piece.kind != PieceKind::King {
                non_king += 1;
            }
        }
        board.endgame = phase::is_endgame_count(non_king);

        for color in [Color::White, Color::Black] {
            match pos.legal_moves_for(color) {
                Some(moves) => {
                    for mv in moves {
                        board.reach[mv.from().index()].insert(mv.to());
                    }
                }
                None => board.approximate_reach(color),
            }
        }
        board
    }

    /// Pseudo-legal destinations for a side that cannot be handed the move:
    /// free or enemy squares a piece attacks, enemy squares for pawns.
    fn approximate_reach(&mut self, color: Color) {
        let own = self.side(color);
        let enemy = self.side(!color);
        for sq in own {
            let targets = match self.squares[sq.index()] {
                Some(piece) if piece.kind == PieceKind::Pawn => enemy,
                _ => !own,
            };
            self.reach[sq.index()] = self.attacks[sq.index()] & targets;
        }
    }

    #[inline]
    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.index()]
    }

    /// Squares attacked by the piece on `sq`; empty for vacant squares.
    #[inline]
    pub fn attacks(&self, sq: Square) -> SquareSet {
        self.attacks[sq.index()]
    }

    /// Destination squares of the legal moves of the piece on `sq`.
    #[inline]
    pub fn reach(&self, sq: Square) -> SquareSet {
        self.reach[sq.index()]
    }

    #[inline]
    pub fn side(&self, color: Color) -> SquareSet {
        self.occupied_by[color.index()]
    }

    #[inline]
    pub fn attacked_by(&self, color: Color) -> SquareSet {
        self.attacked_by[color.index()]
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn is_endgame(&self) -> bool {
        self.endgame
    }

    /// Squares holding pieces of `color` and `kind`.
    pub fn pieces(&self, color: Color, kind: PieceKind) -> impl Iterator<Item = Square> + '_ {
        let wanted = Piece::new(color, kind);
        self.side(color)
            .filter(move |&sq| self.squares[sq.index()] == Some(wanted))
    }

    pub fn count(&self, color: Color, kind: PieceKind) -> usize {
        self.pieces(color, kind).count()
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces(color, PieceKind::King).next()
    }

    /// Pieces of `color` attacking `target`.
    pub fn attackers(&self, target: Square, color: Color) -> impl Iterator<Item = Square> + '_ {
        self.side(color)
            .filter(move |&sq| self.attacks[sq.index()].contains(target))
    }
}
