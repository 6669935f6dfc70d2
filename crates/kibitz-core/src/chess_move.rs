//! Move representation.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::BitOr;

use crate::piece::PieceKind;
use crate::square::Square;

/// Tactical properties of a move, as a small bit set.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MoveFlags(u8);

impl MoveFlags {
    pub const NONE: MoveFlags = MoveFlags(0);
    pub const CAPTURE: MoveFlags = MoveFlags(1 << 0);
    pub const CASTLE: MoveFlags = MoveFlags(1 << 1);
    pub const CHECK: MoveFlags = MoveFlags(1 << 2);
    pub const EN_PASSANT: MoveFlags = MoveFlags(1 << 3);
    pub const PROMOTION: MoveFlags = MoveFlags(1 << 4);

    #[inline]
    pub const fn contains(self, other: MoveFlags) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn insert(&mut self, other: MoveFlags) {
        self.0 |= other.0;
    }
}

impl BitOr for MoveFlags {
    type Output = MoveFlags;

    #[inline]
    fn bitor(self, rhs: MoveFlags) -> MoveFlags {
        MoveFlags(self.0 | rhs.0)
    }
}

impl fmt::Debug for MoveFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (MoveFlags::CAPTURE, "capture"),
            (MoveFlags::CASTLE, "castle"),
            (MoveFlags::CHECK, "check"),
            (MoveFlags::EN_PASSANT, "en_passant"),
            (MoveFlags::PROMOTION, "promotion"),
        ];
        let mut set = f.debug_set();
        for (flag, name) in names {
            if self.contains(flag) {
                set.entry(&name);
            }
        }
        set.finish()
    }
}

/// A move together with the facts the search needs about it.
///
/// Two moves are equal iff origin, destination, and promotion match;
/// the moving piece, captured piece, and flags are annotations filled in
/// by the rules collaborator and do not take part in comparisons.
#[derive(Clone, Copy)]
pub struct Move {
    from: Square,
    to: Square,
    promotion: Option<PieceKind>,
    piece: PieceKind,
    captured: Option<PieceKind>,
    flags: MoveFlags,
}

/// Legal moves of a position.
pub type MoveList = Vec<Move>;

impl Move {
    /// A bare move; the moving piece defaults to a pawn until annotated.
    pub const fn new(from: Square, to: Square) -> Move {
        Move {
            from,
            to,
            promotion: None,
            piece: PieceKind::Pawn,
            captured: None,
            flags: MoveFlags::NONE,
        }
    }

    pub const fn with_piece(mut self, piece: PieceKind) -> Move {
        self.piece = piece;
        self
    }

    pub const fn with_promotion(mut self, kind: PieceKind) -> Move {
        self.promotion = Some(kind);
        self.flags = MoveFlags(self.flags.0 | MoveFlags::PROMOTION.0);
        self
    }

    pub const fn with_capture(mut self, victim: PieceKind) -> Move {
        self.captured = Some(victim);
        self.flags = MoveFlags(self.flags.0 | MoveFlags::CAPTURE.0);
        self
    }

    pub const fn with_flags(mut self, flags: MoveFlags) -> Move {
        self.flags = MoveFlags(self.flags.0 | flags.0);
        self
    }

    #[inline]
    pub const fn from(self) -> Square {
        self.from
    }

    #[inline]
    pub const fn to(self) -> Square {
        self.to
    }

    #[inline]
    pub const fn promotion(self) -> Option<PieceKind> {
        self.promotion
    }

    /// The kind of the piece being moved.
    #[inline]
    pub const fn piece(self) -> PieceKind {
        self.piece
    }

    /// The kind of the piece being captured, if any.
    #[inline]
    pub const fn captured(self) -> Option<PieceKind> {
        self.captured
    }

    #[inline]
    pub const fn flags(self) -> MoveFlags {
        self.flags
    }

    #[inline]
    pub const fn is_capture(self) -> bool {
        self.flags.contains(MoveFlags::CAPTURE)
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.promotion.is_some()
    }

    #[inline]
    pub const fn gives_check(self) -> bool {
        self.flags.contains(MoveFlags::CHECK)
    }

    #[inline]
    pub const fn is_castle(self) -> bool {
        self.flags.contains(MoveFlags::CASTLE)
    }

    /// Neither a capture nor a promotion.
    #[inline]
    pub const fn is_quiet(self) -> bool {
        !self.is_capture() && !self.is_promotion()
    }

    /// UCI long algebraic notation, e.g. `e2e4` or `e7e8q`.
    pub fn to_uci(self) -> String {
        self.to_string()
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Move) -> bool {
        self.from == other.from && self.to == other.to && self.promotion == other.promotion
    }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.from.hash(state);
        self.to.hash(state);
        self.promotion.hash(state);
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind.fen_char())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({self} {:?}", self.piece)?;
        if let Some(victim) = self.captured {
            write!(f, " x{victim:?}")?;
        }
        write!(f, " {:?})", self.flags)
    }
}
