//! Weighted opening book keyed by position signature.
//!
//! Lines are written as UCI moves from the initial position. Because lookup
//! goes through the signature (placement, side to move, castling and en
//! passant file) rather than the move sequence, transpositions into a book
//! position are found too.

use std::collections::HashMap;

use kibitz_core::{ChessPosition, Move, Position};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::BookError;

/// A candidate reply and its relative frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookMove {
    pub mv: Move,
    pub weight: u32,
}

/// One book entry: the line leading to a position and its candidates.
pub type BookLine = (&'static str, &'static [(&'static str, u32)]);

/// The built-in repertoire of main-line openings.
pub const STANDARD_LINES: &[BookLine] = &[
    ("", &[("e2e4", 45), ("d2d4", 35), ("c2c4", 10), ("g1f3", 10)]),
    ("e2e4", &[("e7e5", 40), ("c7c5", 35), ("e7e6", 15), ("c7c6", 10)]),
    ("d2d4", &[("d7d5", 50), ("g8f6", 50)]),
    ("c2c4", &[("e7e5", 50), ("g8f6", 50)]),
    ("g1f3", &[("d7d5", 50), ("g8f6", 50)]),
    ("e2e4 e7e5", &[("g1f3", 85), ("f1c4", 15)]),
    ("e2e4 c7c5", &[("g1f3", 70), ("b1c3", 30)]),
    ("e2e4 e7e6", &[("d2d4", 100)]),
    ("e2e4 c7c6", &[("d2d4", 100)]),
    ("d2d4 d7d5", &[("c2c4", 70), ("g1f3", 30)]),
    ("d2d4 g8f6", &[("c2c4", 70), ("g1f3", 30)]),
    ("e2e4 e7e5 g1f3", &[("b8c6", 85), ("g8f6", 15)]),
    ("e2e4 c7c5 g1f3", &[("d7d6", 45), ("b8c6", 35), ("e7e6", 20)]),
    ("e2e4 e7e6 d2d4", &[("d7d5", 100)]),
    ("e2e4 c7c6 d2d4", &[("d7d5", 100)]),
    ("d2d4 d7d5 c2c4", &[("e7e6", 50), ("c7c6", 50)]),
    ("d2d4 g8f6 c2c4", &[("e7e6", 50), ("g7g6", 50)]),
    ("e2e4 e7e5 g1f3 b8c6", &[("f1b5", 50), ("f1c4", 40), ("d2d4", 10)]),
    ("e2e4 e7e5 g1f3 b8c6 f1b5", &[("a7a6", 70), ("g8f6", 30)]),
    ("e2e4 e7e5 g1f3 b8c6 f1c4", &[("f8c5", 60), ("g8f6", 40)]),
];

#[derive(Debug, Clone, Default)]
pub struct OpeningBook {
    entries: HashMap<String, Vec<BookMove>>,
}

impl OpeningBook {
    /// A book that never answers.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The book built from [`STANDARD_LINES`].
    pub fn standard() -> Result<Self, BookError> {
        Self::from_lines(STANDARD_LINES)
    }

    /// Build a book by replaying each line from the initial position.
    pub fn from_lines(lines: &[BookLine]) -> Result<Self, BookError> {
        let mut entries: HashMap<String, Vec<BookMove>> = HashMap::new();

        for &(line, candidates) in lines {
            let illegal = |uci: &str| BookError::IllegalMove {
                line: line.to_string(),
                uci: uci.to_string(),
            };

            let mut pos = ChessPosition::startpos();
            for uci in line.split_whitespace() {
                pos.play_uci(uci).map_err(|_| illegal(uci))?;
            }

            let moves = entries.entry(pos.signature()).or_default();
            for &(uci, weight) in candidates {
                if weight == 0 {
                    return Err(BookError::ZeroWeight {
                        line: line.to_string(),
                        uci: uci.to_string(),
                    });
                }
                let mv = pos.find_move(uci).ok_or_else(|| illegal(uci))?;
                moves.push(BookMove { mv, weight });
            }
        }

        Ok(Self { entries })
    }

    /// Number of positions in the book.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stored candidates for `pos`, legal or not.
    pub fn candidates<P: Position>(&self, pos: &P) -> &[BookMove] {
        self.entries
            .get(&pos.signature())
            .map_or(&[][..], Vec::as_slice)
    }

    /// Pick a legal book move for `pos`, weighted by frequency.
    pub fn lookup<P: Position, R: Rng + ?Sized>(&self, pos: &P, rng: &mut R) -> Option<Move> {
        let stored = self.candidates(pos);
        if stored.is_empty() {
            return None;
        }

        let legal = pos.legal_moves();
        let playable: Vec<BookMove> = stored
            .iter()
            .filter_map(|c| {
                legal
                    .iter()
                    .find(|&&mv| mv == c.mv)
                    .map(|&mv| BookMove { mv, weight: c.weight })
            })
            .collect();

        playable
            .choose_weighted(rng, |c| c.weight)
            .ok()
            .map(|c| c.mv)
    }
}
