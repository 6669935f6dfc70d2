//! Core chess vocabulary and the rules seam used by the kibitz search.
//!
//! Move generation and game-state predicates come from the `chess` crate
//! through [`ChessPosition`]; the engine only ever sees the [`Position`]
//! trait.

mod chess_move;
mod chess_position;
mod color;
mod error;
mod fen;
mod piece;
mod position;
mod square;

pub use chess_move::{Move, MoveFlags, MoveList};
pub use chess_position::ChessPosition;
pub use color::Color;
pub use error::PositionError;
pub use fen::{STARTING_FEN, mirror_fen};
pub use piece::{Piece, PieceKind};
pub use position::{MoveGuard, Position};
pub use square::{Square, SquareSet};
