//! Errors raised while building positions.

/// Errors from parsing FEN strings, squares, and moves.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    /// The FEN string does not have 4 to 6 space-separated fields.
    #[error("expected 4 to 6 FEN fields, found {found}")]
    WrongFieldCount {
        /// Number of fields found.
        found: usize,
    },
    /// The rules backend rejected the FEN.
    #[error("invalid FEN \"{fen}\": {reason}")]
    InvalidFen {
        /// The rejected FEN string.
        fen: String,
        /// Backend diagnostic.
        reason: String,
    },
    /// A move counter is not a valid number.
    #[error("invalid {field}: \"{found}\"")]
    InvalidMoveCounter {
        /// "halfmove clock" or "fullmove number".
        field: &'static str,
        /// The offending text.
        found: String,
    },
    /// A square name is not in `a1`..`h8`.
    #[error("invalid square: \"{found}\"")]
    InvalidSquare {
        /// The offending text.
        found: String,
    },
    /// A UCI move string is not legal in the position.
    #[error("illegal or malformed move: {uci}")]
    IllegalMove {
        /// The offending UCI string.
        uci: String,
    },
}
