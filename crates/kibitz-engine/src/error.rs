//! Engine construction errors.

use crate::config::MAX_TT_MB;
use crate::search::negamax::MAX_DEPTH;

/// An [`EngineConfig`](crate::EngineConfig) value outside its valid range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `max_depth` is zero or above [`MAX_DEPTH`].
    #[error("max depth {value} outside 1..={max}", max = MAX_DEPTH)]
    DepthOutOfRange {
        /// The rejected depth.
        value: u8,
    },
    /// `tt_size_mb` is zero or above [`MAX_TT_MB`].
    #[error("transposition table size {value} MB outside 1..={max}", max = MAX_TT_MB)]
    TableSizeOutOfRange {
        /// The rejected size in megabytes.
        value: usize,
    },
    /// `check_interval` must be a non-zero power of two.
    #[error("clock check interval {value} is not a power of two")]
    CheckInterval {
        /// The rejected interval.
        value: u64,
    },
}

/// A malformed opening book line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookError {
    /// A move in a book line is not legal where it is played.
    #[error("book line \"{line}\": move {uci} is illegal")]
    IllegalMove {
        /// The line (space-separated UCI moves) leading to the position.
        line: String,
        /// The offending move.
        uci: String,
    },
    /// A candidate carries zero weight and could never be chosen.
    #[error("book line \"{line}\": candidate {uci} has zero weight")]
    ZeroWeight {
        /// The line leading to the position.
        line: String,
        /// The offending candidate.
        uci: String,
    },
}

/// Any error raised while building a [`SearchEngine`](crate::SearchEngine).
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid engine configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid opening book: {0}")]
    Book(#[from] BookError),
}
