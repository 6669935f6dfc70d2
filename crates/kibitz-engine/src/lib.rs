//! Search and evaluation for kibitz.

pub mod book;
pub mod config;
pub mod error;
pub mod eval;
pub mod search;

pub use book::{BookMove, OpeningBook};
pub use config::EngineConfig;
pub use error::{BookError, ConfigError, EngineError};
pub use eval::{Evaluate, Evaluator, evaluate};
pub use search::negamax::{INF, MATE_THRESHOLD, MATE_VALUE, MAX_DEPTH, MAX_PLY};
pub use search::{MoveSource, SearchEngine, SearchOutcome, SearchState};
