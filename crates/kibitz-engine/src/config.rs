//! Engine configuration.

use crate::error::ConfigError;
use crate::search::negamax::MAX_DEPTH;

/// Largest transposition table accepted, in megabytes.
pub const MAX_TT_MB: usize = 4096;

/// Tunable limits of a [`SearchEngine`](crate::SearchEngine).
///
/// Construct with [`EngineConfig::default`] and adjust with the `with_*`
/// setters; [`validate`](EngineConfig::validate) runs when the engine is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Iterative-deepening ceiling in plies.
    pub max_depth: u8,
    /// Extra plies quiescence search may add below the horizon.
    pub qsearch_depth: u8,
    /// Transposition table size in megabytes.
    pub tt_size_mb: usize,
    /// Nodes between clock checks; a power of two.
    pub check_interval: u64,
    /// Consult the opening book before searching.
    pub use_book: bool,
    /// Seed for book choice and the fallback move.
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: 6,
            qsearch_depth: 8,
            tt_size_mb: 16,
            check_interval: 1024,
            use_book: true,
            seed: 0x6b69_6269_747a,
        }
    }
}

impl EngineConfig {
    pub fn with_max_depth(mut self, depth: u8) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_qsearch_depth(mut self, depth: u8) -> Self {
        self.qsearch_depth = depth;
        self
    }

    pub fn with_tt_size_mb(mut self, mb: usize) -> Self {
        self.tt_size_mb = mb;
        self
    }

    pub fn with_check_interval(mut self, nodes: u64) -> Self {
        self.check_interval = nodes;
        self
    }

    pub fn with_book(mut self, enabled: bool) -> Self {
        self.use_book = enabled;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Reject values the search cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 || self.max_depth > MAX_DEPTH {
            return Err(ConfigError::DepthOutOfRange {
                value: self.max_depth,
            });
        }
        if self.tt_size_mb == 0 || self.tt_size_mb > MAX_TT_MB {
            return Err(ConfigError::TableSizeOutOfRange {
                value: self.tt_size_mb,
            });
        }
        if !self.check_interval.is_power_of_two() {
            return Err(ConfigError::CheckInterval {
                value: self.check_interval,
            });
        }
        Ok(())
    }
}
