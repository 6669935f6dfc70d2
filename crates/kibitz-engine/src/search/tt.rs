//! Transposition table: a fixed-size, always-replace cache of search results
//! keyed by position hash.

use kibitz_core::Move;

use crate::search::negamax::MATE_THRESHOLD;

/// How a stored score relates to the true value of the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// The score is exact.
    Exact,
    /// The search failed high: the true value is at least the score.
    LowerBound,
    /// The search failed low: the true value is at most the score.
    UpperBound,
}

/// One cached search result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtEntry {
    /// Full position hash, compared on probe to reject index collisions.
    pub key: u64,
    pub depth: u8,
    /// Score in the probing node's frame once returned by
    /// [`TranspositionTable::probe`].
    pub score: i32,
    pub bound: Bound,
    pub best_move: Option<Move>,
}

impl TtEntry {
    /// Whether this entry settles a search of `depth` in window
    /// `(alpha, beta)` without expanding the node.
    pub fn cuts_off(&self, depth: u8, alpha: i32, beta: i32) -> bool {
        if self.depth < depth {
            return false;
        }
        match self.bound {
            Bound::Exact => true,
            Bound::LowerBound => self.score >= beta,
            Bound::UpperBound => self.score <= alpha,
        }
    }
}

/// Convert a root-relative mate score to a node-relative one before storing.
///
/// Mate scores carry the distance from the root; stored relative to the node
/// they stay correct when the same position is reached at another ply.
pub fn score_to_tt(score: i32, ply: usize) -> i32 {
    let ply = ply as i32;
    if score > MATE_THRESHOLD {
        score + ply
    } else if score < -MATE_THRESHOLD {
        score - ply
    } else {
        score
    }
}

/// Inverse of [`score_to_tt`].
pub fn score_from_tt(score: i32, ply: usize) -> i32 {
    let ply = ply as i32;
    if score > MATE_THRESHOLD {
        score - ply
    } else if score < -MATE_THRESHOLD {
        score + ply
    } else {
        score
    }
}

pub struct TranspositionTable {
    entries: Box<[Option<TtEntry>]>,
    mask: usize,
    used: usize,
}

impl TranspositionTable {
    /// A table of at most `mb` megabytes, rounded down to a power-of-two
    /// entry count.
    pub fn new(mb: usize) -> Self {
        let bytes = mb.max(1) * 1024 * 1024;
        let slot = std::mem::size_of::<Option<TtEntry>>();
        let count = (bytes / slot).max(1);
        // Largest power of two not above `count`.
        let count = if count.is_power_of_two() {
            count
        } else {
            count.next_power_of_two() >> 1
        };

        Self {
            entries: vec![None; count].into_boxed_slice(),
            mask: count - 1,
            used: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.used
    }

    pub fn is_empty(&self) -> bool {
        self.used == 0
    }

    /// Occupied entries, in permille of capacity.
    pub fn hashfull(&self) -> usize {
        self.used * 1000 / self.capacity()
    }

    pub fn clear(&mut self) {
        self.entries.fill(None);
        self.used = 0;
    }

    #[inline]
    fn index(&self, key: u64) -> usize {
        key as usize & self.mask
    }

    /// Look up `key`, returning the entry with its score adjusted to `ply`.
    pub fn probe(&self, key: u64, ply: usize) -> Option<TtEntry> {
        let entry = self.entries[self.index(key)]?;
        if entry.key != key {
            return None;
        }
        Some(TtEntry {
            score: score_from_tt(entry.score, ply),
            ..entry
        })
    }

    /// Store a result, replacing whatever occupies the slot.
    pub fn store(
        &mut self,
        key: u64,
        depth: u8,
        score: i32,
        bound: Bound,
        best_move: Option<Move>,
        ply: usize,
    ) {
        let idx = self.index(key);
        let slot = &mut self.entries[idx];
        if slot.is_none() {
            self.used += 1;
        }
        *slot = Some(TtEntry {
            key,
            depth,
            score: score_to_tt(score, ply),
            bound,
            best_move,
        });
    }
}
