//! Killer moves and the history heuristic for quiet move ordering.

use kibitz_core::{Move, Square};

use crate::search::negamax::MAX_PLY;

/// Two killer moves per ply: quiet moves that caused beta cutoffs at that
/// distance from the root.
pub struct KillerTable {
    slots: [[Option<Move>; 2]; MAX_PLY],
}

impl KillerTable {
    pub fn new() -> Self {
        Self {
            slots: [[None; 2]; MAX_PLY],
        }
    }

    /// Record a cutoff move at `ply`.
    ///
    /// The previous primary killer shifts to the secondary slot unless the
    /// new move is already the primary.
    pub fn store(&mut self, ply: usize, mv: Move) {
        let Some(slots) = self.slots.get_mut(ply) else {
            return;
        };
        if slots[0] != Some(mv) {
            slots[1] = slots[0];
            slots[0] = Some(mv);
        }
    }

    /// Slot index (0 = primary) holding `mv` at `ply`.
    pub fn slot_of(&self, ply: usize, mv: Move) -> Option<usize> {
        self.slots
            .get(ply)?
            .iter()
            .position(|slot| *slot == Some(mv))
    }

    pub fn is_killer(&self, ply: usize, mv: Move) -> bool {
        self.slot_of(ply, mv).is_some()
    }

    pub fn clear(&mut self) {
        self.slots = [[None; 2]; MAX_PLY];
    }
}

impl Default for KillerTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Upper bound on a history score.
pub const HISTORY_MAX: i32 = 10_000;

/// History table indexed by `[from][to]`.
///
/// Quiet moves that raise alpha earn `depth²`, saturating at [`HISTORY_MAX`].
pub struct HistoryTable {
    table: [[i32; Square::COUNT]; Square::COUNT],
}

impl HistoryTable {
    pub fn new() -> Self {
        Self {
            table: [[0; Square::COUNT]; Square::COUNT],
        }
    }

    pub fn reward(&mut self, mv: Move, depth: u8) {
        let bonus = i32::from(depth) * i32::from(depth);
        let entry = &mut self.table[mv.from().index()][mv.to().index()];
        *entry = (*entry + bonus).min(HISTORY_MAX);
    }

    pub fn score(&self, mv: Move) -> i32 {
        self.table[mv.from().index()][mv.to().index()]
    }

    pub fn clear(&mut self) {
        self.table = [[0; Square::COUNT]; Square::COUNT];
    }
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self::new()
    }
}
