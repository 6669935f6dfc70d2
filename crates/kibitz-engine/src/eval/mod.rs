//! Static evaluation.
//!
//! Every term is computed White-relative from one [`EvalBoard`] snapshot;
//! [`Evaluate::static_eval`] converts the total to the side to move.

pub mod board;
pub mod king_safety;
pub mod material;
pub mod mobility;
pub mod phase;
pub mod pst;
pub mod rooks;
pub mod score;
pub mod threats;

use kibitz_core::Position;

use crate::search::negamax::MATE_VALUE;

use self::board::EvalBoard;

/// Bonus for having the move, White-relative sign applied by the caller.
pub const TEMPO: i32 = 10;

/// A position evaluator pluggable into the search.
pub trait Evaluate {
    /// Heuristic score in centipawns for the side to move. Terminal states
    /// are not detected here; the search handles them itself.
    fn static_eval<P: Position>(&self, pos: &P) -> i32;

    /// Score for the side to move with terminal states resolved: a mated
    /// side scores `-MATE_VALUE`, stalemate and rule draws score zero.
    fn evaluate<P: Position>(&self, pos: &P) -> i32 {
        if pos.legal_moves().is_empty() {
            return if pos.in_check() { -MATE_VALUE } else { 0 };
        }
        if pos.is_draw() {
            return 0;
        }
        self.static_eval(pos)
    }
}

/// Per-term scores of one position, White-relative and phase-resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EvalBreakdown {
    pub material: i32,
    pub placement: i32,
    pub mobility: i32,
    pub king_safety: i32,
    pub rooks: i32,
    pub threats: i32,
    pub tempo: i32,
    pub endgame: bool,
}

impl EvalBreakdown {
    pub fn total(&self) -> i32 {
        self.material
            + self.placement
            + self.mobility
            + self.king_safety
            + self.rooks
            + self.threats
            + self.tempo
    }
}

/// The handcrafted evaluator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator;

impl Evaluator {
    pub fn breakdown<P: Position>(&self, pos: &P) -> EvalBreakdown {
        let board = EvalBoard::capture(pos);
        let endgame = board.is_endgame();
        EvalBreakdown {
            material: material::material(&board).select(endgame),
            placement: pst::pst(&board).select(endgame),
            mobility: mobility::mobility(&board).select(endgame),
            king_safety: king_safety::king_safety(&board).select(endgame),
            rooks: rooks::rooks(&board).select(endgame),
            threats: threats::threats(&board).select(endgame),
            tempo: board.side_to_move().sign() * TEMPO,
            endgame,
        }
    }

    /// Static score from White's point of view.
    pub fn evaluate_white<P: Position>(&self, pos: &P) -> i32 {
        self.breakdown(pos).total()
    }
}

impl Evaluate for Evaluator {
    fn static_eval<P: Position>(&self, pos: &P) -> i32 {
        pos.side_to_move().sign() * self.evaluate_white(pos)
    }
}

/// Evaluate `pos` with the default [`Evaluator`].
pub fn evaluate<P: Position>(pos: &P) -> i32 {
    Evaluator.evaluate(pos)
}
