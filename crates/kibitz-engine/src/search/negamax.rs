//! Negamax alpha-beta search.

use kibitz_core::{Move, MoveGuard, Position};

use crate::eval::Evaluate;
use crate::search::control::SearchControl;
use crate::search::heuristics::{HistoryTable, KillerTable};
use crate::search::ordering::MoveOrderer;
use crate::search::quiescence::quiescence;
use crate::search::tt::{Bound, TranspositionTable};

/// Score outside every reachable window.
pub const INF: i32 = 30_000;

/// Score of delivering mate at the root; mates further away score
/// `MATE_VALUE - ply`.
pub const MATE_VALUE: i32 = 29_000;

/// Scores beyond this magnitude encode a forced mate.
pub const MATE_THRESHOLD: i32 = 28_000;

/// Deepest ply any line may reach, quiescence included.
pub const MAX_PLY: usize = 64;

/// Largest nominal iterative-deepening depth.
pub const MAX_DEPTH: u8 = 32;

pub const DRAW: i32 = 0;

/// Score of a node with no legal moves: mated in check, stalemate otherwise.
pub(super) fn terminal_score<P: Position>(pos: &P, ply: usize) -> i32 {
    if pos.in_check() {
        -MATE_VALUE + ply as i32
    } else {
        DRAW
    }
}

/// Negamax alpha-beta, fail-soft.
///
/// Returns `None` when the clock stopped the search; the caller must then
/// discard the whole iteration. The principal variation is collected into
/// `ctx.pv`.
pub(super) fn negamax<P: Position, E: Evaluate>(
    pos: &mut P,
    depth: u8,
    ply: usize,
    mut alpha: i32,
    beta: i32,
    ctx: &mut SearchContext<'_, E>,
) -> Option<i32> {
    ctx.pv.clear_ply(ply);
    ctx.nodes += 1;
    ctx.seldepth = ctx.seldepth.max(ply);

    if ctx.control.should_stop(ctx.nodes) {
        return None;
    }

    // The root always searches so that a move comes back.
    if ply > 0 && pos.is_draw() {
        return Some(DRAW);
    }

    if ply >= MAX_PLY - 1 {
        return Some(ctx.evaluator.static_eval(pos));
    }

    if depth == 0 {
        return quiescence(pos, ply, alpha, beta, 0, ctx);
    }

    let key = pos.key();
    let mut tt_move = None;
    if let Some(entry) = ctx.tt.probe(key, ply) {
        tt_move = entry.best_move;
        if ply > 0 && entry.cuts_off(depth, alpha, beta) {
            return Some(entry.score);
        }
    }

    let moves = pos.legal_moves();
    if moves.is_empty() {
        return Some(terminal_score(pos, ply));
    }

    let original_alpha = alpha;
    let mut best_score = -INF;
    let mut best_move = None;
    let picker = MoveOrderer::with_tt_move(tt_move, ctx.killers, ctx.history, ply).order(pos, moves);

    for mv in picker {
        let score = {
            let mut child = MoveGuard::new(pos, mv);
            -negamax(&mut *child, depth - 1, ply + 1, -beta, -alpha, ctx)?
        };

        if score > best_score {
            best_score = score;
            best_move = Some(mv);
            if score > alpha {
                alpha = score;
                ctx.pv.update(ply, mv);
                if mv.is_quiet() {
                    ctx.history.reward(mv, depth);
                }
            }
        }

        if alpha >= beta {
            if mv.is_quiet() {
                ctx.killers.store(ply, mv);
            }
            break;
        }
    }

    let bound = if best_score >= beta {
        Bound::LowerBound
    } else if best_score > original_alpha {
        Bound::Exact
    } else {
        Bound::UpperBound
    };
    ctx.tt
        .store(key, depth, best_score, bound, best_move.or(tt_move), ply);

    Some(best_score)
}

/// Triangular principal-variation table: row `ply` holds the best line
/// found from that ply onward.
pub struct PvTable {
    moves: [[Option<Move>; MAX_PLY]; MAX_PLY],
    len: [usize; MAX_PLY],
}

impl PvTable {
    pub fn new() -> Self {
        Self {
            moves: [[None; MAX_PLY]; MAX_PLY],
            len: [0; MAX_PLY],
        }
    }

    pub fn clear_ply(&mut self, ply: usize) {
        if ply < MAX_PLY {
            self.len[ply] = 0;
        }
    }

    /// Make `mv` followed by the child line the new line at `ply`.
    pub fn update(&mut self, ply: usize, mv: Move) {
        if ply >= MAX_PLY {
            return;
        }
        self.moves[ply][0] = Some(mv);

        let child = ply + 1;
        if child >= MAX_PLY {
            self.len[ply] = 1;
            return;
        }
        let copy = self.len[child].min(MAX_PLY - 1);
        let (top, bottom) = self.moves.split_at_mut(child);
        top[ply][1..=copy].copy_from_slice(&bottom[0][..copy]);
        self.len[ply] = copy + 1;
    }

    pub fn root_pv(&self) -> Vec<Move> {
        self.moves[0][..self.len[0]].iter().flatten().copied().collect()
    }
}

impl Default for PvTable {
    fn default() -> Self {
        Self::new()
    }
}

/// State threaded through one iterative-deepening run.
pub(super) struct SearchContext<'a, E> {
    pub nodes: u64,
    /// Deepest ply reached, quiescence included.
    pub seldepth: usize,
    pub tt: &'a mut TranspositionTable,
    pub killers: &'a mut KillerTable,
    pub history: &'a mut HistoryTable,
    pub pv: PvTable,
    pub control: SearchControl,
    pub evaluator: &'a E,
    /// Quiescence ply limit below the horizon.
    pub qsearch_depth: u8,
}

#[cfg(test)]
mod tests {
    use kibitz_core::{ChessPosition, Position};

    use super::*;
    use crate::eval::Evaluator;

    fn context<'a>(
        tt: &'a mut TranspositionTable,
        killers: &'a mut KillerTable,
        history: &'a mut HistoryTable,
        evaluator: &'a Evaluator,
    ) -> SearchContext<'a, Evaluator> {
        SearchContext {
            nodes: 0,
            seldepth: 0,
            tt,
            killers,
            history,
            pv: PvTable::new(),
            control: SearchControl::unbounded(),
            evaluator,
            qsearch_depth: 8,
        }
    }

    #[test]
    fn finds_back_rank_mate() {
        let mut pos = ChessPosition::from_fen("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1").unwrap();
        let (mut tt, mut killers, mut history) =
            (TranspositionTable::new(1), KillerTable::new(), HistoryTable::new());
        let evaluator = Evaluator;
        let mut ctx = context(&mut tt, &mut killers, &mut history, &evaluator);

        let score = negamax(&mut pos, 2, 0, -INF, INF, &mut ctx).unwrap();
        assert_eq!(score, MATE_VALUE - 1);
        assert_eq!(ctx.pv.root_pv()[0].to_uci(), "a1a8");
    }

    #[test]
    fn mated_side_sees_negative_mate() {
        // Black to move is already mated.
        let mut pos = ChessPosition::from_fen("R5k1/5ppp/8/8/8/8/5PPP/6K1 b - - 1 1").unwrap();
        let (mut tt, mut killers, mut history) =
            (TranspositionTable::new(1), KillerTable::new(), HistoryTable::new());
        let evaluator = Evaluator;
        let mut ctx = context(&mut tt, &mut killers, &mut history, &evaluator);
        assert_eq!(negamax(&mut pos, 3, 0, -INF, INF, &mut ctx), Some(-MATE_VALUE));
    }

    #[test]
    fn search_restores_position() {
        let mut pos = ChessPosition::from_fen(
            "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4",
        )
        .unwrap();
        let before = pos.fen();
        let key = pos.key();
        let (mut tt, mut killers, mut history) =
            (TranspositionTable::new(1), KillerTable::new(), HistoryTable::new());
        let evaluator = Evaluator;
        let mut ctx = context(&mut tt, &mut killers, &mut history, &evaluator);
        negamax(&mut pos, 3, 0, -INF, INF, &mut ctx).unwrap();
        assert_eq!(pos.fen(), before);
        assert_eq!(pos.key(), key);
    }

    #[test]
    fn stopped_search_returns_none_and_restores() {
        let mut pos = ChessPosition::startpos();
        let key = pos.key();
        let (mut tt, mut killers, mut history) =
            (TranspositionTable::new(1), KillerTable::new(), HistoryTable::new());
        let evaluator = Evaluator;
        let mut ctx = context(&mut tt, &mut killers, &mut history, &evaluator);
        ctx.control = SearchControl::timed(std::time::Duration::ZERO, 64);
        assert_eq!(negamax(&mut pos, 5, 0, -INF, INF, &mut ctx), None);
        assert_eq!(pos.key(), key);
    }

    #[test]
    fn pv_table_copies_child_line() {
        let pos = ChessPosition::startpos();
        let e4 = pos.find_move("e2e4").unwrap();
        let d4 = pos.find_move("d2d4").unwrap();
        let mut pv = PvTable::new();
        pv.clear_ply(1);
        pv.update(1, d4);
        pv.update(0, e4);
        assert_eq!(pv.root_pv(), vec![e4, d4]);
        pv.clear_ply(0);
        assert!(pv.root_pv().is_empty());
    }
}
