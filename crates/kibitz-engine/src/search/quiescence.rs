//! Quiescence search: play out captures and promotions past the horizon
//! until the position is quiet.

use kibitz_core::{MoveGuard, Position};

use crate::eval::Evaluate;
use crate::search::negamax::{DRAW, MAX_PLY, SearchContext, terminal_score};
use crate::search::ordering::MovePicker;

/// Fail-soft quiescence.
///
/// The side to move may stand pat on the static evaluation or try a
/// tactical move. `qdepth` counts plies below the horizon and is capped by
/// `ctx.qsearch_depth`. Returns `None` when the clock stopped the search.
pub(super) fn quiescence<P: Position, E: Evaluate>(
    pos: &mut P,
    ply: usize,
    mut alpha: i32,
    beta: i32,
    qdepth: u8,
    ctx: &mut SearchContext<'_, E>,
) -> Option<i32> {
    ctx.nodes += 1;
    ctx.seldepth = ctx.seldepth.max(ply);

    if ctx.control.should_stop(ctx.nodes) {
        return None;
    }

    // The horizon node was already checked by negamax.
    if qdepth > 0 && pos.is_draw() {
        return Some(DRAW);
    }

    let moves = pos.legal_moves();
    if moves.is_empty() {
        return Some(terminal_score(pos, ply));
    }

    let stand_pat = ctx.evaluator.static_eval(pos);
    if stand_pat >= beta || qdepth >= ctx.qsearch_depth || ply >= MAX_PLY - 1 {
        return Some(stand_pat);
    }
    alpha = alpha.max(stand_pat);

    let mut best = stand_pat;
    for mv in MovePicker::tactical(moves) {
        let score = {
            let mut child = MoveGuard::new(pos, mv);
            -quiescence(&mut *child, ply + 1, -beta, -alpha, qdepth + 1, ctx)?
        };

        if score > best {
            best = score;
            if score > alpha {
                alpha = score;
                if alpha >= beta {
                    break;
                }
            }
        }
    }

    Some(best)
}
