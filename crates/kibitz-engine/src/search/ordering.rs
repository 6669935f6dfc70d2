//! Move ordering.
//!
//! Moves are scored once into bands and then yielded best-first by an
//! incremental selection sort, so a cutoff on an early move skips sorting
//! the rest.
//!
//! | Band                   | Score                                  |
//! |------------------------|----------------------------------------|
//! | TT move                | [`TT_MOVE`]                            |
//! | Captures / promotions  | [`TACTICAL_BASE`] + MVV-LVA            |
//! | Primary killer         | [`KILLER`]`[0]`                        |
//! | Secondary killer       | [`KILLER`]`[1]`                        |
//! | Quiet                  | history × 64 + placement tie-break     |

use kibitz_core::{Color, Move, MoveList, PieceKind, Position, SquareSet};

use crate::eval::phase;
use crate::eval::pst::pst_value;
use crate::search::heuristics::{HISTORY_MAX, HistoryTable, KillerTable};

pub const TT_MOVE: i32 = 4_000_000;
pub const TACTICAL_BASE: i32 = 2_000_000;
pub const KILLER: [i32; 2] = [1_500_000, 1_400_000];

/// History is scaled so the placement tie-break only separates moves with
/// equal history.
const HISTORY_SCALE: i32 = 64;
const TIE_BREAK_LIMIT: i32 = HISTORY_SCALE - 1;

/// Game plies during which central and developing moves get a nudge.
pub const OPENING_PLIES: u32 = 10;
const CENTER_BONUS: i32 = 10;
const DEVELOPMENT_BONUS: i32 = 8;

/// Victim and attacker values for MVV-LVA, indexed by [`PieceKind::index`].
const ORDER_VALUE: [i32; PieceKind::COUNT] = [100, 320, 330, 500, 900, 1000];

const _: () = assert!(HISTORY_MAX * HISTORY_SCALE + TIE_BREAK_LIMIT < KILLER[1]);

/// Most valuable victim, least valuable attacker; promotions add the
/// promoted piece as a second victim.
pub fn mvv_lva(mv: Move) -> i32 {
    let victim = mv.captured().map_or(0, |v| ORDER_VALUE[v.index()] * 10);
    let promotion = mv.promotion().map_or(0, |p| ORDER_VALUE[p.index()] * 10);
    victim + promotion - ORDER_VALUE[mv.piece().index()]
}

/// Scores moves at one node of the tree.
pub struct MoveOrderer<'a> {
    tt_move: Option<Move>,
    killers: &'a KillerTable,
    history: &'a HistoryTable,
    ply: usize,
}

impl<'a> MoveOrderer<'a> {
    /// Orderer for a node whose TT entry the caller already probed.
    pub fn with_tt_move(
        tt_move: Option<Move>,
        killers: &'a KillerTable,
        history: &'a HistoryTable,
        ply: usize,
    ) -> Self {
        Self {
            tt_move,
            killers,
            history,
            ply,
        }
    }

    /// Order `moves` for the position they were generated in.
    pub fn order<P: Position>(&self, pos: &P, moves: MoveList) -> MovePicker {
        let node = NodeInfo::of(pos);
        let scored = moves
            .into_iter()
            .map(|mv| (mv, self.score(mv, &node)))
            .collect();
        MovePicker::from_scored(scored)
    }

    fn score(&self, mv: Move, node: &NodeInfo) -> i32 {
        if self.tt_move == Some(mv) {
            return TT_MOVE;
        }
        if !mv.is_quiet() {
            return TACTICAL_BASE + mvv_lva(mv);
        }
        if let Some(slot) = self.killers.slot_of(self.ply, mv) {
            return KILLER[slot];
        }
        self.history.score(mv) * HISTORY_SCALE + tie_break(mv, node)
    }
}

/// Facts about the node shared by every move scored there.
struct NodeInfo {
    side: Color,
    endgame: bool,
    opening: bool,
}

impl NodeInfo {
    fn of<P: Position>(pos: &P) -> Self {
        let endgame = phase::is_endgame(pos);
        Self {
            side: pos.side_to_move(),
            endgame,
            opening: !endgame && pos.game_ply() < OPENING_PLIES,
        }
    }
}

/// Positional gain of a quiet move, plus opening nudges toward the centre
/// and off the back rank.
///
/// Approximates re-evaluating the position after the move by the change in
/// the moving piece's square-table value, which is the only evaluation term
/// a quiet move shifts directly.
fn tie_break(mv: Move, node: &NodeInfo) -> i32 {
    let piece = mv.piece();
    let gain = pst_value(piece, node.side, mv.to()) - pst_value(piece, node.side, mv.from());
    let mut bonus = gain.select(node.endgame);

    if node.opening {
        if SquareSet::CENTER.contains(mv.to()) {
            bonus += CENTER_BONUS;
        }
        let minor = matches!(piece, PieceKind::Knight | PieceKind::Bishop);
        if minor && mv.from().relative_rank(node.side) == 0 {
            bonus += DEVELOPMENT_BONUS;
        }
    }
    bonus.clamp(-TIE_BREAK_LIMIT, TIE_BREAK_LIMIT)
}

/// Yields moves in descending score order.
///
/// Each call to [`next`](Iterator::next) selects the best remaining move.
pub struct MovePicker {
    scored: Vec<(Move, i32)>,
    cursor: usize,
}

impl MovePicker {
    fn from_scored(scored: Vec<(Move, i32)>) -> Self {
        Self { scored, cursor: 0 }
    }

    /// Captures and promotions only, ordered by MVV-LVA. Used by quiescence.
    pub fn tactical(moves: MoveList) -> Self {
        let scored = moves
            .into_iter()
            .filter(|mv| !mv.is_quiet())
            .map(|mv| (mv, mvv_lva(mv)))
            .collect();
        Self::from_scored(scored)
    }
}

impl Iterator for MovePicker {
    type Item = Move;

    fn next(&mut self) -> Option<Move> {
        if self.cursor >= self.scored.len() {
            return None;
        }
        let rest = &self.scored[self.cursor..];
        let mut best = 0;
        for (i, &(_, score)) in rest.iter().enumerate() {
            if score > rest[best].1 {
                best = i;
            }
        }
        self.scored.swap(self.cursor, self.cursor + best);
        let mv = self.scored[self.cursor].0;
        self.cursor += 1;
        Some(mv)
    }
}

#[cfg(test)]
mod tests {
    use kibitz_core::{ChessPosition, Position};

    use super::*;

    fn uci(moves: &[Move]) -> Vec<String> {
        moves.iter().map(|m| m.to_uci()).collect()
    }

    #[test]
    fn yields_every_move_once() {
        let pos = ChessPosition::startpos();
        let (killers, history) = (KillerTable::new(), HistoryTable::new());
        let moves = pos.legal_moves();
        let ordered: Vec<Move> = MoveOrderer::with_tt_move(None, &killers, &history, 0)
            .order(&pos, moves.clone())
            .collect();
        assert_eq!(ordered.len(), moves.len());
        for mv in &moves {
            assert!(ordered.contains(mv));
        }
    }

    #[test]
    fn tt_move_first_then_captures_then_killers() {
        // White can take the d5 pawn with the e4 pawn or the c3 knight.
        let pos = ChessPosition::from_fen(
            "rnbqkbnr/ppp1pppp/8/3p4/4P3/2N5/PPPP1PPP/R1BQKBNR w KQkq - 0 2",
        )
        .unwrap();
        let mut killers = KillerTable::new();
        let history = HistoryTable::new();
        let tt_move = pos.find_move("g1f3");
        let killer = pos.find_move("a2a3").unwrap();
        killers.store(3, killer);

        let ordered: Vec<Move> = MoveOrderer::with_tt_move(tt_move, &killers, &history, 3)
            .order(&pos, pos.legal_moves())
            .collect();
        assert_eq!(uci(&ordered[..4]), ["g1f3", "e4d5", "c3d5", "a2a3"]);
    }

    #[test]
    fn mvv_lva_prefers_cheap_attacker() {
        let pos = ChessPosition::from_fen(
            "rnbqkbnr/ppp1pppp/8/3p4/4P3/2N5/PPPP1PPP/R1BQKBNR w KQkq - 0 2",
        )
        .unwrap();
        let pawn_takes = pos.find_move("e4d5").unwrap();
        let knight_takes = pos.find_move("c3d5").unwrap();
        assert!(mvv_lva(pawn_takes) > mvv_lva(knight_takes));
    }

    #[test]
    fn history_orders_quiet_moves() {
        let pos = ChessPosition::startpos();
        let killers = KillerTable::new();
        let mut history = HistoryTable::new();
        let favourite = pos.find_move("h2h3").unwrap();
        history.reward(favourite, 3);
        let first = MoveOrderer::with_tt_move(None, &killers, &history, 0)
            .order(&pos, pos.legal_moves())
            .next();
        assert_eq!(first, Some(favourite));
    }

    #[test]
    fn opening_prefers_central_development() {
        let pos = ChessPosition::startpos();
        let (killers, history) = (KillerTable::new(), HistoryTable::new());
        let ordered: Vec<Move> = MoveOrderer::with_tt_move(None, &killers, &history, 0)
            .order(&pos, pos.legal_moves())
            .collect();
        let rank = |u: &str| uci(&ordered).iter().position(|m| m == u).unwrap();
        assert!(rank("e2e4") < rank("a2a3"));
        assert!(rank("g1f3") < rank("g1h3"));
    }

    #[test]
    fn tactical_picker_skips_quiet_moves() {
        let pos = ChessPosition::from_fen(
            "rnbqkbnr/ppp1pppp/8/3p4/4P3/2N5/PPPP1PPP/R1BQKBNR w KQkq - 0 2",
        )
        .unwrap();
        let captures: Vec<Move> = MovePicker::tactical(pos.legal_moves()).collect();
        assert_eq!(uci(&captures), ["e4d5", "c3d5"]);
    }

    #[test]
    fn stored_tt_move_comes_first() {
        let pos = ChessPosition::startpos();
        let mut tt = crate::search::tt::TranspositionTable::new(1);
        let (killers, history) = (KillerTable::new(), HistoryTable::new());
        let best = pos.find_move("b1c3").unwrap();
        tt.store(pos.key(), 2, 0, crate::search::tt::Bound::Exact, Some(best), 0);
        let tt_move = tt.probe(pos.key(), 0).and_then(|entry| entry.best_move);
        let first = MoveOrderer::with_tt_move(tt_move, &killers, &history, 0)
            .order(&pos, pos.legal_moves())
            .next();
        assert_eq!(first, Some(best));
    }
}
