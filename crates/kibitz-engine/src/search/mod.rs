//! Iterative-deepening search driver.

pub mod control;
pub mod heuristics;
pub mod negamax;
pub mod ordering;
pub mod quiescence;
pub mod tt;

use std::time::{Duration, Instant};

use kibitz_core::{Move, MoveList, Position};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, info, trace};

use crate::book::OpeningBook;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::eval::{Evaluate, Evaluator};

use control::SearchControl;
use heuristics::{HistoryTable, KillerTable};
use negamax::{INF, MATE_THRESHOLD, MAX_DEPTH, PvTable, SearchContext, negamax};
use tt::TranspositionTable;

/// Lifecycle of the engine's most recent request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    Searching,
    /// Finished every requested depth, or stopped early on a forced mate.
    Completed,
    /// The time budget ended the search.
    TimedOut,
}

/// Where the returned move came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveSource {
    /// The opening book.
    Book,
    /// The only legal move, played without searching.
    Forced,
    /// The deepest completed search iteration.
    Search,
    /// A random legal move because no iteration completed in time.
    Fallback,
}

/// Result of one [`SearchEngine::search`] request.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// `None` only when the position has no legal moves.
    pub best_move: Option<Move>,
    pub source: Option<MoveSource>,
    /// Score for the side to move at the deepest completed depth.
    pub score: Option<i32>,
    /// Deepest completed depth; zero when nothing was searched.
    pub depth: u8,
    pub seldepth: usize,
    pub nodes: u64,
    pub pv: Vec<Move>,
    pub elapsed: Duration,
    pub state: SearchState,
}

impl SearchOutcome {
    fn unsearched(best_move: Option<Move>, source: Option<MoveSource>, elapsed: Duration) -> Self {
        Self {
            best_move,
            source,
            score: None,
            depth: 0,
            seldepth: 0,
            nodes: 0,
            pv: best_move.into_iter().collect(),
            elapsed,
            state: SearchState::Completed,
        }
    }
}

/// A completed iteration.
struct Iteration {
    best_move: Move,
    score: i32,
    depth: u8,
    pv: Vec<Move>,
}

/// Chooses moves by book lookup or iterative-deepening alpha-beta search.
///
/// The transposition table and the killer and history tables persist
/// across requests until [`reset`](SearchEngine::reset).
pub struct SearchEngine<E = Evaluator> {
    config: EngineConfig,
    evaluator: E,
    book: OpeningBook,
    tt: TranspositionTable,
    killers: Box<KillerTable>,
    history: Box<HistoryTable>,
    rng: StdRng,
    state: SearchState,
}

impl SearchEngine<Evaluator> {
    /// Engine with the handcrafted evaluator and the built-in book.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        Self::with_evaluator(config, Evaluator)
    }
}

impl<E: Evaluate> SearchEngine<E> {
    pub fn with_evaluator(config: EngineConfig, evaluator: E) -> Result<Self, EngineError> {
        config.validate()?;
        let book = OpeningBook::standard()?;
        Ok(Self {
            tt: TranspositionTable::new(config.tt_size_mb),
            killers: Box::new(KillerTable::new()),
            history: Box::new(HistoryTable::new()),
            rng: StdRng::seed_from_u64(config.seed),
            state: SearchState::Idle,
            evaluator,
            book,
            config,
        })
    }

    /// Replace the opening book.
    pub fn with_book(mut self, book: OpeningBook) -> Self {
        self.book = book;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn tt(&self) -> &TranspositionTable {
        &self.tt
    }

    /// Forget everything learned: tables, heuristics and the random stream.
    pub fn reset(&mut self) {
        trace!(
            entries = self.tt.len(),
            hashfull = self.tt.hashfull(),
            "clearing transposition table"
        );
        self.tt.clear();
        self.killers.clear();
        self.history.clear();
        self.rng = StdRng::seed_from_u64(self.config.seed);
        self.state = SearchState::Idle;
        debug!("engine reset");
    }

    /// Best move for the side to move within `budget`, or `None` if the
    /// game is over. `pos` is restored before returning.
    pub fn compute_best_move<P: Position>(&mut self, pos: &mut P, budget: Duration) -> Option<Move> {
        self.search(pos, budget).best_move
    }

    /// Like [`compute_best_move`](Self::compute_best_move) with the full
    /// search report.
    pub fn search<P: Position>(&mut self, pos: &mut P, budget: Duration) -> SearchOutcome {
        let start = Instant::now();
        let moves = pos.legal_moves();

        let outcome = match moves.as_slice() {
            [] => {
                self.state = SearchState::Completed;
                SearchOutcome::unsearched(None, None, start.elapsed())
            }
            [only] => {
                self.state = SearchState::Completed;
                SearchOutcome::unsearched(Some(*only), Some(MoveSource::Forced), start.elapsed())
            }
            _ => match self.book_move(pos) {
                Some(mv) => {
                    self.state = SearchState::Completed;
                    SearchOutcome::unsearched(Some(mv), Some(MoveSource::Book), start.elapsed())
                }
                None => {
                    let control = SearchControl::timed(budget, self.config.check_interval);
                    self.iterate(pos, &moves, control, self.config.max_depth)
                }
            },
        };

        match outcome.best_move {
            Some(mv) => info!(
                best = %mv,
                source = ?outcome.source,
                score = outcome.score,
                depth = outcome.depth,
                nodes = outcome.nodes,
                elapsed_ms = outcome.elapsed.as_millis() as u64,
                "move chosen"
            ),
            None => info!("no legal moves"),
        }
        outcome
    }

    /// Search `pos` to exactly `depth` plies with no time limit, skipping
    /// the book and the single-move shortcut.
    pub fn analyse<P: Position>(&mut self, pos: &mut P, depth: u8) -> SearchOutcome {
        let moves = pos.legal_moves();
        if moves.is_empty() {
            self.state = SearchState::Completed;
            return SearchOutcome::unsearched(None, None, Duration::ZERO);
        }
        self.iterate(pos, &moves, SearchControl::unbounded(), depth)
    }

    fn book_move<P: Position>(&mut self, pos: &P) -> Option<Move> {
        if !self.config.use_book {
            return None;
        }
        let mv = self.book.lookup(pos, &mut self.rng)?;
        debug!(mv = %mv, "book hit");
        Some(mv)
    }

    fn iterate<P: Position>(
        &mut self,
        pos: &mut P,
        moves: &MoveList,
        control: SearchControl,
        max_depth: u8,
    ) -> SearchOutcome {
        let max_depth = max_depth.clamp(1, MAX_DEPTH);
        self.state = SearchState::Searching;

        let mut ctx = SearchContext {
            nodes: 0,
            seldepth: 0,
            tt: &mut self.tt,
            killers: &mut *self.killers,
            history: &mut *self.history,
            pv: PvTable::new(),
            control,
            evaluator: &self.evaluator,
            qsearch_depth: self.config.qsearch_depth,
        };

        let mut completed: Option<Iteration> = None;
        let mut out_of_time = false;

        for depth in 1..=max_depth {
            let Some(score) = negamax(pos, depth, 0, -INF, INF, &mut ctx) else {
                debug!(depth, nodes = ctx.nodes, "iteration aborted");
                out_of_time = true;
                break;
            };
            let pv = ctx.pv.root_pv();
            let Some(&best_move) = pv.first() else {
                break;
            };

            debug!(
                depth,
                seldepth = ctx.seldepth,
                score,
                nodes = ctx.nodes,
                hashfull = ctx.tt.hashfull(),
                elapsed_ms = ctx.control.elapsed().as_millis() as u64,
                pv = %format_pv(&pv),
                "iteration complete"
            );
            completed = Some(Iteration {
                best_move,
                score,
                depth,
                pv,
            });

            if score > MATE_THRESHOLD {
                break;
            }
            if depth < max_depth && ctx.control.budget_spent() {
                out_of_time = true;
                break;
            }
        }

        let nodes = ctx.nodes;
        let seldepth = ctx.seldepth;
        let elapsed = ctx.control.elapsed();
        self.state = if out_of_time {
            SearchState::TimedOut
        } else {
            SearchState::Completed
        };

        match completed {
            Some(it) => SearchOutcome {
                best_move: Some(it.best_move),
                source: Some(MoveSource::Search),
                score: Some(it.score),
                depth: it.depth,
                seldepth,
                nodes,
                pv: it.pv,
                elapsed,
                state: self.state,
            },
            None => {
                let fallback = moves.choose(&mut self.rng).copied();
                debug!("no iteration completed, playing a random legal move");
                SearchOutcome {
                    best_move: fallback,
                    source: Some(MoveSource::Fallback),
                    score: None,
                    depth: 0,
                    seldepth,
                    nodes,
                    pv: fallback.into_iter().collect(),
                    elapsed,
                    state: self.state,
                }
            }
        }
    }
}

fn format_pv(pv: &[Move]) -> String {
    pv.iter().map(|mv| mv.to_uci()).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use kibitz_core::{ChessPosition, Position};

    use super::*;

    fn engine() -> SearchEngine {
        SearchEngine::new(EngineConfig::default().with_max_depth(3).with_book(false)).unwrap()
    }

    #[test]
    fn no_moves_returns_none() {
        let mut pos = ChessPosition::from_fen("7k/6Q1/5K2/8/8/8/8/8 b - - 0 1").unwrap();
        let mut engine = engine();
        assert_eq!(engine.compute_best_move(&mut pos, Duration::from_secs(1)), None);
        assert_eq!(engine.state(), SearchState::Completed);
    }

    #[test]
    fn forced_move_skips_search() {
        // The black king on h8 can only step to g8.
        let mut pos = ChessPosition::from_fen("7k/8/6K1/8/8/8/8/6R1 b - - 0 1").unwrap();
        let mut engine = engine();
        let outcome = engine.search(&mut pos, Duration::from_secs(1));
        assert_eq!(outcome.source, Some(MoveSource::Forced));
        assert_eq!(outcome.nodes, 0);
        assert_eq!(outcome.best_move.map(|m| m.to_uci()).as_deref(), Some("h8g8"));
    }

    #[test]
    fn zero_budget_falls_back_to_a_legal_move() {
        let mut pos = ChessPosition::from_fen(
            "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4",
        )
        .unwrap();
        let mut engine = SearchEngine::new(
            EngineConfig::default()
                .with_book(false)
                .with_check_interval(1),
        )
        .unwrap();
        let outcome = engine.search(&mut pos, Duration::ZERO);
        let mv = outcome.best_move.unwrap();
        assert!(pos.legal_moves().contains(&mv));
        assert_eq!(outcome.source, Some(MoveSource::Fallback));
        assert_eq!(engine.state(), SearchState::TimedOut);
    }

    #[test]
    fn reset_clears_tables_and_state() {
        let mut pos = ChessPosition::startpos();
        let mut engine = engine();
        engine.analyse(&mut pos, 2);
        assert!(!engine.tt().is_empty());
        engine.reset();
        assert!(engine.tt().is_empty());
        assert_eq!(engine.state(), SearchState::Idle);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = EngineConfig::default().with_max_depth(0);
        assert!(matches!(SearchEngine::new(config), Err(EngineError::Config(_))));
    }
}
