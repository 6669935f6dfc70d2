//! [`Position`] implementation backed by the `chess` crate.
//!
//! `chess::Board` is a copy-make value without counters or history, so
//! the adapter keeps an undo stack of previous boards together with the
//! halfmove clock, the game ply, and the keys needed for repetition.

use std::fmt;
use std::str::FromStr;

use chess::{Board, BoardStatus, ChessMove, MoveGen};
use tracing::trace;

use crate::chess_move::{Move, MoveFlags, MoveList};
use crate::color::Color;
use crate::error::PositionError;
use crate::fen::{FenFields, mirror_fen};
use crate::piece::{Piece, PieceKind};
use crate::position::Position;
use crate::square::{Square, SquareSet};

#[derive(Debug, Clone, Copy)]
struct Undo {
    board: Board,
    halfmove_clock: u32,
}

/// A standard chess position with reversible move application.
#[derive(Clone)]
pub struct ChessPosition {
    board: Board,
    halfmove_clock: u32,
    game_ply: u32,
    undo: Vec<Undo>,
    /// Keys of every earlier position, oldest first; same length as `undo`.
    keys: Vec<u64>,
}

impl ChessPosition {
    /// The standard starting position.
    pub fn startpos() -> Self {
        Self::from_board(Board::default(), 0, 0)
    }

    /// Parse a FEN string; the two move counters are optional.
    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        let fields = FenFields::parse(fen)?;
        let board = Board::from_str(&fields.position_only()).map_err(|err| {
            PositionError::InvalidFen {
                fen: fen.to_string(),
                reason: format!("{err:?}"),
            }
        })?;

        let black_to_move = board.side_to_move() == chess::Color::Black;
        let game_ply = fields.fullmove_number.saturating_sub(1) * 2 + u32::from(black_to_move);
        Ok(Self::from_board(board, fields.halfmove_clock, game_ply))
    }

    fn from_board(board: Board, halfmove_clock: u32, game_ply: u32) -> Self {
        Self {
            board,
            halfmove_clock,
            game_ply,
            undo: Vec::with_capacity(64),
            keys: Vec::with_capacity(64),
        }
    }

    /// Play a move given in UCI notation, keeping it undoable.
    pub fn play_uci(&mut self, uci: &str) -> Result<Move, PositionError> {
        let mv = self
            .find_move(uci)
            .ok_or_else(|| PositionError::IllegalMove { uci: uci.to_string() })?;
        self.make_move(mv);
        Ok(mv)
    }

    /// The color-mirrored counterpart of this position (see [`mirror_fen`]).
    pub fn mirrored(&self) -> Result<Self, PositionError> {
        Self::from_fen(&mirror_fen(&self.fen())?)
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.game_ply / 2 + 1
    }

    /// Full six-field FEN.
    pub fn fen(&self) -> String {
        let en_passant = self
            .en_passant_target()
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());
        format!(
            "{} {} {} {} {} {}",
            self.placement(),
            self.side_to_move(),
            self.castling(),
            en_passant,
            self.halfmove_clock,
            self.fullmove_number()
        )
    }

    fn placement(&self) -> String {
        let mut out = String::with_capacity(72);
        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                let Some(sq) = Square::new(file, rank) else { continue };
                match self.piece_on(sq) {
                    Some(piece) => {
                        if empty > 0 {
                            out.push(char::from(b'0' + empty));
                            empty = 0;
                        }
                        out.push(piece.fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push(char::from(b'0' + empty));
            }
            if rank > 0 {
                out.push('/');
            }
        }
        out
    }

    fn castling(&self) -> String {
        let white = self.board.castle_rights(chess::Color::White);
        let black = self.board.castle_rights(chess::Color::Black);
        let mut out = String::with_capacity(4);
        if white.has_kingside() {
            out.push('K');
        }
        if white.has_queenside() {
            out.push('Q');
        }
        if black.has_kingside() {
            out.push('k');
        }
        if black.has_queenside() {
            out.push('q');
        }
        if out.is_empty() {
            out.push('-');
        }
        out
    }

    /// The square a capturing pawn would land on, if en passant is available.
    fn en_passant_target(&self) -> Option<Square> {
        // The backend reports the square of the pawn that just double-pushed.
        let pawn = Square::from(self.board.en_passant()?);
        let forward = match self.side_to_move() {
            Color::White => 1,
            Color::Black => -1,
        };
        pawn.offset(0, forward)
    }

    fn to_backend(mv: Move) -> ChessMove {
        ChessMove::new(mv.from().into(), mv.to().into(), mv.promotion().map(Into::into))
    }

    fn annotate(board: &Board, cm: ChessMove) -> Move {
        let from = Square::from(cm.get_source());
        let to = Square::from(cm.get_dest());
        let piece = board
            .piece_on(cm.get_source())
            .map_or(PieceKind::Pawn, PieceKind::from);

        let mut mv = Move::new(from, to).with_piece(piece);

        if let Some(victim) = board.piece_on(cm.get_dest()) {
            mv = mv.with_capture(victim.into());
        } else if piece == PieceKind::Pawn && from.file() != to.file() {
            mv = mv
                .with_capture(PieceKind::Pawn)
                .with_flags(MoveFlags::EN_PASSANT);
        }

        if let Some(promo) = cm.get_promotion() {
            mv = mv.with_promotion(promo.into());
        }

        if piece == PieceKind::King && from.file().abs_diff(to.file()) == 2 {
            mv = mv.with_flags(MoveFlags::CASTLE);
        }

        if board.make_move_new(cm).checkers().popcnt() > 0 {
            mv = mv.with_flags(MoveFlags::CHECK);
        }

        mv
    }

    fn is_repetition(&self) -> bool {
        let key = self.board.get_hash();
        self.keys
            .iter()
            .rev()
            .take(self.halfmove_clock as usize)
            .any(|&earlier| earlier == key)
    }

    fn insufficient_material(&self) -> bool {
        let kings = *self.board.pieces(chess::Piece::King);
        let others = *self.board.combined() & !kings;
        match others.popcnt() {
            0 => true,
            1 => {
                let minors = *self.board.pieces(chess::Piece::Knight)
                    | *self.board.pieces(chess::Piece::Bishop);
                (others & minors).popcnt() == 1
            }
            _ => false,
        }
    }
}

impl Position for ChessPosition {
    fn key(&self) -> u64 {
        self.board.get_hash()
    }

    fn side_to_move(&self) -> Color {
        self.board.side_to_move().into()
    }

    fn legal_moves(&self) -> MoveList {
        MoveGen::new_legal(&self.board)
            .map(|cm| Self::annotate(&self.board, cm))
            .collect()
    }

    fn legal_moves_for(&self, color: Color) -> Option<MoveList> {
        if color == self.side_to_move() {
            return Some(self.legal_moves());
        }
        // A pass hands the move over; the backend refuses it while in check.
        let passed = self.board.null_move()?;
        Some(
            MoveGen::new_legal(&passed)
                .map(|cm| Self::annotate(&passed, cm))
                .collect(),
        )
    }

    fn make_move(&mut self, mv: Move) {
        let cm = Self::to_backend(mv);
        debug_assert!(self.board.legal(cm), "illegal move {mv} in {}", self.fen());

        let irreversible = self.board.piece_on(cm.get_source()) == Some(chess::Piece::Pawn)
            || self.board.piece_on(cm.get_dest()).is_some();

        self.undo.push(Undo {
            board: self.board,
            halfmove_clock: self.halfmove_clock,
        });
        self.keys.push(self.board.get_hash());

        self.board = self.board.make_move_new(cm);
        self.halfmove_clock = if irreversible { 0 } else { self.halfmove_clock + 1 };
        self.game_ply += 1;
    }

    fn unmake_move(&mut self) {
        let Some(undo) = self.undo.pop() else {
            panic!("unmake_move called without a matching make_move");
        };
        self.keys.pop();
        self.board = undo.board;
        self.halfmove_clock = undo.halfmove_clock;
        self.game_ply -= 1;
    }

    fn in_check(&self) -> bool {
        self.board.checkers().popcnt() > 0
    }

    fn is_checkmate(&self) -> bool {
        self.board.status() == BoardStatus::Checkmate
    }

    fn is_stalemate(&self) -> bool {
        self.board.status() == BoardStatus::Stalemate
    }

    fn is_draw(&self) -> bool {
        let draw = self.halfmove_clock >= 100 || self.is_repetition() || self.insufficient_material();
        if draw {
            trace!(key = self.key(), "draw by rule");
        }
        draw
    }

    fn piece_on(&self, sq: Square) -> Option<Piece> {
        let square: chess::Square = sq.into();
        let kind = self.board.piece_on(square)?;
        let color = self.board.color_on(square)?;
        Some(Piece::new(color.into(), kind.into()))
    }

    fn attacks_from(&self, sq: Square) -> SquareSet {
        let Some(piece) = self.piece_on(sq) else {
            return SquareSet::EMPTY;
        };
        let square: chess::Square = sq.into();
        let blockers = *self.board.combined();
        let attacks = match piece.kind {
            PieceKind::Pawn => chess::get_pawn_attacks(square, piece.color.into(), !chess::EMPTY),
            PieceKind::Knight => chess::get_knight_moves(square),
            PieceKind::Bishop => chess::get_bishop_moves(square, blockers),
            PieceKind::Rook => chess::get_rook_moves(square, blockers),
            PieceKind::Queen => {
                chess::get_bishop_moves(square, blockers) | chess::get_rook_moves(square, blockers)
            }
            PieceKind::King => chess::get_king_moves(square),
        };
        attacks.into()
    }

    fn occupied(&self) -> SquareSet {
        (*self.board.combined()).into()
    }

    fn game_ply(&self) -> u32 {
        self.game_ply
    }

    fn signature(&self) -> String {
        let en_passant_file = self
            .board
            .en_passant()
            .map_or('-', |sq| char::from(b'a' + Square::from(sq).file()));
        format!(
            "{} {} {} {}",
            self.placement(),
            self.side_to_move(),
            self.castling(),
            en_passant_file
        )
    }
}

impl Default for ChessPosition {
    fn default() -> Self {
        Self::startpos()
    }
}

impl FromStr for ChessPosition {
    type Err = PositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}

impl fmt::Display for ChessPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fen())
    }
}

impl fmt::Debug for ChessPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChessPosition")
            .field("fen", &self.fen())
            .field("depth", &self.undo.len())
            .finish()
    }
}
