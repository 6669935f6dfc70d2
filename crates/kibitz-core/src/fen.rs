//! FEN helpers layered over the rules backend's parser.

use crate::error::PositionError;
use crate::square::Square;

/// FEN for the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// The six FEN fields, with defaults filled in for omitted counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FenFields<'a> {
    pub placement: &'a str,
    pub side: &'a str,
    pub castling: &'a str,
    pub en_passant: &'a str,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl<'a> FenFields<'a> {
    /// Split a FEN string. The two move counters may be omitted.
    pub fn parse(fen: &'a str) -> Result<Self, PositionError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if !(4..=6).contains(&fields.len()) {
            return Err(PositionError::WrongFieldCount {
                found: fields.len(),
            });
        }

        let halfmove_clock = match fields.get(4) {
            Some(text) => text.parse().map_err(|_| PositionError::InvalidMoveCounter {
                field: "halfmove clock",
                found: (*text).to_string(),
            })?,
            None => 0,
        };
        let fullmove_number = match fields.get(5) {
            Some(text) => text.parse().map_err(|_| PositionError::InvalidMoveCounter {
                field: "fullmove number",
                found: (*text).to_string(),
            })?,
            None => 1,
        };

        Ok(FenFields {
            placement: fields[0],
            side: fields[1],
            castling: fields[2],
            en_passant: fields[3],
            halfmove_clock,
            fullmove_number,
        })
    }

    /// The four position fields with neutral counters, as the backend expects.
    pub fn position_only(&self) -> String {
        format!(
            "{} {} {} {} 0 1",
            self.placement, self.side, self.castling, self.en_passant
        )
    }
}

/// Mirror a position vertically and swap the colors of every piece, the
/// side to move, castling rights, and the en passant square.
///
/// The result is the same position "seen from the other side": a
/// side-symmetric evaluation scores both identically for the side to move.
pub fn mirror_fen(fen: &str) -> Result<String, PositionError> {
    let fields = FenFields::parse(fen)?;

    let placement = fields
        .placement
        .split('/')
        .rev()
        .map(swap_case)
        .collect::<Vec<_>>()
        .join("/");

    let side = match fields.side {
        "w" => "b",
        "b" => "w",
        other => {
            return Err(PositionError::InvalidFen {
                fen: fen.to_string(),
                reason: format!("bad side to move \"{other}\""),
            });
        }
    };

    let castling = if fields.castling == "-" {
        "-".to_string()
    } else {
        let swapped = swap_case(fields.castling);
        "KQkq".chars().filter(|c| swapped.contains(*c)).collect()
    };

    let en_passant = if fields.en_passant == "-" {
        "-".to_string()
    } else {
        fields.en_passant.parse::<Square>()?.flip_rank().to_string()
    };

    Ok(format!(
        "{placement} {side} {castling} {en_passant} {} {}",
        fields.halfmove_clock, fields.fullmove_number
    ))
}

fn swap_case(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_ascii_uppercase() {
                c.to_ascii_lowercase()
            } else {
                c.to_ascii_uppercase()
            }
        })
        .collect()
}
