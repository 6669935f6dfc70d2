//! Tactical pressure: hanging pieces, double attacks, knight fork squares
//! and pins.

use kibitz_core::{Color, PieceKind, Square};

use crate::eval::board::EvalBoard;
use crate::eval::material::piece_value;
use crate::eval::score::{S, Score};

/// Penalty divisor for a piece that is attacked and undefended, or attacked
/// by something cheaper than itself.
const HANGING_DIVISOR: i32 = 8;

/// A piece currently attacking two or more enemy pieces worth more than it,
/// or left undefended.
const DOUBLE_ATTACK: Score = S(30, 25);

/// A knight one move away from forking two valuable pieces.
const FORK_SQUARE: Score = S(12, 8);

/// An enemy piece pinned against a more valuable piece behind it.
const PIN: Score = S(15, 10);

const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ORTHOGONALS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Penalty owed by `color` for its exposed pieces.
fn hanging(board: &EvalBoard, color: Color) -> Score {
    let defended = board.attacked_by(color);
    let mut score = Score::ZERO;
    for sq in board.side(color) & board.attacked_by(!color) {
        let Some(piece) = board.piece_on(sq) else {
            continue;
        };
        if piece.kind == PieceKind::King {
            continue;
        }
        let value = piece_value(piece.kind);
        let cheapest = board
            .attackers(sq, !color)
            .filter_map(|a| board.piece_on(a))
            .map(|a| piece_value(a.kind))
            .min()
            .unwrap_or(value);

        let loss = if !defended.contains(sq) {
            value
        } else {
            (value - cheapest).max(0)
        };
        score -= Score::new(loss / HANGING_DIVISOR, loss / HANGING_DIVISOR);
    }
    score
}

/// Whether `target` is worth attacking for a piece of value `attacker`.
fn is_target(board: &EvalBoard, target: Square, attacker: i32, enemy: Color) -> bool {
    board.piece_on(target).is_some_and(|p| {
        p.color == enemy
            && (piece_value(p.kind) > attacker || !board.attacked_by(enemy).contains(target))
    })
}

fn double_attacks(board: &EvalBoard, color: Color) -> Score {
    let enemy = !color;
    let mut score = Score::ZERO;
    for sq in board.side(color) {
        let Some(piece) = board.piece_on(sq) else {
            continue;
        };
        let value = piece_value(piece.kind);
        let targets = (board.attacks(sq) & board.side(enemy))
            .filter(|&t| is_target(board, t, value, enemy))
            .count();
        if targets >= 2 {
            score += DOUBLE_ATTACK;
        }
    }
    score
}

/// Knights with a safe jump that would attack two rooks, queens or kings.
fn fork_squares(board: &EvalBoard, color: Color) -> Score {
    let enemy = !color;
    let enemy_pawn_attacks = board
        .pieces(enemy, PieceKind::Pawn)
        .fold(kibitz_core::SquareSet::EMPTY, |acc, sq| acc | board.attacks(sq));
    let knight = piece_value(PieceKind::Knight);

    let mut score = Score::ZERO;
    for from in board.pieces(color, PieceKind::Knight) {
        let landing = board.attacks(from) & !board.side(color) & !enemy_pawn_attacks;
        let forks = landing.into_iter().any(|jump| {
            KNIGHT_JUMPS
                .iter()
                .filter_map(|&(df, dr)| jump.offset(df, dr))
                .filter(|&t| {
                    board.piece_on(t).is_some_and(|p| {
                        p.color == enemy && piece_value(p.kind) > knight + 100
                    })
                })
                .count()
                >= 2
        });
        if forks {
            score += FORK_SQUARE;
        }
    }
    score
}

fn slider_directions(kind: PieceKind) -> &'static [(i8, i8)] {
    match kind {
        PieceKind::Bishop => &DIAGONALS,
        PieceKind::Rook => &ORTHOGONALS,
        PieceKind::Queen => &[
            (1, 1),
            (1, -1),
            (-1, 1),
            (-1, -1),
            (1, 0),
            (-1, 0),
            (0, 1),
            (0, -1),
        ],
        _ => &[],
    }
}

/// Enemy pieces pinned by `color`'s sliders.
fn pins(board: &EvalBoard, color: Color) -> Score {
    let enemy = !color;
    let mut score = Score::ZERO;
    for sq in board.side(color) {
        let Some(slider) = board.piece_on(sq) else {
            continue;
        };
        for &(df, dr) in slider_directions(slider.kind) {
            let mut ray = sq.offset(df, dr);
            let mut front = None;
            while let Some(cur) = ray {
                if let Some(p) = board.piece_on(cur) {
                    if p.color != enemy {
                        break;
                    }
                    match front {
                        None => front = Some(p),
                        Some(first) => {
                            if p.kind == PieceKind::King
                                || piece_value(p.kind) > piece_value(first.kind)
                            {
                                score += PIN;
                            }
                            break;
                        }
                    }
                }
                ray = cur.offset(df, dr);
            }
        }
    }
    score
}

fn side_threats(board: &EvalBoard, color: Color) -> Score {
    hanging(board, color)
        + double_attacks(board, color)
        + fork_squares(board, color)
        + pins(board, color)
}

/// Tactical balance, White-relative.
pub fn threats(board: &EvalBoard) -> Score {
    side_threats(board, Color::White) - side_threats(board, Color::Black)
}
