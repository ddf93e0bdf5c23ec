//! Pure move-scoring helpers for an external search to order moves with.
//! Selection (sorting a per-ply list) is left to the caller — these functions
//! only price a single move.

use crate::board::{Board, Piece};
use crate::moves::types::Move;

/// Bonus added on top of a capture's victim value when the victim is at
/// least as valuable as the attacker (a favorable or even trade).
const EQUAL_OR_WINNING_TRADE_BONUS: i32 = 50;

const CASTLE_SCORE: i32 = 100;

/// Score for a capturing move. King captures are unreachable in legal play
/// (the king is never actually captured — the position is illegal first) and
/// score as a sentinel so a search that stumbles into one sees it first.
pub fn score_capture(mv: Move, board: &Board) -> i32 {
    let captured = if mv.is_en_passant() {
        Some(Piece::Pawn)
    } else {
        board.piece_at(mv.to).map(|(_, piece)| piece)
    };

    let Some(captured) = captured else {
        return 0;
    };

    if captured == Piece::King {
        return i32::MAX;
    }

    let captured_value = captured.value();
    let mover_value = mv.piece.value();
    let mut score = captured_value;
    if captured_value >= mover_value {
        score += EQUAL_OR_WINNING_TRADE_BONUS;
    }
    score
}

pub fn score_castle(mv: Move) -> i32 {
    if mv.is_castling() { CASTLE_SCORE } else { 0 }
}
