//! Operations on range vectors: probability distributions over private
//! hands, masked by which hands collide with a given board.

use crate::cards::Card;
use crate::config::GameParams;

/// `1.0` for every hand that shares no card with `board`, else `0.0`.
pub fn possible_hand_indexes(board: &[Card], params: &GameParams) -> Vec<f64> {
    let c = params.card_count();
    let mut out = vec![1.0; c];
    for &card in board {
        out[card as usize] = 0.0;
    }
    out
}

/// The current betting round implied by board size: empty board is street 1.
pub fn board_to_street(board: &[Card]) -> u8 {
    if board.is_empty() {
        1
    } else {
        2
    }
}

/// A range with uniform probability over board-possible hands.
pub fn uniform_range(board: &[Card], params: &GameParams) -> Vec<f64> {
    let mask = possible_hand_indexes(board, params);
    let total: f64 = mask.iter().sum();
    mask.iter().map(|&m| m / total).collect()
}

/// Mask `range` by board-possible hands and renormalize to sum to 1.
/// If every possible hand has zero probability, returns the all-zero vector
/// (avoids a division by zero; this is a numerical-degeneracy case, not an
/// error, per the error-handling design).
pub fn normalize_range(board: &[Card], range: &[f64], params: &GameParams) -> Vec<f64> {
    let mask = possible_hand_indexes(board, params);
    let mut out: Vec<f64> = range.iter().zip(&mask).map(|(r, m)| r * m).collect();
    let total: f64 = out.iter().sum();
    if total == 0.0 {
        return out;
    }
    for v in out.iter_mut() {
        *v /= total;
    }
    out
}

/// Whether `range` has zero mass on board-blocked hands and sums to one.
pub fn is_valid_range(range: &[f64], board: &[Card], params: &GameParams) -> bool {
    let mask = possible_hand_indexes(board, params);
    let blocked_mass: f64 = range
        .iter()
        .zip(&mask)
        .filter(|(_, &m)| m == 0.0)
        .map(|(r, _)| r)
        .sum();
    let sum: f64 = range.iter().sum();
    blocked_mass.abs() < 1e-9 && (sum - 1.0).abs() < 1e-4
}
