//! Showdown and fold equity matrices for a fixed board.
//!
//! `call_matrix` gives, for ranges `x` and `y`, `x' A y` as player 0's
//! equity at a showdown. `fold_matrix` gives `x' B y` as the equity of
//! whichever player did *not* fold. Both are `card_count x card_count`
//! flat row-major matrices, zeroed on entries where the two hands share
//! a card.

use rayon::prelude::*;

use crate::card_tools::possible_hand_indexes;
use crate::cards::{enumerate_boards, Card};
use crate::config::GameParams;
use crate::evaluator::batch_eval;

/// Equity matrices computed for one fixed board.
pub struct TerminalEquity {
    card_count: usize,
    call_matrix: Vec<f64>,
    fold_matrix: Vec<f64>,
}

fn choose(n: u64, k: u64) -> f64 {
    if k > n {
        return 0.0;
    }
    let mut acc = 1.0f64;
    for i in 0..k {
        acc *= (n - i) as f64 / (i + 1) as f64;
    }
    acc
}

/// Zero every entry of `matrix` where either index collides with `board`.
fn handle_blocking_cards(matrix: &mut [f64], board: &[Card], params: &GameParams) {
    let c = params.card_count();
    let mask = possible_hand_indexes(board, params);
    for i in 0..c {
        if mask[i] == 0.0 {
            for j in 0..c {
                matrix[i * c + j] = 0.0;
                matrix[j * c + i] = 0.0;
            }
        }
    }
}

/// The call matrix for a single fully-dealt board: `sign(strength(i) - strength(j))`,
/// with impossible (colliding) hands zeroed out.
fn last_round_call_matrix(board: &[Card], params: &GameParams) -> Vec<f64> {
    let c = params.card_count();
    let strength = batch_eval(board, params);
    let mut out = vec![0.0; c * c];
    for i in 0..c {
        for j in 0..c {
            out[i * c + j] = match strength[i].cmp(&strength[j]) {
                std::cmp::Ordering::Greater => 1.0,
                std::cmp::Ordering::Less => -1.0,
                std::cmp::Ordering::Equal => 0.0,
            };
        }
    }
    handle_blocking_cards(&mut out, board, params);
    out
}

impl TerminalEquity {
    /// Builds the equity matrices for `board`. If `board` has fewer cards
    /// than `params.board_card_count` (the first betting round), averages
    /// the last-round call matrix over every possible completion.
    pub fn new(board: &[Card], params: &GameParams) -> Self {
        let c = params.card_count();
        let call_matrix = if board.len() < params.board_card_count as usize {
            let mut acc = vec![0.0; c * c];
            for full_board in enumerate_boards(params) {
                if !board.iter().all(|card| full_board.contains(card)) {
                    continue;
                }
                let m = last_round_call_matrix(&full_board, params);
                for (a, v) in acc.iter_mut().zip(&m) {
                    *a += v;
                }
            }
            let remaining = params.board_card_count as u64 - board.len() as u64;
            let weight = 1.0 / choose(c as u64 - 2, remaining);
            for v in acc.iter_mut() {
                *v *= weight;
            }
            acc
        } else {
            last_round_call_matrix(board, params)
        };

        let mut fold_matrix = vec![1.0; c * c];
        for i in 0..c {
            fold_matrix[i * c + i] = 0.0;
        }
        handle_blocking_cards(&mut fold_matrix, board, params);

        TerminalEquity { card_count: c, call_matrix, fold_matrix }
    }

    /// `result = ranges . call_matrix`, a batch of N range vectors times the
    /// card_count x card_count matrix, giving N cfv vectors.
    pub fn call_value(&self, ranges: &[f64], result: &mut [f64]) {
        self.matvec(&self.call_matrix, ranges, result);
    }

    /// `result = ranges . fold_matrix`. Positive cfvs; caller negates for
    /// the folding player.
    pub fn fold_value(&self, ranges: &[f64], result: &mut [f64]) {
        self.matvec(&self.fold_matrix, ranges, result);
    }

    fn matvec(&self, matrix: &[f64], ranges: &[f64], result: &mut [f64]) {
        let c = self.card_count;
        let batch = ranges.len() / c;
        assert_eq!(result.len(), batch * c);
        for b in 0..batch {
            let row_in = &ranges[b * c..(b + 1) * c];
            let row_out = &mut result[b * c..(b + 1) * c];
            for j in 0..c {
                let mut acc = 0.0;
                for i in 0..c {
                    acc += row_in[i] * matrix[i * c + j];
                }
                row_out[j] = acc;
            }
        }
    }

    /// Counterfactual values for both players at a showdown node, laid out as
    /// two concatenated range/result vectors of length `card_count` each.
    pub fn tree_node_call_values(&self, ranges: (&[f64], &[f64]), result: (&mut [f64], &mut [f64])) {
        self.call_value(ranges.0, result.1);
        self.call_value(ranges.1, result.0);
    }

    /// Counterfactual values for both players at a fold node. `folding_player`
    /// is negated after computing raw fold equity.
    pub fn tree_node_fold_values(
        &self,
        ranges: (&[f64], &[f64]),
        result: (&mut [f64], &mut [f64]),
        folding_player: usize,
    ) {
        self.fold_value(ranges.0, result.1);
        self.fold_value(ranges.1, result.0);
        let negated = if folding_player == 0 { &mut *result.0 } else { &mut *result.1 };
        for v in negated.iter_mut() {
            *v = -*v;
        }
    }

    /// Same as [`TerminalEquity::call_value`], but splits the batch across
    /// rayon's thread pool. Each row of the batch is an independent
    /// reduction, so results are identical to the sequential path; this is
    /// an opt-in call site for callers batching many boards/ranges at once.
    pub fn call_value_parallel(&self, ranges: &[f64], result: &mut [f64]) {
        self.matvec_parallel(&self.call_matrix, ranges, result);
    }

    fn matvec_parallel(&self, matrix: &[f64], ranges: &[f64], result: &mut [f64]) {
        let c = self.card_count;
        let batch = ranges.len() / c;
        assert_eq!(result.len(), batch * c);
        result.par_chunks_mut(c).enumerate().for_each(|(b, row_out)| {
            let row_in = &ranges[b * c..(b + 1) * c];
            for j in 0..c {
                let mut acc = 0.0;
                for i in 0..c {
                    acc += row_in[i] * matrix[i * c + j];
                }
                row_out[j] = acc;
            }
        });
    }

    pub fn call_matrix(&self) -> &[f64] {
        &self.call_matrix
    }

    pub fn fold_matrix(&self) -> &[f64] {
        &self.fold_matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> GameParams {
        GameParams::leduc_default()
    }

    #[test]
    fn call_matrix_is_antisymmetric() {
        let p = params();
        let te = TerminalEquity::new(&[2], &p);
        let c = p.card_count();
        for i in 0..c {
            for j in 0..c {
                assert_eq!(te.call_matrix[i * c + j], -te.call_matrix[j * c + i]);
            }
        }
    }

    #[test]
    fn call_matrix_zero_on_diagonal() {
        let p = params();
        let te = TerminalEquity::new(&[2], &p);
        let c = p.card_count();
        for i in 0..c {
            assert_eq!(te.call_matrix[i * c + i], 0.0);
        }
    }

    #[test]
    fn fold_matrix_ones_off_diagonal_zero_on_it() {
        let p = params();
        let te = TerminalEquity::new(&[2], &p);
        let c = p.card_count();
        for i in 0..c {
            for j in 0..c {
                if i == j {
                    assert_eq!(te.fold_matrix[i * c + j], 0.0);
                } else if i != 2 && j != 2 {
                    assert_eq!(te.fold_matrix[i * c + j], 1.0);
                }
            }
        }
    }

    #[test]
    fn blocking_card_rows_are_zeroed() {
        let p = params();
        let te = TerminalEquity::new(&[2], &p);
        let c = p.card_count();
        for j in 0..c {
            assert_eq!(te.call_matrix[2 * c + j], 0.0);
            assert_eq!(te.fold_matrix[2 * c + j], 0.0);
        }
    }

    #[test]
    fn call_value_matches_manual_matvec() {
        let p = params();
        let te = TerminalEquity::new(&[2], &p);
        let c = p.card_count();
        let range = crate::card_tools::uniform_range(&[2], &p);
        let mut result = vec![0.0; c];
        te.call_value(&range, &mut result);
        let mut expected = vec![0.0; c];
        for j in 0..c {
            let mut acc = 0.0;
            for i in 0..c {
                acc += range[i] * te.call_matrix[i * c + j];
            }
            expected[j] = acc;
        }
        assert_eq!(result, expected);
    }

    #[test]
    fn call_value_parallel_matches_sequential() {
        let p = params();
        let te = TerminalEquity::new(&[2], &p);
        let c = p.card_count();
        let mut ranges = Vec::new();
        ranges.extend(crate::card_tools::uniform_range(&[2], &p));
        ranges.extend(crate::card_tools::uniform_range(&[2], &p));
        let mut sequential = vec![0.0; 2 * c];
        let mut parallel = vec![0.0; 2 * c];
        te.call_value(&ranges, &mut sequential);
        te.call_value_parallel(&ranges, &mut parallel);
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn tree_node_fold_negates_folder() {
        let p = params();
        let te = TerminalEquity::new(&[2], &p);
        let c = p.card_count();
        let r0 = crate::card_tools::uniform_range(&[2], &p);
        let r1 = crate::card_tools::uniform_range(&[2], &p);
        let mut out0 = vec![0.0; c];
        let mut out1 = vec![0.0; c];
        te.tree_node_fold_values((&r0, &r1), (&mut out0, &mut out1), 0);
        // player 0 folded: their result should be <= 0 (raw fold equity is >= 0).
        assert!(out0.iter().all(|&v| v <= 1e-9));
    }
}
