//! The depth-limit boundary: an opaque call that turns bucketed ranges into
//! bucketed counterfactual values. In production this is a neural net; this
//! crate only defines the seam and ships a couple of deterministic doubles
//! for testing, in the spirit of the reference engine's mock re-solver.

use crate::bucket_conversion::BucketConversion;
use crate::evaluator::batch_eval;
use crate::terminal_equity::TerminalEquity;

/// Turns a batch of bucketed range pairs into a batch of bucketed cfvs.
///
/// `inputs` is `batch * 2 * bucket_count` long: for each batch entry, the
/// acting player's range followed by the opponent's range, both in bucket
/// space. `outputs` is `batch * 2 * bucket_count` long and receives the
/// counterfactual values for both players in the same layout.
pub trait ValueOracle {
    fn get_value(&self, inputs: &[f64], outputs: &mut [f64], batch: usize, bucket_count: usize);
}

/// Always returns zero value. Useful for unit tests that only care about
/// tree shape, or as a baseline sanity check.
pub struct ZeroValueOracle;

impl ValueOracle for ZeroValueOracle {
    fn get_value(&self, _inputs: &[f64], outputs: &mut [f64], _batch: usize, _bucket_count: usize) {
        outputs.iter_mut().for_each(|v| *v = 0.0);
    }
}

/// Computes exact showdown equity for a fixed board instead of querying a
/// network, via [`TerminalEquity`]. Used to validate the lookahead/resolver
/// against ground truth on boards small enough to solve exactly.
pub struct ShowdownOracle {
    terminal_equity: TerminalEquity,
    bucket_conversion: BucketConversion,
    card_count: usize,
}

impl ShowdownOracle {
    pub fn new(board: &[crate::cards::Card], params: &crate::config::GameParams) -> Self {
        ShowdownOracle {
            terminal_equity: TerminalEquity::new(board, params),
            bucket_conversion: BucketConversion::new(board, params),
            card_count: params.card_count(),
        }
    }
}

impl ValueOracle for ShowdownOracle {
    fn get_value(&self, inputs: &[f64], outputs: &mut [f64], batch: usize, bucket_count: usize) {
        let stride = 2 * bucket_count;
        assert_eq!(inputs.len(), batch * stride);
        assert_eq!(outputs.len(), batch * stride);

        let mut card_range = vec![0.0; self.card_count];
        let mut card_value = vec![0.0; self.card_count];
        let mut bucket_value = vec![0.0; bucket_count];

        for b in 0..batch {
            let base = b * stride;
            for player in 0..2 {
                let opp = 1 - player;
                let opp_range = &inputs[base + opp * bucket_count..base + (opp + 1) * bucket_count];
                self.bucket_conversion
                    .bucket_value_to_card_value(opp_range, &mut card_range);
                self.terminal_equity.call_value(&card_range, &mut card_value);
                self.bucket_conversion
                    .card_range_to_bucket_range(&card_value, &mut bucket_value);
                outputs[base + player * bucket_count..base + (player + 1) * bucket_count]
                    .copy_from_slice(&bucket_value);
            }
        }
    }
}

/// Re-exported for callers that want raw showdown strength without going
/// through an oracle (e.g. the resolver's exploitability check).
pub fn showdown_strength(board: &[crate::cards::Card], params: &crate::config::GameParams) -> Vec<i32> {
    batch_eval(board, params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bucketer::bucket_count as total_bucket_count;
    use crate::config::GameParams;

    #[test]
    fn zero_oracle_zeros_everything() {
        let oracle = ZeroValueOracle;
        let mut out = vec![7.0; 10];
        oracle.get_value(&[1.0; 10], &mut out, 1, 5);
        assert!(out.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn showdown_oracle_respects_shapes() {
        let p = GameParams::leduc_default();
        let oracle = ShowdownOracle::new(&[2], &p);
        let bc = total_bucket_count(&p);
        let mut inputs = vec![0.0; 2 * bc];
        inputs[0] = 1.0;
        inputs[bc] = 1.0;
        let mut outputs = vec![0.0; 2 * bc];
        oracle.get_value(&inputs, &mut outputs, 1, bc);
        assert_eq!(outputs.len(), 2 * bc);
    }
}
