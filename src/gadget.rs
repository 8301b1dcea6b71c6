//! CFR-D gadget: reconstructs an opponent range at the root of a re-solve
//! from the opponent's counterfactual values in the previous solve, by
//! running a two-action (play / terminate) regret-matching game per hand.
//!
//! Ganzfried & Sandholm, "Solving Imperfect Information Games Using
//! Decomposition" (AAAI 2014).

use crate::card_tools::possible_hand_indexes;
use crate::cards::Card;
use crate::config::GameParams;

const REGRET_EPSILON: f64 = 1e-8;

pub struct CfrdGadget {
    card_count: usize,
    /// The opponent's cfvs from the previous solve: the payoff for terminating.
    terminate_values: Vec<f64>,
    range_mask: Vec<f64>,

    play_regrets: Vec<f64>,
    terminate_regrets: Vec<f64>,
    play_strategy: Vec<f64>,
    terminate_strategy: Vec<f64>,
}

impl CfrdGadget {
    pub fn new(board: &[Card], opponent_cfvs: Vec<f64>, params: &GameParams) -> Self {
        let card_count = params.card_count();
        assert_eq!(opponent_cfvs.len(), card_count);
        CfrdGadget {
            card_count,
            terminate_values: opponent_cfvs,
            range_mask: possible_hand_indexes(board, params),
            play_regrets: vec![0.0; card_count],
            terminate_regrets: vec![0.0; card_count],
            play_strategy: vec![0.0; card_count],
            terminate_strategy: vec![1.0; card_count],
        }
    }

    /// One iteration of the gadget game: `current_opponent_cfvs` is what the
    /// opponent receives under the current re-solve strategy. Returns the
    /// reconstructed opponent range to feed back into the next iteration.
    pub fn compute_opponent_range(&mut self, current_opponent_cfvs: &[f64]) -> Vec<f64> {
        assert_eq!(current_opponent_cfvs.len(), self.card_count);
        let play_values = current_opponent_cfvs;
        let terminate_values = &self.terminate_values;

        let mut total_values = vec![0.0; self.card_count];
        for i in 0..self.card_count {
            total_values[i] =
                play_values[i] * self.play_strategy[i] + terminate_values[i] * self.terminate_strategy[i];
        }

        for i in 0..self.card_count {
            let play_regret = play_values[i] - total_values[i];
            let terminate_regret = terminate_values[i] - total_values[i];
            self.play_regrets[i] += play_regret;
            self.terminate_regrets[i] += terminate_regret;

            // CFR+ regret flooring: never let cumulative regret go negative.
            self.play_regrets[i] = self.play_regrets[i].max(REGRET_EPSILON);
            self.terminate_regrets[i] = self.terminate_regrets[i].max(REGRET_EPSILON);
        }

        for i in 0..self.card_count {
            let sum = self.play_regrets[i] + self.terminate_regrets[i];
            self.play_strategy[i] = self.play_regrets[i] / sum;
            self.terminate_strategy[i] = self.terminate_regrets[i] / sum;
            self.play_strategy[i] *= self.range_mask[i];
            self.terminate_strategy[i] *= self.range_mask[i];
        }

        self.play_strategy.clone()
    }
}
