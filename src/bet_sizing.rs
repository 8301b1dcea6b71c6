//! Legal raise sizes at a betting node, restricted to a list of pot
//! fractions plus all-in.

/// A betting state: chips committed so far by each player, and whose turn it is.
#[derive(Debug, Clone, Copy)]
pub struct BetState {
    pub bets: [f64; 2],
    pub current_player: usize,
}

/// Gives allowed raise sizes during a game, as fractions of the pot.
#[derive(Debug, Clone)]
pub struct BetSizing {
    /// Pot fractions allowed as raises, ascending.
    pot_fractions: Vec<f64>,
}

impl BetSizing {
    pub fn new(pot_fractions: Vec<f64>) -> Self {
        BetSizing { pot_fractions }
    }

    /// The new commitment levels `[player0, player1]` legal from `state`,
    /// one per allowed raise size plus all-in. Empty if the facing player
    /// cannot raise (already shoved).
    pub fn possible_bets(&self, state: &BetState, ante: f64, stack: f64) -> Vec<[f64; 2]> {
        let current_player = state.current_player;
        assert!(current_player == 0 || current_player == 1, "bad current_player");
        let opponent = 1 - current_player;
        let opponent_bet = state.bets[opponent];
        assert!(state.bets[current_player] <= opponent_bet);

        let max_raise_size = stack - opponent_bet;
        let mut min_raise_size = opponent_bet - state.bets[current_player];
        min_raise_size = min_raise_size.max(ante);
        min_raise_size = min_raise_size.min(max_raise_size);

        if min_raise_size == 0.0 {
            return Vec::new();
        }
        if min_raise_size == max_raise_size {
            let mut out = [opponent_bet; 2];
            out[current_player] = opponent_bet + min_raise_size;
            return vec![out];
        }

        let pot = opponent_bet * 2.0;
        let mut out = Vec::with_capacity(self.pot_fractions.len() + 1);
        for &frac in &self.pot_fractions {
            let raise_size = pot * frac;
            if raise_size >= min_raise_size && raise_size < max_raise_size {
                let mut bet = [opponent_bet; 2];
                bet[current_player] = opponent_bet + raise_size;
                out.push(bet);
            }
        }
        // All-in is always a legal raise, even if it duplicates a fraction above.
        let mut allin = [opponent_bet; 2];
        allin[current_player] = opponent_bet + max_raise_size;
        out.push(allin);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_raise_when_already_allin() {
        let bs = BetSizing::new(vec![1.0]);
        let state = BetState { bets: [1200.0, 1200.0], current_player: 0 };
        assert!(bs.possible_bets(&state, 100.0, 1200.0).is_empty());
    }

    #[test]
    fn single_allin_when_min_equals_max() {
        let bs = BetSizing::new(vec![1.0]);
        // opponent bet is already close to the stack, only all-in fits.
        let state = BetState { bets: [1100.0, 1190.0], current_player: 0 };
        let bets = bs.possible_bets(&state, 100.0, 1200.0);
        assert_eq!(bets.len(), 1);
        assert_eq!(bets[0][0], 1200.0);
    }

    #[test]
    fn pot_sized_raise_plus_allin() {
        let bs = BetSizing::new(vec![1.0]);
        let state = BetState { bets: [0.0, 100.0], current_player: 0 };
        let bets = bs.possible_bets(&state, 100.0, 1200.0);
        // pot-size raise of 200 (pot = 200) plus the all-in to 1200.
        assert_eq!(bets.len(), 2);
        assert_eq!(bets[0][0], 300.0);
        assert_eq!(bets[1][0], 1200.0);
    }

    #[test]
    fn min_raise_floored_at_ante() {
        let bs = BetSizing::new(vec![]);
        let state = BetState { bets: [0.0, 0.0], current_player: 0 };
        let bets = bs.possible_bets(&state, 100.0, 1200.0);
        // no pot fractions configured: only the all-in option remains.
        assert_eq!(bets.len(), 1);
        assert_eq!(bets[0][0], 1200.0);
    }
}
