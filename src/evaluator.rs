//! Hand strength for a Leduc-family hand: a hole card plus 0 or 1 board
//! card. Lower strength wins; invalid (colliding) hands are blocked.

use crate::cards::{hand_is_possible, rank_of, Card};
use crate::config::GameParams;

/// Value used for a hand that collides with the board or itself.
pub const IMPOSSIBLE_HAND_VALUE: i32 = -1;

/// Strength of a single hole card with no board: rank only, reversed so a
/// higher rank gets a lower (stronger) value.
fn evaluate_no_board(hole: Card, params: &GameParams) -> i32 {
    let r = rank_of(hole, params) as i32;
    params.rank_count as i32 - 1 - r
}

/// Strength of (hole, board) on a one-card board: a pair beats any high
/// card, and a pair's strength is its rank (so lower rank value = stronger,
/// matching the "lower wins" convention restated per pair). Non-pairs are
/// ordered by `(high_rank + 1) * rank_count + low_rank`.
fn evaluate_one_card_board(hole: Card, board: Card, params: &GameParams) -> i32 {
    let r = params.rank_count as i32;
    let rh = rank_of(hole, params) as i32;
    let rb = rank_of(board, params) as i32;
    if rh == rb {
        rh
    } else {
        let (hi, lo) = if rh > rb { (rh, rb) } else { (rb, rh) };
        (hi + 1) * r + lo
    }
}

/// Strength of `hole` given `board` (0 or 1 cards). Returns
/// [`IMPOSSIBLE_HAND_VALUE`] if `hole` collides with the board.
pub fn evaluate(hole: Card, board: &[Card], params: &GameParams) -> i32 {
    let mut whole = board.to_vec();
    whole.push(hole);
    if !hand_is_possible(&whole, params) {
        return IMPOSSIBLE_HAND_VALUE;
    }
    match board.len() {
        0 => evaluate_no_board(hole, params),
        1 => evaluate_one_card_board(hole, board[0], params),
        n => panic!("evaluate: unsupported board length {} for strength", n),
    }
}

/// Strength of every private hand against `board`, in card order.
pub fn batch_eval(board: &[Card], params: &GameParams) -> Vec<i32> {
    (0..params.card_count() as Card)
        .map(|hole| evaluate(hole, board, params))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> GameParams {
        GameParams::leduc_default()
    }

    #[test]
    fn no_board_higher_rank_is_stronger() {
        let p = params();
        // rank_count=3, suit_count=2: cards 0,1 rank0; 2,3 rank1; 4,5 rank2.
        let s_low = evaluate_no_board(0, &p);
        let s_high = evaluate_no_board(4, &p);
        assert!(s_high < s_low, "higher rank should have lower (stronger) value");
    }

    #[test]
    fn pair_beats_high_card() {
        let p = params();
        // hole=2 (rank1), board=3 (rank1, same rank different suit) -> pair
        let pair = evaluate_one_card_board(2, 3, &p);
        // hole=4 (rank2), board=0 (rank0) -> high card
        let high = evaluate_one_card_board(4, 0, &p);
        assert!(pair < high, "a pair must be a lower (stronger) value than any high card");
    }

    #[test]
    fn collision_is_impossible() {
        let p = params();
        assert_eq!(evaluate(3, &[3], &p), IMPOSSIBLE_HAND_VALUE);
    }

    #[test]
    fn batch_eval_marks_board_card_impossible() {
        let p = params();
        let strengths = batch_eval(&[1], &p);
        assert_eq!(strengths[1], IMPOSSIBLE_HAND_VALUE);
        assert_eq!(strengths.len(), p.card_count());
    }

    #[test]
    fn pair_strength_follows_rank_directly() {
        let p = params();
        // A pair's value is its rank with no reversal, so a rank-0 pair
        // outranks a rank-2 pair under the "lower wins" convention.
        let rank0_pair = evaluate_one_card_board(0, 1, &p);
        let rank2_pair = evaluate_one_card_board(4, 5, &p);
        assert!(rank0_pair < rank2_pair);
        // Both still beat every non-pair.
        let high_card = evaluate_one_card_board(4, 0, &p);
        assert!(rank2_pair < high_card);
    }
}
