//! Assigns private hands to buckets on a given board.
//!
//! Every (board, private hand) pair gets its own bucket: `board_index *
//! card_count + hand`. Hands that collide with the board get bucket `-1`.

use crate::cards::{board_index, Card};
use crate::config::GameParams;

pub const IMPOSSIBLE_BUCKET: i64 = -1;

/// Total number of buckets across every board.
pub fn bucket_count(params: &GameParams) -> usize {
    params.card_count() * params.boards_count()
}

/// Maps each private hand to a bucket index on `board`, or [`IMPOSSIBLE_BUCKET`]
/// if the hand shares a card with the board.
pub fn compute_buckets(board: &[Card], params: &GameParams) -> Vec<i64> {
    let c = params.card_count();
    let shift = (board_index(board, params) * c) as i64;
    let mut buckets: Vec<i64> = (0..c as i64).map(|hand| hand + shift).collect();
    for &card in board {
        buckets[card as usize] = IMPOSSIBLE_BUCKET;
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> GameParams {
        GameParams::leduc_default()
    }

    #[test]
    fn bucket_count_is_cards_times_boards() {
        let p = params();
        assert_eq!(bucket_count(&p), p.card_count() * p.boards_count());
    }

    #[test]
    fn board_card_gets_impossible_bucket() {
        let p = params();
        let buckets = compute_buckets(&[2], &p);
        assert_eq!(buckets[2], IMPOSSIBLE_BUCKET);
    }

    #[test]
    fn buckets_are_shifted_by_board_index() {
        let p = params();
        let c = p.card_count();
        let buckets = compute_buckets(&[3], &p);
        let shift = board_index(&[3], &p) * c;
        for hand in 0..c {
            if hand != 3 {
                assert_eq!(buckets[hand] as usize, hand + shift);
            }
        }
    }

    #[test]
    fn different_boards_give_disjoint_bucket_ranges() {
        let p = params();
        let a = compute_buckets(&[0], &p);
        let b = compute_buckets(&[1], &p);
        for (&x, &y) in a.iter().zip(&b) {
            if x != IMPOSSIBLE_BUCKET && y != IMPOSSIBLE_BUCKET {
                assert_ne!(x, y);
            }
        }
    }
}
