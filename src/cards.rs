//! Cards for a generic Leduc-family deck of `rank_count * suit_count` cards.
//!
//! A card is a flat index in `0..card_count`. Rank and suit are derived, not
//! stored — `rank = card / suit_count`, `suit = card % suit_count` — which
//! keeps buckets, board indices, and strength tables all working off the
//! same integer without a `Rank`/`Suit` enum pair to keep in lockstep.

use itertools::Itertools;

use crate::config::GameParams;
use crate::error::{CoreError, CoreResult};

pub type Card = u8;

#[inline]
pub fn rank_of(card: Card, params: &GameParams) -> u8 {
    card / params.suit_count
}

#[inline]
pub fn suit_of(card: Card, params: &GameParams) -> u8 {
    card % params.suit_count
}

pub fn check_card(card: Card, params: &GameParams) -> CoreResult<()> {
    if (card as usize) >= params.card_count() {
        Err(CoreError::HandOutOfRange(card, params.card_count() as u8))
    } else {
        Ok(())
    }
}

/// Whether a set of cards contains no repeats and all cards are valid.
pub fn hand_is_possible(cards: &[Card], params: &GameParams) -> bool {
    let c = params.card_count();
    if cards.iter().any(|&x| x as usize >= c) {
        return false;
    }
    let mut seen = vec![false; c];
    for &card in cards {
        if seen[card as usize] {
            return false;
        }
        seen[card as usize] = true;
    }
    true
}

/// All boards of `board_card_count` cards, in the canonical enumeration
/// order used to index boards (ascending card tuples).
pub fn enumerate_boards(params: &GameParams) -> Vec<Vec<Card>> {
    let c = params.card_count() as Card;
    match params.board_card_count {
        0 => vec![Vec::new()],
        1 => (0..c).map(|x| vec![x]).collect(),
        2 => (0..c).combinations(2).collect(),
        n => unreachable!("board_card_count {} validated in GameParams::new", n),
    }
}

/// A board's canonical index among `enumerate_boards`, used to index
/// per-board buckets and call matrices. Only valid for non-empty boards.
pub fn board_index(board: &[Card], params: &GameParams) -> usize {
    let c = params.card_count();
    match board.len() {
        1 => board[0] as usize,
        2 => {
            let (lo, hi) = if board[0] < board[1] {
                (board[0] as usize, board[1] as usize)
            } else {
                (board[1] as usize, board[0] as usize)
            };
            // Triangular-number offset for all pairs with first card < lo,
            // plus the position of hi within the row starting at lo + 1.
            let mut idx = 0usize;
            for a in 0..lo {
                idx += c - a - 1;
            }
            idx + (hi - lo - 1)
        }
        n => panic!("board_index: unsupported board length {}", n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> GameParams {
        GameParams::leduc_default()
    }

    #[test]
    fn rank_suit_roundtrip() {
        let p = params();
        for card in 0..p.card_count() as Card {
            let r = rank_of(card, &p);
            let s = suit_of(card, &p);
            assert_eq!(r * p.suit_count + s, card);
        }
    }

    #[test]
    fn hand_possible_rejects_repeats() {
        let p = params();
        assert!(hand_is_possible(&[0, 1], &p));
        assert!(!hand_is_possible(&[0, 0], &p));
        assert!(!hand_is_possible(&[0, p.card_count() as Card], &p));
    }

    #[test]
    fn enumerate_boards_one_card() {
        let p = params();
        let boards = enumerate_boards(&p);
        assert_eq!(boards.len(), p.card_count());
        assert_eq!(boards.len(), p.boards_count());
    }

    #[test]
    fn enumerate_boards_two_card_matches_count() {
        let p = GameParams::new(100.0, 1200.0, 3, 2, 2, 2, vec![1.0], 100, 50).unwrap();
        let boards = enumerate_boards(&p);
        assert_eq!(boards.len(), p.boards_count());
        for b in &boards {
            assert_eq!(b.len(), 2);
            assert!(b[0] < b[1]);
        }
    }

    #[test]
    fn board_index_is_bijective_two_card() {
        let p = GameParams::new(100.0, 1200.0, 3, 2, 2, 2, vec![1.0], 100, 50).unwrap();
        let boards = enumerate_boards(&p);
        for (expected_idx, b) in boards.iter().enumerate() {
            assert_eq!(board_index(b, &p), expected_idx);
        }
    }

    #[test]
    fn board_index_one_card_is_identity() {
        let p = params();
        for card in 0..p.card_count() as Card {
            assert_eq!(board_index(&[card], &p), card as usize);
        }
    }
}
