//! Process-wide game parameters, collected into one value passed by
//! reference into every builder (no singletons beyond this).

use crate::error::{CoreError, CoreResult};

/// Parameters of the game and the re-solve schedule.
///
/// Constructed once via [`GameParams::new`], which validates the
/// cross-field preconditions that the rest of the crate assumes hold.
#[derive(Debug, Clone, PartialEq)]
pub struct GameParams {
    pub ante: f64,
    pub stack: f64,
    pub rank_count: u8,
    pub suit_count: u8,
    pub board_card_count: u8,
    pub streets_count: u8,
    /// Pot fractions allowed as raises, ascending, e.g. `[1.0]` for pot-only.
    pub bet_sizing: Vec<f64>,
    pub cfr_iters: usize,
    pub cfr_skip_iters: usize,
}

impl GameParams {
    pub fn new(
        ante: f64,
        stack: f64,
        rank_count: u8,
        suit_count: u8,
        board_card_count: u8,
        streets_count: u8,
        bet_sizing: Vec<f64>,
        cfr_iters: usize,
        cfr_skip_iters: usize,
    ) -> CoreResult<Self> {
        if cfr_skip_iters >= cfr_iters {
            return Err(CoreError::InvalidIterationSchedule(cfr_skip_iters, cfr_iters));
        }
        if board_card_count > 2 {
            return Err(CoreError::InvalidBoard(format!(
                "board_card_count {} unsupported (only 0..=2)",
                board_card_count
            )));
        }
        Ok(GameParams {
            ante,
            stack,
            rank_count,
            suit_count,
            board_card_count,
            streets_count,
            bet_sizing,
            cfr_iters,
            cfr_skip_iters,
        })
    }

    /// Simplest textbook Leduc: 3 ranks, 2 suits, one board card, pot-only bets.
    pub fn leduc_default() -> Self {
        GameParams::new(100.0, 1200.0, 3, 2, 1, 2, vec![1.0], 1000, 500)
            .expect("built-in default parameters are always valid")
    }

    #[inline]
    pub fn card_count(&self) -> usize {
        self.rank_count as usize * self.suit_count as usize
    }

    /// Number of distinct boards of `board_card_count` cards out of the deck.
    pub fn boards_count(&self) -> usize {
        let c = self.card_count();
        match self.board_card_count {
            0 => 1,
            1 => c,
            2 => c * (c - 1) / 2,
            n => unreachable!("board_card_count {} validated in new()", n),
        }
    }
}
