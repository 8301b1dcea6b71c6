//! Converts range/value vectors between the per-card and per-bucket basis.
//!
//! `range_matrix` is a `card_count x bucket_count` 0/1 indicator of which
//! bucket each card falls into on the fixed board; `reverse_value_matrix`
//! is its transpose, used to expand bucket-level values back to cards.

use crate::bucketer::{bucket_count, compute_buckets, IMPOSSIBLE_BUCKET};
use crate::cards::Card;
use crate::config::GameParams;

pub struct BucketConversion {
    card_count: usize,
    bucket_count: usize,
    /// `card_count x bucket_count`, row-major: 1 where `card` maps to `bucket`.
    range_matrix: Vec<f64>,
}

impl BucketConversion {
    pub fn new(board: &[Card], params: &GameParams) -> Self {
        let card_count = params.card_count();
        let bucket_count = bucket_count(params);
        let buckets = compute_buckets(board, params);

        let mut range_matrix = vec![0.0; card_count * bucket_count];
        for (card, &bucket) in buckets.iter().enumerate() {
            if bucket != IMPOSSIBLE_BUCKET {
                range_matrix[card * bucket_count + bucket as usize] = 1.0;
            }
        }

        BucketConversion { card_count, bucket_count, range_matrix }
    }

    pub fn bucket_count(&self) -> usize {
        self.bucket_count
    }

    /// `bucket_range = card_range . range_matrix`.
    pub fn card_range_to_bucket_range(&self, card_range: &[f64], bucket_range: &mut [f64]) {
        assert_eq!(card_range.len(), self.card_count);
        assert_eq!(bucket_range.len(), self.bucket_count);
        for b in bucket_range.iter_mut() {
            *b = 0.0;
        }
        for (card, &p) in card_range.iter().enumerate() {
            if p == 0.0 {
                continue;
            }
            let row = &self.range_matrix[card * self.bucket_count..(card + 1) * self.bucket_count];
            for (bucket, &indicator) in row.iter().enumerate() {
                bucket_range[bucket] += p * indicator;
            }
        }
    }

    /// `card_value = bucket_value . range_matrix^T`: a bucket's value is
    /// broadcast to every card that maps into it.
    pub fn bucket_value_to_card_value(&self, bucket_value: &[f64], card_value: &mut [f64]) {
        assert_eq!(bucket_value.len(), self.bucket_count);
        assert_eq!(card_value.len(), self.card_count);
        for card in 0..self.card_count {
            let row = &self.range_matrix[card * self.bucket_count..(card + 1) * self.bucket_count];
            let mut acc = 0.0;
            for (bucket, &indicator) in row.iter().enumerate() {
                acc += bucket_value[bucket] * indicator;
            }
            card_value[card] = acc;
        }
    }

    /// `1` for every bucket reachable from at least one card on this board.
    pub fn possible_bucket_mask(&self) -> Vec<f64> {
        let mut mask = vec![0.0; self.bucket_count];
        for card in 0..self.card_count {
            let row = &self.range_matrix[card * self.bucket_count..(card + 1) * self.bucket_count];
            for (bucket, &indicator) in row.iter().enumerate() {
                if indicator != 0.0 {
                    mask[bucket] = 1.0;
                }
            }
        }
        mask
    }
}
