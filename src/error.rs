use thiserror::Error;

/// Precondition violations, numerical boundary errors, and oracle failures.
///
/// `HandOutOfRange`, `RangeNotNormalized`, `InvalidIterationSchedule`,
/// `ShapeMismatch`, and `InvalidBoard` are bugs: fail fast, no recovery.
/// `OracleFailure` is the one variant callers are expected to handle, since
/// the value oracle is an external call that can legitimately fail.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("hand {0} out of range for card_count {1}")]
    HandOutOfRange(u8, u8),

    #[error("range does not sum to 1 (got {0})")]
    RangeNotNormalized(f64),

    #[error("cfr_skip_iters ({0}) must be < cfr_iters ({1})")]
    InvalidIterationSchedule(usize, usize),

    #[error("tensor shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    #[error("invalid board: {0}")]
    InvalidBoard(String),

    #[error("value oracle call failed: {0}")]
    OracleFailure(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] bincode::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;
