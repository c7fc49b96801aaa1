// 2.0: error taxonomy. every failure is surfaced to the immediate caller,
// the core never substitutes a default venue or score.

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SorError {
    #[error("Invalid venue: {reason}")]
    InvalidVenue { reason: String },

    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("No venue answered within {timeout_ms}ms ({venues} probed)")]
    Timeout { timeout_ms: u64, venues: usize },
}

pub type SorResult<T> = Result<T, SorError>;
