use thiserror::Error;

pub type Result<T> = std::result::Result<T, SchedulerError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// A rating outside the four known grades. Guessing would corrupt the
    /// memory model, so this is the one input the scheduler rejects.
    #[error("invalid rating: {0}")]
    InvalidRating(String),
    #[error("config error: {0}")]
    Config(String),
}

impl SchedulerError {
    pub fn invalid_rating(value: impl std::fmt::Display) -> Self {
        Self::InvalidRating(value.to_string())
    }
}
