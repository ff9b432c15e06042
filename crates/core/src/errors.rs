use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// A precondition on current slot or shift state does not hold.
    #[error("Consistency violation: {0}")]
    Consistency(String),

    /// Another transaction changed the slots this one relied on. Retryable.
    #[error("Concurrent modification: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl ScheduleError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, ScheduleError::Conflict(_))
    }
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
