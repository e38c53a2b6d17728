#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A bulk operation succeeded on one side and failed on the other.
    /// `completed` counts the records the successful side got through.
    #[error("Partial failure after {completed} completed: {message}")]
    PartialFailure { completed: usize, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}
