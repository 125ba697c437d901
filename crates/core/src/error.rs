use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience alias for results produced by the domain layer.
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Shorthand for the "no promotion with this id" failure.
    pub fn promotion_not_found(id: DbId) -> Self {
        CoreError::NotFound {
            entity: "Promotion",
            id,
        }
    }
}
