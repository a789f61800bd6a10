use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("duplicate entity: {0}")]
    Duplicate(String),
    #[error("invalid transition: {0}")]
    InvalidTransition(String),
    #[error("transition rejected: {0}")]
    TransitionRejected(String),
    #[error("dependency unavailable: {0}")]
    Unavailable(String),
    #[error("platform error: {0}")]
    Platform(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    /// Human-readable message without the variant prefix.
    pub fn message(&self) -> String {
        match self {
            ServiceError::Validation(m)
            | ServiceError::NotFound(m)
            | ServiceError::Duplicate(m)
            | ServiceError::InvalidTransition(m)
            | ServiceError::TransitionRejected(m)
            | ServiceError::Unavailable(m)
            | ServiceError::Platform(m) => m.clone(),
            ServiceError::Model(e) => e.to_string(),
        }
    }
}
