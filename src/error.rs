use thiserror::Error;

pub type EngineResult<T> = core::result::Result<T, EngineError>;

/// Error taxonomy for engine operations.
///
/// `Conflict` exists for the duplicate-grant race; award paths swallow it as
/// "already granted" and it never escapes them. `Store` failures are
/// propagated untouched so the surrounding job layer can retry.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("{0} '{1}' not found")]
    NotFound(&'static str, String),

    #[error("duplicate grant of achievement '{0}'")]
    Conflict(String),

    #[error("not applicable: {0}")]
    NotApplicable(String),

    #[error(transparent)]
    Store(#[from] sqlx::Error),
}

impl EngineError {
    pub fn user_not_found(id: impl ToString) -> Self {
        EngineError::NotFound("user", id.to_string())
    }
}
