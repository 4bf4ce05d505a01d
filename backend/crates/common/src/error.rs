use thiserror::Error;

#[derive(Debug, Error)]
pub enum CadenceError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("source error: {0}")]
    Source(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type CadenceResult<T> = Result<T, CadenceError>;
