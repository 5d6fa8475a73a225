use thiserror::Error;

/// Failure of an advice or chat request.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The caller sent something unusable; maps to a client error.
    #[error("invalid request: {0}")]
    Validation(String),
    /// The generative API call failed or its reply could not be used.
    #[error("upstream generation failed: {0:#}")]
    Upstream(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
