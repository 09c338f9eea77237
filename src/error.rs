pub type PaperdollResult<T> = Result<T, PaperdollError>;

#[derive(thiserror::Error, Debug)]
pub enum PaperdollError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("resolution error: {0}")]
    Resolution(String),

    #[error("override error: {0}")]
    Override(String),

    #[error("render error: {0}")]
    Render(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PaperdollError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn resolution(msg: impl Into<String>) -> Self {
        Self::Resolution(msg.into())
    }

    pub fn override_file(msg: impl Into<String>) -> Self {
        Self::Override(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Whether the failure was caused by the request rather than the
    /// catalog itself. Boundaries map these to 4xx-style outcomes and
    /// everything else to 5xx-style outcomes.
    pub fn is_client_fault(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::Validation(_) | Self::Resolution(_)
        )
    }
}
