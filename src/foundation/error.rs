/// Result alias used throughout the crate.
pub type KaleidoResult<T> = Result<T, KaleidoError>;

/// Error type for scene setup, asset loading, rendering and encoding.
#[derive(thiserror::Error, Debug)]
pub enum KaleidoError {
    /// Invalid configuration or API misuse.
    #[error("validation error: {0}")]
    Validation(String),

    /// Missing, undecodable or malformed image data.
    #[error("asset error: {0}")]
    Asset(String),

    /// Compositor or surface failure.
    #[error("render error: {0}")]
    Render(String),

    /// Frame sink or encoder failure.
    #[error("encode error: {0}")]
    Encode(String),

    /// Anything else, typically I/O wrapped with context.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KaleidoError {
    /// Build a [`KaleidoError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`KaleidoError::Asset`].
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`KaleidoError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`KaleidoError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
