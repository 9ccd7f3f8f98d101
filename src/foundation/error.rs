/// Convenience result type used across layerforge.
pub type ForgeResult<T> = Result<T, ForgeError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Only [`ForgeError::Allocation`] aborts a render. Every other variant is absorbed at the
/// component boundary that detects it and reported through `tracing`.
#[derive(thiserror::Error, Debug)]
pub enum ForgeError {
    /// Invalid setup data that cannot be degraded to a default.
    #[error("validation error: {0}")]
    Validation(String),

    /// Unreadable font, image or other source file.
    #[error("resource error: {0}")]
    Resource(String),

    /// Failed external filter or combine call.
    #[error("filter error: {0}")]
    Filter(String),

    /// Pixel buffer allocation failure.
    #[error("allocation error: {0}")]
    Allocation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ForgeError {
    /// Build a [`ForgeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ForgeError::Resource`] value.
    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }

    /// Build a [`ForgeError::Filter`] value.
    pub fn filter(msg: impl Into<String>) -> Self {
        Self::Filter(msg.into())
    }

    /// Build a [`ForgeError::Allocation`] value.
    pub fn allocation(msg: impl Into<String>) -> Self {
        Self::Allocation(msg.into())
    }

    /// Build a [`ForgeError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether this error must abort the render instead of being absorbed locally.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Allocation(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
