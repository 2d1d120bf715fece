/// Convenience result type used across circuitwave.
pub type FxResult<T> = Result<T, FxError>;

/// Top-level error taxonomy used by engine, session and sink APIs.
///
/// The simulation itself never fails: empty graphs, zero-sized surfaces and dangling indices are
/// handled by degrading to no-ops. Errors only surface at configuration, lifecycle and IO
/// boundaries.
#[derive(thiserror::Error, Debug)]
pub enum FxError {
    /// Invalid user-provided configuration or scene data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Controller used outside its `Uninitialized -> Running -> TornDown` state machine.
    #[error("lifecycle error: {0}")]
    Lifecycle(String),

    /// Rasterization or compositing failure.
    #[error("render error: {0}")]
    Render(String),

    /// Frame sink / encoder failure.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FxError {
    /// Build a [`FxError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FxError::Lifecycle`] value.
    pub fn lifecycle(msg: impl Into<String>) -> Self {
        Self::Lifecycle(msg.into())
    }

    /// Build a [`FxError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`FxError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`FxError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
