//! Crate-wide error type
//!
//! Contract violations (`InvalidArgument`) are programmer errors reported at the
//! point of mutation. Resource failures are recovered by the caller where the
//! game allows it (a busy render target skips one frame) and are fatal where it
//! doesn't (a missing sprite sheet aborts startup).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// A value outside its documented range was passed to a mutator
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An image resource id the provider does not know
    #[error("resource not found: {0}")]
    ResourceNotFound(String),

    /// The render target could not be acquired this tick
    #[error("render target unavailable: {0}")]
    RenderTargetUnavailable(String),

    /// A single draw call failed
    #[error("draw failed: {0}")]
    Draw(String),

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("settings parse error: {0}")]
    Settings(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The loop thread did not observe cancellation in time and was abandoned
    #[error("game loop did not stop after {attempts} attempts")]
    ShutdownTimeout { attempts: u32 },

    #[error("game loop thread panicked")]
    LoopPanicked,
}

impl SimError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        SimError::InvalidArgument(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
