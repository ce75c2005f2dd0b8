//! Error types
//!
//! Nothing here is fatal to the host page: every error is logged at the
//! boundary and the engine degrades to "no ambient animation".

use thiserror::Error;

use crate::platform::EventSource;

#[derive(Debug, Error)]
pub enum AmbientError {
    /// The 2D drawing context could not be acquired
    #[error("drawing context unavailable")]
    ContextUnavailable,

    /// The surface element is missing or not laid out
    #[error("surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// The surface has no drawable area yet
    #[error("surface has no area ({width}x{height})")]
    EmptySurface { width: f32, height: f32 },

    /// A 2D context call failed
    #[error("canvas operation failed: {0}")]
    CanvasOperation(String),

    /// The host refused a listener / animation-frame registration
    #[error("could not subscribe to {event:?}: {reason}")]
    ListenerRejected { event: EventSource, reason: String },

    #[error("invalid settings: {0}")]
    InvalidSettings(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AmbientError>;
