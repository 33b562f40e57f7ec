use std::fmt;

/// Failure reported by a [`super::GraphicsContext`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    /// The driver could not reserve memory for the request.
    OutOfMemory,
    /// The backend cannot express the request at all.
    Unsupported(&'static str),
    /// The request was rejected (bad size, nothing bound, unknown name).
    InvalidOperation(String),
}

impl fmt::Display for ContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory => write!(f, "graphics context out of memory"),
            Self::Unsupported(what) => write!(f, "unsupported by graphics context: {what}"),
            Self::InvalidOperation(msg) => write!(f, "invalid graphics operation: {msg}"),
        }
    }
}

impl std::error::Error for ContextError {}
