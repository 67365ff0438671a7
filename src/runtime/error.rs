// ABOUTME: Error type shared by every engine operation.
// ABOUTME: Separates an unreachable engine from requests the engine rejected.

/// Failure of a single engine API call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    /// The engine could not be reached (socket, transport, timeout).
    #[error("container runtime unavailable: {0}")]
    Unavailable(String),

    /// The addressed resource does not exist (any more).
    #[error("not found: {0}")]
    NotFound(String),

    /// The resource is in use or in a conflicting state.
    #[error("conflict: {0}")]
    InUse(String),

    /// The engine answered with an error.
    #[error("request failed: {0}")]
    RequestFailed(String),
}

impl RuntimeError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RuntimeError::NotFound(_))
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, RuntimeError::Unavailable(_))
    }
}
