// ABOUTME: Application-wide error types for docker-tidy.
// ABOUTME: Uses thiserror for the startup failures that end the process.

use crate::runtime::{DetectionError, RuntimeError};
use thiserror::Error;

/// Failures before any cleanup step runs. All of them are fatal.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Detection(#[from] DetectionError),

    #[error("failed to connect to the container runtime: {0}")]
    Connection(#[from] RuntimeError),
}

pub type Result<T> = std::result::Result<T, Error>;
