// ABOUTME: Cleanup error types with SNAFU context selectors.
// ABOUTME: Wraps engine failures with the resource kind or item they concern.

use super::ResourceKind;
use crate::runtime::RuntimeError;
use snafu::Snafu;

/// A failed cleanup step, carrying what was being attempted.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CleanupError {
    #[snafu(display("error retrieving {kind}: {source}"))]
    Query {
        kind: ResourceKind,
        source: RuntimeError,
    },

    #[snafu(display("error inspecting container {container}: {source}"))]
    Inspect {
        container: String,
        source: RuntimeError,
    },

    #[snafu(display("error removing container {container}: {source}"))]
    Removal {
        container: String,
        source: RuntimeError,
    },

    #[snafu(display("error removing {kind}: {source}"))]
    Prune {
        kind: ResourceKind,
        source: RuntimeError,
    },

    #[snafu(display("failed to get disk usage: {source}"))]
    DiskUsage { source: RuntimeError },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CleanupErrorKind {
    /// Listing or inspecting resources failed; the step was abandoned.
    QueryFailure,
    /// A single container could not be removed; the step went on.
    RemovalFailure,
    /// The prune call failed.
    PruneFailure,
    /// The informational disk usage snapshot failed.
    DiskUsageFailure,
}

impl CleanupErrorKind {
    /// Whether an error of this kind ends the step it happened in.
    pub fn aborts_step(self) -> bool {
        matches!(
            self,
            CleanupErrorKind::QueryFailure | CleanupErrorKind::PruneFailure
        )
    }
}

impl CleanupError {
    pub fn kind(&self) -> CleanupErrorKind {
        match self {
            CleanupError::Query { .. } | CleanupError::Inspect { .. } => {
                CleanupErrorKind::QueryFailure
            }
            CleanupError::Removal { .. } => CleanupErrorKind::RemovalFailure,
            CleanupError::Prune { .. } => CleanupErrorKind::PruneFailure,
            CleanupError::DiskUsage { .. } => CleanupErrorKind::DiskUsageFailure,
        }
    }
}
