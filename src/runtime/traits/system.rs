// ABOUTME: Engine-wide operations for container runtimes.
// ABOUTME: Connectivity check and aggregate disk usage.

use super::shared_types::DiskUsage;
use crate::runtime::RuntimeError;
use async_trait::async_trait;

/// Engine-wide queries.
#[async_trait]
pub trait SystemOps: Send + Sync {
    /// Ping the engine to check connectivity.
    async fn ping(&self) -> Result<(), RuntimeError>;

    /// Counts and sizes of containers, images, volumes, and build cache.
    async fn disk_usage(&self) -> Result<DiskUsage, RuntimeError>;
}
