// ABOUTME: Build cache operations trait for container runtimes.
// ABOUTME: List build cache records and prune them.

use super::shared_types::{BuildCacheEntry, BuildCachePruneReport};
use crate::config::AgeFilter;
use crate::runtime::RuntimeError;
use async_trait::async_trait;

#[async_trait]
pub trait BuildCacheOps: Send + Sync {
    /// Build cache records, taken from the engine's disk usage report.
    async fn list_build_cache(&self) -> Result<Vec<BuildCacheEntry>, RuntimeError>;

    /// Remove all build cache not in use, honouring the age threshold.
    async fn prune_build_cache(
        &self,
        older_than: AgeFilter,
    ) -> Result<BuildCachePruneReport, RuntimeError>;
}
