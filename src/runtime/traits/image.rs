// ABOUTME: Image operations trait for container runtimes.
// ABOUTME: List all or dangling images and prune them.

use super::shared_types::{Image, ImagePruneReport};
use crate::config::AgeFilter;
use crate::runtime::RuntimeError;
use async_trait::async_trait;

/// Image listing and pruning.
#[async_trait]
pub trait ImageOps: Send + Sync {
    /// All top-level images.
    async fn list_all_images(&self) -> Result<Vec<Image>, RuntimeError>;

    /// Images without any repository tag.
    async fn list_dangling_images(&self) -> Result<Vec<Image>, RuntimeError>;

    /// Remove every image no container uses, honouring the age threshold.
    async fn prune_images(&self, older_than: AgeFilter) -> Result<ImagePruneReport, RuntimeError>;

    /// Remove dangling images no container uses.
    async fn prune_dangling_images(&self) -> Result<ImagePruneReport, RuntimeError>;
}
