// ABOUTME: Volume operations trait for container runtimes.
// ABOUTME: List and prune volumes.

use super::shared_types::{Volume, VolumePruneReport};
use crate::runtime::RuntimeError;
use async_trait::async_trait;

#[async_trait]
pub trait VolumeOps: Send + Sync {
    async fn list_volumes(&self) -> Result<Vec<Volume>, RuntimeError>;

    /// Remove every volume, named or anonymous, that no container mounts.
    async fn prune_volumes(&self) -> Result<VolumePruneReport, RuntimeError>;
}
