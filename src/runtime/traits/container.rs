// ABOUTME: Container operations trait for container runtimes.
// ABOUTME: List stopped or all containers, remove, and inspect mounts and networks.

use super::shared_types::{Container, Mount};
use crate::runtime::RuntimeError;
use crate::types::ContainerId;
use async_trait::async_trait;

/// Container queries and removal.
#[async_trait]
pub trait ContainerOps: Send + Sync {
    /// Containers in the `exited`, `created`, or `dead` state.
    async fn list_stopped_containers(&self) -> Result<Vec<Container>, RuntimeError>;

    /// Every container regardless of state.
    async fn list_all_containers(&self) -> Result<Vec<Container>, RuntimeError>;

    /// Remove a container without forcing and without removing its anonymous volumes.
    async fn remove_container(&self, id: &ContainerId) -> Result<(), RuntimeError>;

    /// Mount points of a container.
    async fn inspect_container_mounts(&self, id: &ContainerId)
    -> Result<Vec<Mount>, RuntimeError>;

    /// Names of the networks a container is attached to.
    async fn inspect_container_networks(
        &self,
        id: &ContainerId,
    ) -> Result<Vec<String>, RuntimeError>;
}
