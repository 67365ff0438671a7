// ABOUTME: Network operations trait for container runtimes.
// ABOUTME: List and prune networks.

use super::shared_types::{Network, NetworkPruneReport};
use crate::runtime::RuntimeError;
use async_trait::async_trait;

#[async_trait]
pub trait NetworkOps: Send + Sync {
    async fn list_networks(&self) -> Result<Vec<Network>, RuntimeError>;

    /// Remove networks with no attached container. Predefined networks are never removed.
    async fn prune_networks(&self) -> Result<NetworkPruneReport, RuntimeError>;
}
