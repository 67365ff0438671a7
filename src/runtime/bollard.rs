// ABOUTME: Bollard-based implementation of the engine capability traits.
// ABOUTME: Talks to Docker or Podman through the Docker-compatible API.

use crate::config::AgeFilter;
use crate::runtime::RuntimeError;
use crate::runtime::traits::{
    BuildCacheEntry, BuildCacheOps, BuildCachePruneReport, Container, ContainerOps,
    ContainerState, DiskUsage, Image, ImageDeletion, ImageOps, ImagePruneReport, Mount,
    MountKind, Network, NetworkOps, NetworkPruneReport, SystemOps, UsageTally, Volume,
    VolumeOps, VolumePruneReport,
};
use crate::runtime::types::RuntimeEndpoint;
use crate::types::{BuildCacheId, ContainerId, ImageId, NetworkId};
use async_trait::async_trait;
use bollard::Docker;
use bollard::models::{BuildCache, ImageSummary, MountPointTypeEnum, SystemDataUsageResponse};
use bollard::query_parameters::{
    DataUsageOptions, DataUsageOptionsBuilder, InspectContainerOptions, ListContainersOptions,
    ListImagesOptions, ListNetworksOptions, ListVolumesOptions, PruneBuildOptionsBuilder,
    PruneImagesOptions, PruneNetworksOptions, PruneVolumesOptions, RemoveContainerOptions,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Seconds before a single API request is abandoned.
const REQUEST_TIMEOUT_SECS: u64 = 120;

type Filters = HashMap<String, Vec<String>>;

// =============================================================================
// Error Mapping
// =============================================================================

fn map_engine_error(e: bollard::errors::Error, context: &str) -> RuntimeError {
    use bollard::errors::Error;

    match &e {
        Error::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 404 => RuntimeError::NotFound(format!("{context}: {message}")),
        Error::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 409 => RuntimeError::InUse(format!("{context}: {message}")),
        Error::DockerResponseServerError { message, .. } => {
            RuntimeError::RequestFailed(format!("{context}: {message}"))
        }
        Error::IOError { .. }
        | Error::HyperResponseError { .. }
        | Error::RequestTimeoutError
        | Error::SocketNotFoundError(_) => {
            RuntimeError::Unavailable(format!("{context}: {e}"))
        }
        _ => RuntimeError::RequestFailed(format!("{context}: {e}")),
    }
}

fn filter(key: &str, values: &[&str]) -> Filters {
    let mut filters = Filters::new();
    filters.insert(
        key.to_string(),
        values.iter().map(|v| v.to_string()).collect(),
    );
    filters
}

/// Engine sizes are signed and use -1 for "not computed".
fn byte_count(size: Option<i64>) -> u64 {
    size.and_then(|s| u64::try_from(s).ok()).unwrap_or(0)
}

// =============================================================================
// Conversions
// =============================================================================

fn container_from_summary(summary: bollard::models::ContainerSummary) -> Container {
    let names = summary
        .names
        .unwrap_or_default()
        .into_iter()
        .map(|n| n.trim_start_matches('/').to_string())
        .collect();

    let state = summary
        .state
        .map(|s| ContainerState::from_engine(&s.to_string()))
        .unwrap_or(ContainerState::Unknown);

    Container {
        id: ContainerId::new(summary.id.unwrap_or_default()),
        names,
        image_id: ImageId::new(summary.image_id.unwrap_or_default()),
        state,
    }
}

fn image_from_summary(summary: ImageSummary) -> Image {
    Image {
        id: ImageId::new(summary.id),
        repo_tags: summary
            .repo_tags
            .into_iter()
            .filter(|tag| tag != crate::runtime::UNTAGGED_IMAGE)
            .collect(),
        created: DateTime::from_timestamp(summary.created, 0).unwrap_or_default(),
        size: byte_count(Some(summary.size)),
    }
}

fn build_cache_from_record(record: BuildCache) -> BuildCacheEntry {
    BuildCacheEntry {
        id: BuildCacheId::new(record.id.unwrap_or_default()),
        description: record.description.unwrap_or_default(),
        in_use: record.in_use.unwrap_or(false),
        size: byte_count(record.size),
        created_at: record.created_at,
        last_used_at: record.last_used_at,
    }
}

fn tally(total_count: Option<i64>, total_size: Option<i64>) -> UsageTally {
    UsageTally {
        count: total_count
            .and_then(|c| usize::try_from(c).ok())
            .unwrap_or(0),
        size: byte_count(total_size),
    }
}

fn disk_usage_from_response(usage: SystemDataUsageResponse) -> DiskUsage {
    DiskUsage {
        containers: usage
            .containers_disk_usage
            .map(|u| tally(u.total_count, u.total_size))
            .unwrap_or_default(),
        images: usage
            .images_disk_usage
            .map(|u| tally(u.total_count, u.total_size))
            .unwrap_or_default(),
        volumes: usage
            .volumes_disk_usage
            .map(|u| tally(u.total_count, u.total_size))
            .unwrap_or_default(),
        build_cache: usage
            .build_cache_disk_usage
            .map(|u| tally(u.total_count, u.total_size))
            .unwrap_or_default(),
    }
}

/// Build cache items arrive as untyped JSON in the verbose disk usage report.
fn build_cache_from_response(
    usage: SystemDataUsageResponse,
) -> Result<Vec<BuildCacheEntry>, RuntimeError> {
    usage
        .build_cache_disk_usage
        .and_then(|u| u.items)
        .unwrap_or_default()
        .into_iter()
        .map(|item| {
            serde_json::from_value::<BuildCache>(item)
                .map(build_cache_from_record)
                .map_err(|e| RuntimeError::RequestFailed(format!("list build cache: {e}")))
        })
        .collect()
}

fn image_prune_report(response: bollard::models::ImagePruneResponse) -> ImagePruneReport {
    ImagePruneReport {
        images_deleted: response
            .images_deleted
            .unwrap_or_default()
            .into_iter()
            .map(|item| ImageDeletion {
                untagged: item.untagged.filter(|s| !s.is_empty()),
                deleted: item.deleted.filter(|s| !s.is_empty()),
            })
            .collect(),
        space_reclaimed: byte_count(response.space_reclaimed),
    }
}

// =============================================================================
// BollardRuntime
// =============================================================================

/// Engine gateway backed by bollard.
///
/// One client is created per process; dropping the runtime closes it.
pub struct BollardRuntime {
    client: Docker,
    endpoint: RuntimeEndpoint,
}

impl std::fmt::Debug for BollardRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BollardRuntime")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl BollardRuntime {
    /// Create a new BollardRuntime from a Docker client.
    pub fn new(client: Docker, endpoint: RuntimeEndpoint) -> Self {
        Self { client, endpoint }
    }

    /// Build a client for the resolved endpoint.
    ///
    /// No request is sent; call [`SystemOps::ping`] to verify the engine answers.
    pub fn connect(endpoint: RuntimeEndpoint) -> Result<Self, RuntimeError> {
        let client = match &endpoint {
            RuntimeEndpoint::Environment { .. } => Docker::connect_with_defaults(),
            RuntimeEndpoint::LocalSocket { socket_path, .. } => Docker::connect_with_unix(
                socket_path,
                REQUEST_TIMEOUT_SECS,
                bollard::API_DEFAULT_VERSION,
            ),
        }
        .map_err(|e| RuntimeError::Unavailable(format!("{endpoint}: {e}")))?;

        tracing::debug!(%endpoint, "created engine client");
        Ok(Self::new(client, endpoint))
    }

    async fn list_containers_filtered(
        &self,
        filters: Filters,
        context: &str,
    ) -> Result<Vec<Container>, RuntimeError> {
        let opts = ListContainersOptions {
            all: true,
            filters: Some(filters),
            ..Default::default()
        };

        let containers = self
            .client
            .list_containers(Some(opts))
            .await
            .map_err(|e| map_engine_error(e, context))?;

        Ok(containers.into_iter().map(container_from_summary).collect())
    }

    async fn list_images_filtered(
        &self,
        filters: Filters,
        context: &str,
    ) -> Result<Vec<Image>, RuntimeError> {
        let opts = ListImagesOptions {
            all: false,
            filters: Some(filters),
            ..Default::default()
        };

        let images = self
            .client
            .list_images(Some(opts))
            .await
            .map_err(|e| map_engine_error(e, context))?;

        Ok(images.into_iter().map(image_from_summary).collect())
    }

    async fn prune_images_filtered(
        &self,
        filters: Filters,
        context: &str,
    ) -> Result<ImagePruneReport, RuntimeError> {
        tracing::debug!(?filters, "pruning images");
        let opts = PruneImagesOptions {
            filters: Some(filters),
            ..Default::default()
        };

        let response = self
            .client
            .prune_images(Some(opts))
            .await
            .map_err(|e| map_engine_error(e, context))?;

        Ok(image_prune_report(response))
    }

    async fn inspect(
        &self,
        id: &ContainerId,
    ) -> Result<bollard::models::ContainerInspectResponse, RuntimeError> {
        self.client
            .inspect_container(id.as_str(), None::<InspectContainerOptions>)
            .await
            .map_err(|e| map_engine_error(e, &format!("inspect container {}", id.short())))
    }
}

#[async_trait]
impl SystemOps for BollardRuntime {
    async fn ping(&self) -> Result<(), RuntimeError> {
        self.client
            .ping()
            .await
            .map_err(|e| map_engine_error(e, "ping"))?;
        Ok(())
    }

    async fn disk_usage(&self) -> Result<DiskUsage, RuntimeError> {
        let usage = self
            .client
            .df(None::<DataUsageOptions>)
            .await
            .map_err(|e| map_engine_error(e, "disk usage"))?;

        Ok(disk_usage_from_response(usage))
    }
}

#[async_trait]
impl ContainerOps for BollardRuntime {
    async fn list_stopped_containers(&self) -> Result<Vec<Container>, RuntimeError> {
        let states: Vec<&str> = ContainerState::STOPPED
            .iter()
            .map(|s| s.as_str())
            .collect();
        self.list_containers_filtered(filter("status", &states), "list stopped containers")
            .await
    }

    async fn list_all_containers(&self) -> Result<Vec<Container>, RuntimeError> {
        self.list_containers_filtered(Filters::new(), "list containers")
            .await
    }

    async fn remove_container(&self, id: &ContainerId) -> Result<(), RuntimeError> {
        tracing::debug!(container = %id, "removing container");
        let opts = RemoveContainerOptions {
            force: false,
            v: false,
            ..Default::default()
        };

        self.client
            .remove_container(id.as_str(), Some(opts))
            .await
            .map_err(|e| map_engine_error(e, &format!("remove container {}", id.short())))
    }

    async fn inspect_container_mounts(
        &self,
        id: &ContainerId,
    ) -> Result<Vec<Mount>, RuntimeError> {
        let details = self.inspect(id).await?;

        Ok(details
            .mounts
            .unwrap_or_default()
            .into_iter()
            .map(|m| Mount {
                kind: match m.typ {
                    Some(MountPointTypeEnum::VOLUME) => MountKind::Volume,
                    Some(MountPointTypeEnum::BIND) => MountKind::Bind,
                    Some(MountPointTypeEnum::TMPFS) => MountKind::Tmpfs,
                    _ => MountKind::Other,
                },
                name: m.name.filter(|n| !n.is_empty()),
            })
            .collect())
    }

    async fn inspect_container_networks(
        &self,
        id: &ContainerId,
    ) -> Result<Vec<String>, RuntimeError> {
        let details = self.inspect(id).await?;

        let mut names: Vec<String> = details
            .network_settings
            .and_then(|settings| settings.networks)
            .map(|networks| networks.into_keys().collect())
            .unwrap_or_default();
        names.sort();
        Ok(names)
    }
}

#[async_trait]
impl ImageOps for BollardRuntime {
    async fn list_all_images(&self) -> Result<Vec<Image>, RuntimeError> {
        self.list_images_filtered(Filters::new(), "list images")
            .await
    }

    async fn list_dangling_images(&self) -> Result<Vec<Image>, RuntimeError> {
        self.list_images_filtered(filter("dangling", &["true"]), "list dangling images")
            .await
    }

    async fn prune_images(&self, older_than: AgeFilter) -> Result<ImagePruneReport, RuntimeError> {
        // dangling=false widens the prune from untagged images to every unused one
        let mut filters = filter("dangling", &["false"]);
        if let Some(until) = older_than.until_filter(Utc::now()) {
            filters.insert("until".to_string(), vec![until]);
        }
        self.prune_images_filtered(filters, "prune images").await
    }

    async fn prune_dangling_images(&self) -> Result<ImagePruneReport, RuntimeError> {
        self.prune_images_filtered(filter("dangling", &["true"]), "prune dangling images")
            .await
    }
}

#[async_trait]
impl VolumeOps for BollardRuntime {
    async fn list_volumes(&self) -> Result<Vec<Volume>, RuntimeError> {
        let response = self
            .client
            .list_volumes(None::<ListVolumesOptions>)
            .await
            .map_err(|e| map_engine_error(e, "list volumes"))?;

        Ok(response
            .volumes
            .unwrap_or_default()
            .into_iter()
            .map(|v| Volume {
                name: v.name,
                size: v
                    .usage_data
                    .and_then(|d| u64::try_from(d.size).ok()),
            })
            .collect())
    }

    async fn prune_volumes(&self) -> Result<VolumePruneReport, RuntimeError> {
        // Since API 1.42 prune only touches anonymous volumes unless all=true
        let opts = PruneVolumesOptions {
            filters: Some(filter("all", &["true"])),
            ..Default::default()
        };

        let response = self
            .client
            .prune_volumes(Some(opts))
            .await
            .map_err(|e| map_engine_error(e, "prune volumes"))?;

        Ok(VolumePruneReport {
            volumes_deleted: response.volumes_deleted.unwrap_or_default(),
            space_reclaimed: byte_count(response.space_reclaimed),
        })
    }
}

#[async_trait]
impl NetworkOps for BollardRuntime {
    async fn list_networks(&self) -> Result<Vec<Network>, RuntimeError> {
        let networks = self
            .client
            .list_networks(None::<ListNetworksOptions>)
            .await
            .map_err(|e| map_engine_error(e, "list networks"))?;

        Ok(networks
            .into_iter()
            .map(|n| Network {
                id: NetworkId::new(n.id.unwrap_or_default()),
                name: n.name.unwrap_or_default(),
            })
            .collect())
    }

    async fn prune_networks(&self) -> Result<NetworkPruneReport, RuntimeError> {
        let response = self
            .client
            .prune_networks(None::<PruneNetworksOptions>)
            .await
            .map_err(|e| map_engine_error(e, "prune networks"))?;

        Ok(NetworkPruneReport {
            networks_deleted: response.networks_deleted.unwrap_or_default(),
        })
    }
}

#[async_trait]
impl BuildCacheOps for BollardRuntime {
    async fn list_build_cache(&self) -> Result<Vec<BuildCacheEntry>, RuntimeError> {
        // Per-record detail is only returned for verbose requests
        let opts = DataUsageOptionsBuilder::new()
            ._type(vec!["build-cache".to_string()])
            .verbose(true)
            .build();

        let usage = self
            .client
            .df(Some(opts))
            .await
            .map_err(|e| map_engine_error(e, "list build cache"))?;

        build_cache_from_response(usage)
    }

    async fn prune_build_cache(
        &self,
        older_than: AgeFilter,
    ) -> Result<BuildCachePruneReport, RuntimeError> {
        let mut filters = Filters::new();
        if let Some(until) = older_than.until_filter(Utc::now()) {
            filters.insert("until".to_string(), vec![until]);
        }
        tracing::debug!(?filters, "pruning build cache");

        let opts = PruneBuildOptionsBuilder::default()
            .all(true)
            .filters(&filters)
            .build();

        let response = self
            .client
            .prune_build(Some(opts))
            .await
            .map_err(|e| map_engine_error(e, "prune build cache"))?;

        Ok(BuildCachePruneReport {
            caches_deleted: response.caches_deleted.unwrap_or_default(),
            space_reclaimed: byte_count(response.space_reclaimed),
        })
    }
}
