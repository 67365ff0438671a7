// ABOUTME: Scripted in-memory container engine for cleanup tests.
// ABOUTME: Mirrors the engine's prune rules and records every gateway call.

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use docker_tidy::config::AgeFilter;
use docker_tidy::runtime::{
    BuildCacheEntry, BuildCacheOps, BuildCachePruneReport, Container, ContainerOps,
    ContainerState, DiskUsage, Image, ImageDeletion, ImageOps, ImagePruneReport, Mount,
    MountKind, Network, NetworkOps, NetworkPruneReport, RuntimeError, SystemOps, UsageTally,
    Volume, VolumeOps, VolumePruneReport,
};
use docker_tidy::types::{BuildCacheId, ContainerId, ImageId, NetworkId, short_id};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};

const RESERVED: [&str; 3] = ["bridge", "host", "none"];

/// A container together with what inspecting it reveals.
#[derive(Debug, Clone)]
pub struct FakeContainer {
    pub container: Container,
    pub mounts: Vec<Mount>,
    pub networks: Vec<String>,
}

#[derive(Debug, Default)]
struct EngineState {
    containers: Vec<FakeContainer>,
    images: Vec<Image>,
    volumes: Vec<Volume>,
    networks: Vec<Network>,
    build_cache: Vec<BuildCacheEntry>,
    /// Short IDs or names of everything removed, in removal order.
    removed: Vec<String>,
}

#[derive(Debug, Default)]
struct Failures {
    ops: HashSet<&'static str>,
    removals: HashMap<String, fn(String) -> RuntimeError>,
    vanished: HashSet<String>,
}

#[derive(Debug, Default)]
pub struct FakeRuntime {
    state: Mutex<EngineState>,
    failures: Mutex<Failures>,
    calls: Mutex<Vec<String>>,
}

impl FakeRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_container(self, container: Container, mounts: Vec<Mount>, networks: &[&str]) -> Self {
        self.state.lock().containers.push(FakeContainer {
            container,
            mounts,
            networks: networks.iter().map(|n| n.to_string()).collect(),
        });
        self
    }

    pub fn with_image(self, image: Image) -> Self {
        self.state.lock().images.push(image);
        self
    }

    pub fn with_volume(self, volume: Volume) -> Self {
        self.state.lock().volumes.push(volume);
        self
    }

    pub fn with_network(self, network: Network) -> Self {
        self.state.lock().networks.push(network);
        self
    }

    pub fn with_build_cache(self, entry: BuildCacheEntry) -> Self {
        self.state.lock().build_cache.push(entry);
        self
    }

    /// Make every call of the named gateway operation fail.
    pub fn failing(self, op: &'static str) -> Self {
        self.failures.lock().ops.insert(op);
        self
    }

    /// Make removing the container with this ID fail as a conflict.
    pub fn failing_removal(self, id: &str) -> Self {
        self.failing_removal_with(id, RuntimeError::InUse)
    }

    /// Make removing the container with this ID fail with the given error.
    pub fn failing_removal_with(self, id: &str, error: fn(String) -> RuntimeError) -> Self {
        self.failures.lock().removals.insert(id.to_string(), error);
        self
    }

    /// Report the container as gone when it is inspected.
    pub fn vanishing(self, id: &str) -> Self {
        self.failures.lock().vanished.insert(id.to_string());
        self
    }

    /// Names of the gateway operations called, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn calls_to(&self, op: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.as_str() == op || call.starts_with(&format!("{op}:")))
            .count()
    }

    /// Short IDs (or names for volumes and networks) of removed resources.
    pub fn removed(&self) -> Vec<String> {
        self.state.lock().removed.clone()
    }

    fn record(&self, call: String, op: &'static str) -> Result<(), RuntimeError> {
        self.calls.lock().push(call);
        if self.failures.lock().ops.contains(op) {
            return Err(RuntimeError::RequestFailed(format!("{op} rejected")));
        }
        Ok(())
    }

    fn call(&self, op: &'static str) -> Result<(), RuntimeError> {
        self.record(op.to_string(), op)
    }

    fn inspect(&self, id: &ContainerId, op: &'static str) -> Result<FakeContainer, RuntimeError> {
        self.record(format!("{op}:{id}"), op)?;
        if self.failures.lock().vanished.contains(id.as_str()) {
            return Err(RuntimeError::NotFound(format!("no such container: {id}")));
        }
        self.state
            .lock()
            .containers
            .iter()
            .find(|c| &c.container.id == id)
            .cloned()
            .ok_or_else(|| RuntimeError::NotFound(format!("no such container: {id}")))
    }
}

fn image_used(containers: &[FakeContainer], image: &Image) -> bool {
    containers.iter().any(|c| c.container.image_id == image.id)
}

fn prune_images_where(
    state: &mut EngineState,
    eligible: impl Fn(&Image) -> bool,
) -> ImagePruneReport {
    let (pruned, kept): (Vec<Image>, Vec<Image>) = std::mem::take(&mut state.images)
        .into_iter()
        .partition(|image| !image_used(&state.containers, image) && eligible(image));
    state.images = kept;

    let mut report = ImagePruneReport::default();
    for image in pruned {
        state.removed.push(image.id.short().to_string());
        report.space_reclaimed += image.size;
        for tag in &image.repo_tags {
            report.images_deleted.push(ImageDeletion {
                untagged: Some(tag.clone()),
                deleted: None,
            });
        }
        report.images_deleted.push(ImageDeletion {
            untagged: None,
            deleted: Some(image.id.into_inner()),
        });
    }
    report
}

#[async_trait]
impl SystemOps for FakeRuntime {
    async fn ping(&self) -> Result<(), RuntimeError> {
        self.call("ping")
    }

    async fn disk_usage(&self) -> Result<DiskUsage, RuntimeError> {
        self.call("disk_usage")?;
        let state = self.state.lock();
        Ok(DiskUsage {
            containers: UsageTally::from_sizes(state.containers.iter().map(|_| 0)),
            images: UsageTally::from_sizes(state.images.iter().map(|i| i.size)),
            volumes: UsageTally::from_sizes(state.volumes.iter().map(|v| v.size.unwrap_or(0))),
            build_cache: UsageTally::from_sizes(state.build_cache.iter().map(|b| b.size)),
        })
    }
}

#[async_trait]
impl ContainerOps for FakeRuntime {
    async fn list_stopped_containers(&self) -> Result<Vec<Container>, RuntimeError> {
        self.call("list_stopped_containers")?;
        Ok(self
            .state
            .lock()
            .containers
            .iter()
            .map(|c| c.container.clone())
            .filter(|c| c.state.is_stopped())
            .collect())
    }

    async fn list_all_containers(&self) -> Result<Vec<Container>, RuntimeError> {
        self.call("list_all_containers")?;
        Ok(self
            .state
            .lock()
            .containers
            .iter()
            .map(|c| c.container.clone())
            .collect())
    }

    async fn remove_container(&self, id: &ContainerId) -> Result<(), RuntimeError> {
        self.record(format!("remove_container:{id}"), "remove_container")?;
        let fault = self.failures.lock().removals.get(id.as_str()).copied();
        if let Some(error) = fault {
            return Err(error(format!("remove container {}", id.short())));
        }
        let mut state = self.state.lock();
        state.containers.retain(|c| &c.container.id != id);
        state.removed.push(id.short().to_string());
        Ok(())
    }

    async fn inspect_container_mounts(
        &self,
        id: &ContainerId,
    ) -> Result<Vec<Mount>, RuntimeError> {
        self.inspect(id, "inspect_container_mounts").map(|c| c.mounts)
    }

    async fn inspect_container_networks(
        &self,
        id: &ContainerId,
    ) -> Result<Vec<String>, RuntimeError> {
        self.inspect(id, "inspect_container_networks")
            .map(|c| c.networks)
    }
}

#[async_trait]
impl ImageOps for FakeRuntime {
    async fn list_all_images(&self) -> Result<Vec<Image>, RuntimeError> {
        self.call("list_all_images")?;
        Ok(self.state.lock().images.clone())
    }

    async fn list_dangling_images(&self) -> Result<Vec<Image>, RuntimeError> {
        self.call("list_dangling_images")?;
        Ok(self
            .state
            .lock()
            .images
            .iter()
            .filter(|image| image.repo_tags.is_empty())
            .cloned()
            .collect())
    }

    async fn prune_images(&self, older_than: AgeFilter) -> Result<ImagePruneReport, RuntimeError> {
        self.call("prune_images")?;
        let now = Utc::now();
        let mut state = self.state.lock();
        Ok(prune_images_where(&mut state, |image| {
            older_than.admits(image.created, now)
        }))
    }

    async fn prune_dangling_images(&self) -> Result<ImagePruneReport, RuntimeError> {
        self.call("prune_dangling_images")?;
        let mut state = self.state.lock();
        Ok(prune_images_where(&mut state, |image| {
            image.repo_tags.is_empty()
        }))
    }
}

#[async_trait]
impl VolumeOps for FakeRuntime {
    async fn list_volumes(&self) -> Result<Vec<Volume>, RuntimeError> {
        self.call("list_volumes")?;
        Ok(self.state.lock().volumes.clone())
    }

    async fn prune_volumes(&self) -> Result<VolumePruneReport, RuntimeError> {
        self.call("prune_volumes")?;
        let mut state = self.state.lock();
        let mounted: HashSet<String> = state
            .containers
            .iter()
            .flat_map(|c| c.mounts.iter())
            .filter_map(|m| m.volume_name())
            .map(str::to_string)
            .collect();

        let (pruned, kept): (Vec<Volume>, Vec<Volume>) = std::mem::take(&mut state.volumes)
            .into_iter()
            .partition(|volume| !mounted.contains(&volume.name));
        state.volumes = kept;

        let mut report = VolumePruneReport::default();
        for volume in pruned {
            state.removed.push(volume.name.clone());
            report.space_reclaimed += volume.size.unwrap_or(0);
            report.volumes_deleted.push(volume.name);
        }
        Ok(report)
    }
}

#[async_trait]
impl NetworkOps for FakeRuntime {
    async fn list_networks(&self) -> Result<Vec<Network>, RuntimeError> {
        self.call("list_networks")?;
        Ok(self.state.lock().networks.clone())
    }

    async fn prune_networks(&self) -> Result<NetworkPruneReport, RuntimeError> {
        self.call("prune_networks")?;
        let mut state = self.state.lock();
        let attached: HashSet<String> = state
            .containers
            .iter()
            .flat_map(|c| c.networks.iter().cloned())
            .collect();

        let (pruned, kept): (Vec<Network>, Vec<Network>) = std::mem::take(&mut state.networks)
            .into_iter()
            .partition(|network| {
                !RESERVED.contains(&network.name.as_str()) && !attached.contains(&network.name)
            });
        state.networks = kept;

        let mut report = NetworkPruneReport::default();
        for network in pruned {
            state.removed.push(network.name.clone());
            report.networks_deleted.push(network.name);
        }
        Ok(report)
    }
}

#[async_trait]
impl BuildCacheOps for FakeRuntime {
    async fn list_build_cache(&self) -> Result<Vec<BuildCacheEntry>, RuntimeError> {
        self.call("list_build_cache")?;
        Ok(self.state.lock().build_cache.clone())
    }

    async fn prune_build_cache(
        &self,
        older_than: AgeFilter,
    ) -> Result<BuildCachePruneReport, RuntimeError> {
        self.call("prune_build_cache")?;
        let now = Utc::now();
        let mut state = self.state.lock();

        let (pruned, kept): (Vec<BuildCacheEntry>, Vec<BuildCacheEntry>) =
            std::mem::take(&mut state.build_cache)
                .into_iter()
                .partition(|entry| {
                    !entry.in_use
                        && match entry.last_activity() {
                            Some(at) => older_than.admits(at, now),
                            None => !older_than.is_enabled(),
                        }
                });
        state.build_cache = kept;

        let mut report = BuildCachePruneReport::default();
        for entry in pruned {
            state.removed.push(entry.id.short().to_string());
            report.space_reclaimed += entry.size;
            report.caches_deleted.push(entry.id.into_inner());
        }
        Ok(report)
    }
}

/// Pad a label into a full-length engine ID so `short()` keeps the label.
fn full_id(label: &str) -> String {
    format!("{label:0<64}")
}

pub fn days_ago(days: i64) -> DateTime<Utc> {
    Utc::now() - TimeDelta::days(days)
}

pub fn container(label: &str, name: &str, image: &str, state: ContainerState) -> Container {
    Container {
        id: ContainerId::new(full_id(label)),
        names: vec![name.to_string()],
        image_id: ImageId::new(format!("sha256:{}", full_id(image))),
        state,
    }
}

pub fn image(label: &str, tags: &[&str], age_days: i64) -> Image {
    Image {
        id: ImageId::new(format!("sha256:{}", full_id(label))),
        repo_tags: tags.iter().map(|t| t.to_string()).collect(),
        created: days_ago(age_days),
        size: 1024 * 1024,
    }
}

pub fn volume(name: &str) -> Volume {
    Volume {
        name: name.to_string(),
        size: None,
    }
}

pub fn volume_mount(name: &str) -> Mount {
    Mount {
        kind: MountKind::Volume,
        name: Some(name.to_string()),
    }
}

pub fn bind_mount() -> Mount {
    Mount {
        kind: MountKind::Bind,
        name: None,
    }
}

pub fn network(label: &str, name: &str) -> Network {
    Network {
        id: NetworkId::new(full_id(label)),
        name: name.to_string(),
    }
}

pub fn build_cache(label: &str, in_use: bool, idle_days: Option<i64>) -> BuildCacheEntry {
    BuildCacheEntry {
        id: BuildCacheId::new(full_id(label)),
        description: format!("mount / from exec {label}"),
        in_use,
        size: 2048,
        created_at: idle_days.map(|d| days_ago(d + 1)),
        last_used_at: idle_days.map(days_ago),
    }
}

/// The short form the reporter prints for a helper-built ID.
pub fn short(label: &str) -> String {
    short_id(&full_id(label)).to_string()
}
