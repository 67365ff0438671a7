// ABOUTME: Engine resource types shared by the capability traits.
// ABOUTME: Containers, images, volumes, networks, build cache, prune reports, disk usage.

use crate::types::{BuildCacheId, ContainerId, ImageId, NetworkId};
use chrono::{DateTime, Utc};

/// Placeholder shown for images without any repository tag.
pub const UNTAGGED_IMAGE: &str = "<none>:<none>";

/// Lifecycle state reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerState {
    Created,
    Running,
    Paused,
    Restarting,
    Removing,
    Exited,
    Dead,
    Unknown,
}

impl ContainerState {
    /// States that count as "stopped" for cleanup.
    pub const STOPPED: [ContainerState; 3] = [
        ContainerState::Exited,
        ContainerState::Created,
        ContainerState::Dead,
    ];

    pub fn is_stopped(self) -> bool {
        Self::STOPPED.contains(&self)
    }

    /// Name used by the engine's `status` filter.
    pub fn as_str(self) -> &'static str {
        match self {
            ContainerState::Created => "created",
            ContainerState::Running => "running",
            ContainerState::Paused => "paused",
            ContainerState::Restarting => "restarting",
            ContainerState::Removing => "removing",
            ContainerState::Exited => "exited",
            ContainerState::Dead => "dead",
            ContainerState::Unknown => "unknown",
        }
    }

    /// Parse the engine's lowercase state name.
    pub fn from_engine(state: &str) -> Self {
        match state {
            "created" => ContainerState::Created,
            "running" => ContainerState::Running,
            "paused" => ContainerState::Paused,
            "restarting" => ContainerState::Restarting,
            "removing" => ContainerState::Removing,
            "exited" => ContainerState::Exited,
            "dead" => ContainerState::Dead,
            _ => ContainerState::Unknown,
        }
    }
}

impl std::fmt::Display for ContainerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A container as returned by the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub id: ContainerId,
    /// Names without the engine's leading slash. May be empty.
    pub names: Vec<String>,
    /// ID of the image the container was created from.
    pub image_id: ImageId,
    pub state: ContainerState,
}

impl Container {
    pub fn display_names(&self) -> String {
        self.names.join(", ")
    }
}

/// A local image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub id: ImageId,
    pub repo_tags: Vec<String>,
    pub created: DateTime<Utc>,
    /// Size in bytes.
    pub size: u64,
}

impl Image {
    /// `repo:tag` labels, or the `<none>:<none>` placeholder.
    pub fn display_tags(&self) -> String {
        if self.repo_tags.is_empty() {
            UNTAGGED_IMAGE.to_string()
        } else {
            self.repo_tags.join(", ")
        }
    }
}

/// A named volume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Volume {
    pub name: String,
    /// Disk usage in bytes, when the engine computed it.
    pub size: Option<u64>,
}

/// Kind of a container mount point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountKind {
    Volume,
    Bind,
    Tmpfs,
    Other,
}

/// A mount point of an inspected container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mount {
    pub kind: MountKind,
    /// Volume name; only set for volume mounts.
    pub name: Option<String>,
}

impl Mount {
    /// The volume this mount keeps in use, if any.
    pub fn volume_name(&self) -> Option<&str> {
        match self.kind {
            MountKind::Volume => self.name.as_deref(),
            _ => None,
        }
    }
}

/// A network known to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    pub id: NetworkId,
    pub name: String,
}

/// A build cache record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildCacheEntry {
    pub id: BuildCacheId,
    pub description: String,
    pub in_use: bool,
    /// Size in bytes.
    pub size: u64,
    pub created_at: Option<DateTime<Utc>>,
    pub last_used_at: Option<DateTime<Utc>>,
}

impl BuildCacheEntry {
    /// Timestamp the engine's `until` prune filter compares against.
    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.last_used_at.or(self.created_at)
    }
}

/// One entry of an image prune: an untagged reference or a deleted layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageDeletion {
    pub untagged: Option<String>,
    pub deleted: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImagePruneReport {
    pub images_deleted: Vec<ImageDeletion>,
    pub space_reclaimed: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolumePruneReport {
    pub volumes_deleted: Vec<String>,
    pub space_reclaimed: u64,
}

/// Network prune reports no reclaimed space.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkPruneReport {
    pub networks_deleted: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildCachePruneReport {
    pub caches_deleted: Vec<String>,
    pub space_reclaimed: u64,
}

/// Count and combined size of one resource kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsageTally {
    pub count: usize,
    pub size: u64,
}

impl UsageTally {
    pub fn from_sizes(sizes: impl IntoIterator<Item = u64>) -> Self {
        sizes.into_iter().fold(Self::default(), |tally, size| Self {
            count: tally.count + 1,
            size: tally.size.saturating_add(size),
        })
    }
}

/// Point-in-time disk usage across all resource kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiskUsage {
    pub containers: UsageTally,
    pub images: UsageTally,
    pub volumes: UsageTally,
    pub build_cache: UsageTally,
}

impl DiskUsage {
    pub fn total_size(&self) -> u64 {
        [
            self.containers.size,
            self.images.size,
            self.volumes.size,
            self.build_cache.size,
        ]
        .into_iter()
        .fold(0u64, u64::saturating_add)
    }
}
