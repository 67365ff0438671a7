// ABOUTME: Decides which engine resources count as unused.
// ABOUTME: Pure functions over listed resources and container references.

use crate::config::AgeFilter;
use crate::runtime::{BuildCacheEntry, Container, Image, Network, Volume};
use crate::types::ImageId;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Networks the engine creates itself; never removed.
pub const RESERVED_NETWORKS: [&str; 3] = ["bridge", "host", "none"];

pub fn is_reserved_network(name: &str) -> bool {
    RESERVED_NETWORKS.contains(&name)
}

/// Image IDs referenced by any container, running or not.
pub fn images_in_use(containers: &[Container]) -> HashSet<&ImageId> {
    containers.iter().map(|c| &c.image_id).collect()
}

/// Images no container references and old enough for the threshold.
pub fn unused_images(
    images: Vec<Image>,
    containers: &[Container],
    older_than: AgeFilter,
    now: DateTime<Utc>,
) -> Vec<Image> {
    let in_use = images_in_use(containers);
    images
        .into_iter()
        .filter(|image| !in_use.contains(&image.id))
        .filter(|image| older_than.admits(image.created, now))
        .collect()
}

/// Volumes whose name does not appear in `mounted`.
pub fn unused_volumes(volumes: Vec<Volume>, mounted: &HashSet<String>) -> Vec<Volume> {
    volumes
        .into_iter()
        .filter(|volume| !mounted.contains(&volume.name))
        .collect()
}

/// Networks nothing is attached to, excluding the reserved defaults.
pub fn unused_networks(networks: Vec<Network>, attached: &HashSet<String>) -> Vec<Network> {
    networks
        .into_iter()
        .filter(|network| !is_reserved_network(&network.name))
        .filter(|network| !attached.contains(&network.name))
        .collect()
}

/// Build cache records not in use and, with a threshold, idle long enough.
///
/// Records without any timestamp are kept when a threshold is set.
pub fn unused_build_cache(
    entries: Vec<BuildCacheEntry>,
    older_than: AgeFilter,
    now: DateTime<Utc>,
) -> Vec<BuildCacheEntry> {
    entries
        .into_iter()
        .filter(|entry| !entry.in_use)
        .filter(|entry| match entry.last_activity() {
            Some(at) => older_than.admits(at, now),
            None => !older_than.is_enabled(),
        })
        .collect()
}
