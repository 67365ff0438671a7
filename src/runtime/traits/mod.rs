// ABOUTME: Composable capability traits for container runtimes.
// ABOUTME: Defines SystemOps, ContainerOps, ImageOps, VolumeOps, NetworkOps, BuildCacheOps.

mod build_cache;
mod container;
mod image;
mod network;
mod shared_types;
mod system;
mod volume;

pub use build_cache::BuildCacheOps;
pub use container::ContainerOps;
pub use image::ImageOps;
pub use network::NetworkOps;
pub use shared_types::*;
pub use system::SystemOps;
pub use volume::VolumeOps;

/// Every capability a cleanup run needs.
///
/// Implemented automatically for any type providing all the capability traits.
pub trait FullRuntime:
    SystemOps + ContainerOps + ImageOps + VolumeOps + NetworkOps + BuildCacheOps
{
}

impl<T> FullRuntime for T where
    T: SystemOps + ContainerOps + ImageOps + VolumeOps + NetworkOps + BuildCacheOps
{
}
