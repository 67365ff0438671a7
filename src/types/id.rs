// ABOUTME: Phantom-typed identifiers for engine resources.
// ABOUTME: Keeps container, image, network, and build cache IDs from being mixed up.

use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Number of characters shown when an ID is printed for humans.
pub const SHORT_ID_LEN: usize = 12;

/// Marker types for phantom type parameters.
/// Using empty enums prevents instantiation and requires no trait bounds.
pub enum ContainerMarker {}
pub enum ImageMarker {}
pub enum NetworkMarker {}
pub enum BuildCacheMarker {}

/// An engine-assigned identifier tagged with the kind of resource it names.
///
/// A `NetworkId` cannot be handed to an operation expecting a `ContainerId`,
/// even though both are opaque strings on the wire.
#[must_use = "IDs reference resources and should not be ignored"]
pub struct Id<T> {
    value: String,
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            _marker: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_inner(self) -> String {
        self.value
    }

    /// Human-friendly prefix of the ID, as `docker ps` shows it.
    ///
    /// A leading `sha256:` digest algorithm is dropped before truncating.
    pub fn short(&self) -> &str {
        short_id(&self.value)
    }
}

/// Truncate a raw engine ID to its display prefix.
pub fn short_id(raw: &str) -> &str {
    let trimmed = raw.strip_prefix("sha256:").unwrap_or(raw);
    match trimmed.char_indices().nth(SHORT_ID_LEN) {
        Some((end, _)) => &trimmed[..end],
        None => trimmed,
    }
}

// Manual impls so T needs no bounds; it only exists as a marker.

impl<T> std::fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Id").field("value", &self.value).finish()
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> std::fmt::Display for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

pub type ContainerId = Id<ContainerMarker>;
pub type ImageId = Id<ImageMarker>;
pub type NetworkId = Id<NetworkMarker>;
pub type BuildCacheId = Id<BuildCacheMarker>;
