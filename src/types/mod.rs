// ABOUTME: Type-safe identifiers for engine resources.
// ABOUTME: Uses phantom types to prevent ID confusion at compile time.

mod id;

pub use id::{BuildCacheId, ContainerId, Id, ImageId, NetworkId, SHORT_ID_LEN, short_id};
