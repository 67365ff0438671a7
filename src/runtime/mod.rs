// ABOUTME: Resource gateway over the container engine's administrative API.
// ABOUTME: Capability traits, the bollard implementation, and endpoint detection.

mod bollard;
mod detection;
mod error;
pub mod traits;
mod types;

pub use self::bollard::BollardRuntime;
pub use detection::{DetectionError, detect_local, detect_with, resolve_endpoint};
pub use error::RuntimeError;
pub use traits::*;
pub use types::{RuntimeEndpoint, RuntimeType};
