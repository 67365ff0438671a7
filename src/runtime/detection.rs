// ABOUTME: Engine endpoint resolution from the process environment.
// ABOUTME: Uses DOCKER_HOST when set, otherwise the Docker socket, then Podman sockets.

use super::types::{RuntimeEndpoint, RuntimeType};
use std::path::Path;

/// Error during endpoint resolution.
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("no container runtime found (DOCKER_HOST unset, no Podman or Docker socket)")]
    NoRuntimeFound,
}

const DOCKER_HOST_VAR: &str = "DOCKER_HOST";
const ROOTFUL_PODMAN: &str = "/run/podman/podman.sock";
const DOCKER_SOCKET: &str = "/var/run/docker.sock";

/// Resolve the engine endpoint from the environment.
///
/// A non-empty `DOCKER_HOST` wins. Otherwise local sockets are probed in order:
/// 1. Docker socket (`/var/run/docker.sock`), the engine's default endpoint
/// 2. Rootless Podman socket (`/run/user/$UID/podman/podman.sock`)
/// 3. Rootful Podman socket (`/run/podman/podman.sock`)
pub fn resolve_endpoint() -> Result<RuntimeEndpoint, DetectionError> {
    if let Ok(host) = std::env::var(DOCKER_HOST_VAR)
        && !host.trim().is_empty()
    {
        return Ok(RuntimeEndpoint::Environment { host });
    }
    detect_local()
}

/// Detect a container engine socket on the local system.
pub fn detect_local() -> Result<RuntimeEndpoint, DetectionError> {
    detect_with(get_uid().as_deref(), |path| path.exists())
}

/// Socket probing with the filesystem check injected.
pub fn detect_with(
    uid: Option<&str>,
    exists: impl Fn(&Path) -> bool,
) -> Result<RuntimeEndpoint, DetectionError> {
    if exists(Path::new(DOCKER_SOCKET)) {
        return Ok(local(RuntimeType::Docker, DOCKER_SOCKET.to_string()));
    }

    if let Some(uid) = uid {
        let rootless_socket = format!("/run/user/{}/podman/podman.sock", uid);
        if exists(Path::new(&rootless_socket)) {
            return Ok(local(RuntimeType::Podman, rootless_socket));
        }
    }

    if exists(Path::new(ROOTFUL_PODMAN)) {
        return Ok(local(RuntimeType::Podman, ROOTFUL_PODMAN.to_string()));
    }

    Err(DetectionError::NoRuntimeFound)
}

fn local(runtime_type: RuntimeType, socket_path: String) -> RuntimeEndpoint {
    tracing::debug!(%runtime_type, %socket_path, "detected local runtime socket");
    RuntimeEndpoint::LocalSocket {
        runtime_type,
        socket_path,
    }
}

fn get_uid() -> Option<String> {
    std::env::var("UID").ok().or_else(|| {
        // Fall back to reading /proc/self/status
        std::fs::read_to_string("/proc/self/status")
            .ok()
            .and_then(|s| {
                s.lines()
                    .find(|l| l.starts_with("Uid:"))
                    .and_then(|l| l.split_whitespace().nth(1))
                    .map(|s| s.to_string())
            })
    })
}
