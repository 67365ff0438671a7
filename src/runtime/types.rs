// ABOUTME: Runtime type and endpoint definitions for Docker and Podman.
// ABOUTME: Describes where the engine API is reached.

/// The container engine behind the API socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeType {
    Docker,
    Podman,
}

impl std::fmt::Display for RuntimeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeType::Docker => write!(f, "docker"),
            RuntimeType::Podman => write!(f, "podman"),
        }
    }
}

/// Where the engine API is reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeEndpoint {
    /// `DOCKER_HOST` and related variables from the environment.
    Environment { host: String },
    /// A local Unix socket found by detection.
    LocalSocket {
        runtime_type: RuntimeType,
        socket_path: String,
    },
}

impl std::fmt::Display for RuntimeEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeEndpoint::Environment { host } => write!(f, "{host} (DOCKER_HOST)"),
            RuntimeEndpoint::LocalSocket {
                runtime_type,
                socket_path,
            } => write!(f, "{runtime_type} at {socket_path}"),
        }
    }
}
