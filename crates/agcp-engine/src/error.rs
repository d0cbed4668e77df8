//! Error types for agcp-engine.

/// Errors produced by planning and task execution.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A configuration file could not be read.
    #[error("{0}")]
    Config(#[from] agcp_config::ConfigError),

    /// Authentication against the token endpoint failed.
    #[error("{0}")]
    Auth(#[from] agcp_api::AuthError),

    /// A publishing API call failed.
    #[error("{0}")]
    Api(#[from] agcp_api::ApiError),

    /// A utility operation failed.
    #[error("{0}")]
    Util(#[from] agcp_util::error::UtilError),

    /// No task with this name was registered.
    #[error("task `{name}` not found — available tasks: {available}")]
    UnknownTask { name: String, available: String },

    /// The build output for a publish task is missing.
    #[error("no .{suffix} found in {dir} for task `{task}` — run `{dependency}` first")]
    ArtifactNotFound {
        task: String,
        dir: String,
        suffix: String,
        dependency: String,
    },

    /// The configured release type is not one the console accepts.
    #[error("invalid release type {code} — use 1 (network release) or 3 (phased release)")]
    InvalidReleaseType { code: u8 },

    /// The host build task a publish task depends on failed.
    #[error("host task `{task}` failed with exit code {code}")]
    HostTask { task: String, code: i32 },
}
