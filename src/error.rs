//=========================================================================
// Engine Errors
//=========================================================================
//
// Error taxonomy for the runtime core.
//
//   Transient     DisplayError        → retried on the next loop tick
//   Ignored       (no type)           → state-guarded no-ops
//   Host fault    EngineError::HostFault / Platform → process terminates
//   Persistence   SaveError, AssetError, ConfigError → reported to caller
//
// Scene hooks carry no error channel. Failures inside a scene stay
// inside the scene.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::platform_bridge::PlatformError;

//=== EngineError =========================================================

/// Top-level error returned by engine construction and the game loop.
///
/// Only [`EngineError::HostFault`] and [`EngineError::Platform`] escape
/// [`crate::Engine::game_loop`]; both mean the hosting environment is
/// broken and the process is expected to terminate.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The host environment failed in a way the engine cannot recover from.
    #[error("host environment fault: {0}")]
    HostFault(String),

    /// The platform glue reported an error.
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// Configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Progress persistence failed.
    #[error(transparent)]
    Save(#[from] SaveError),
}

//=== DisplayError ========================================================

/// Display subsystem failures.
///
/// The engine treats all of these as transient: the operation is simply
/// attempted again on a later loop iteration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisplayError {
    /// The window or display is not ready yet.
    #[error("display not ready")]
    NotReady,

    /// The surface backing the swapchain has been lost.
    #[error("surface lost")]
    SurfaceLost,

    /// The swapchain no longer matches the surface and must be recreated.
    #[error("swapchain out of date")]
    OutOfDate,

    /// A stale or foreign handle was passed in.
    #[error("invalid display handle")]
    InvalidHandle,

    /// The requested configuration is not supported.
    #[error("unsupported display configuration: {0}")]
    Unsupported(String),
}

//=== SaveError ===========================================================

/// Progress persistence failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaveError {
    #[error("save I/O error: {0}")]
    Io(String),

    #[error("corrupt save data: {0}")]
    Corrupt(String),

    /// The backing store (typically cloud) is not reachable.
    #[error("save store unavailable")]
    Unavailable,
}

//=== AssetError ==========================================================

/// Asset loading failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(String),

    #[error("asset I/O error: {0}")]
    Io(String),
}

//=== ConfigError =========================================================

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

//=========================================================================
// Unit Tests
//=========================================================================
