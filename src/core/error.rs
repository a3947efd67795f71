//=========================================================================
// Errors
//=========================================================================
//
// Fatal-class failures of the platform core.
//
// Misuse with a safe fallback (closed handles, unknown properties,
// double close) is never an error here: it is logged as a warning and
// the operation degrades to a no-op or a default value.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::registry::Handle;

//=== Error ===============================================================

/// Unrecoverable environment or programmer errors.
///
/// Every variant is logged at `error` level where it is detected. The
/// library never terminates the host process itself; the winit runner
/// treats any of these as terminal and leaves its event loop.
#[derive(Debug, Error)]
pub enum Error {
    /// A clock has no free timer slot left.
    #[error("timer table full on clock {clock:?} ({capacity} slots), cannot add {name:?}")]
    TimerTableFull {
        clock: Handle,
        name: String,
        capacity: usize,
    },

    /// The native event producer went away while a caller was blocked.
    #[error("native event source disconnected")]
    SourceDisconnected,

    /// The native backend refused to create a resource (window, device).
    #[error("native resource creation failed: {0}")]
    ResourceCreation(String),

    /// A native backend could not be initialized.
    #[error("backend initialization failed: {0}")]
    Backend(String),

    /// The winit event loop could not be created or failed while running.
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

//=========================================================================
// Unit Tests
//=========================================================================
