//! Core error types.

use thiserror::Error;

/// Registry errors.
///
/// Defects in model definitions are never reported here; they degrade to
/// best-effort descriptors. Only snapshot loading and lifecycle misuse fail.
#[derive(Debug, Error)]
pub enum Error {
    /// `build` was called on a registry that already left `Uninitialized`.
    #[error("registry already built (state: {0})")]
    AlreadyBuilt(crate::registry::RegistryState),

    /// Reading an inventory snapshot failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// An inventory snapshot was not valid JSON or had the wrong top-level shape.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias for registry operations.
pub type Result<T> = std::result::Result<T, Error>;
