//! Module lifecycle errors.

use thiserror::Error;

/// Errors raised by [`crate::SuperEntityModule`].
#[derive(Debug, Error)]
pub enum ModuleError {
    /// Another caller is running the initialization build.
    #[error("module initialization already in progress")]
    InitInProgress,
}
