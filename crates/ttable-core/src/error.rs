//! Error types for transposition table administration
//!
//! Only administrative operations (`initialize`, `resize`, `clear`) report
//! errors. A dropped store or a missed probe is a normal cache outcome and is
//! returned as a plain `bool` / `Option`.

use std::collections::TryReserveError;

/// Transposition table errors
#[derive(thiserror::Error, Debug)]
pub enum TableError {
    /// Table used before `initialize`
    #[error("transposition table is not initialized")]
    NotInitialized,

    /// The host could not provide backing storage
    #[error("failed to allocate {slots} slots ({bytes} bytes) for the transposition table")]
    Allocation {
        slots: usize,
        bytes: usize,
        #[source]
        source: TryReserveError,
    },

    /// The byte budget cannot hold a single slot
    #[error("hash budget of {requested} bytes is below the minimum of {minimum} bytes")]
    CapacityTooSmall { requested: usize, minimum: usize },
}

/// Result type for transposition table administration
pub type TableResult<T> = Result<T, TableError>;
