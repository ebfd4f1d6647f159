//! # ttable-core
//!
//! Lock-free transposition table for an alpha-beta chess search.
//!
//! ## モジュール構成
//!
//! - `tt`: 置換表本体（slot encoding, replacement, resize, statistics）
//! - `payload`: search-side packing of depth / score / bound / move hint
//! - `config`: serde-backed table configuration
//! - `error`: typed errors for administrative operations
//! - `util`: std / loom atomic switch
//!
//! The table treats positions as opaque 64-bit fingerprints and results as
//! opaque 64-bit payloads; only [`payload`] knows the bit layout.

pub mod config;
pub mod error;
pub mod payload;
pub mod tt;
pub mod util;

pub use config::{ReplacementPolicy, TableConfig};
pub use error::{TableError, TableResult};
pub use payload::{Bound, SearchResult};
pub use tt::{Entry, Lifecycle, SLOT_BYTES, TableStats, TranspositionTable};
