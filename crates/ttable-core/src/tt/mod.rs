//! Lock-free transposition table (single table, one slot per index)
//!
//! Overview
//! - Power-of-two slot array, index = `fingerprint & mask`
//! - Lock-free stores/probes on `&self`; resize on `&mut self`
//! - Generation (age) counter for replacement and staleness
//! - Optional relaxed statistics (`tt-stats` feature)
//!
//! Slot integrity invariants (reader/writer contract)
//! - Writer: `data.store(value)` → `key.store(fingerprint ^ value)` → `generation.store(gen)`, all Relaxed
//! - Reader (probe): load `key` and `data`, accept only if `key ^ data == fingerprint`
//! - Clear: every word stored as zero; readers treat an all-zero pair as empty before the XOR check,
//!   so storing (fingerprint 0, value 0) is the one write that is dropped
//!   These rules ensure readers never accept a "key from one write + data from another" pair.
//!   The generation byte is outside the check and only steers replacement.

mod slot;
mod stats;
mod table;


pub use stats::TableStats;
pub use table::{DepthFn, Entry, Lifecycle, TranspositionTable, slot_count_for};

/// Size of one slot in bytes (verification word + value + generation, padded)
pub const SLOT_BYTES: usize = std::mem::size_of::<slot::Slot>();

/// Number of slots sampled by `hashfull`
pub const HASHFULL_SAMPLE: usize = 1000;
