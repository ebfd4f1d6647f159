//! Table configuration
//!
//! `TableConfig` is plain data so that front-ends can load it from TOML/JSON
//! and override individual fields from the command line.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::tt::SLOT_BYTES;

/// Default number of slots (2^20)
pub const DEFAULT_SLOTS: usize = 1 << 20;

/// Rule deciding whether a new entry overwrites the occupant of its slot
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReplacementPolicy {
    /// Keep deeper results of the current generation; anything else is replaced
    #[default]
    DepthPreferred,
    /// Every store overwrites the slot
    AlwaysReplace,
}

impl ReplacementPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplacementPolicy::DepthPreferred => "depth-preferred",
            ReplacementPolicy::AlwaysReplace => "always-replace",
        }
    }
}

impl fmt::Display for ReplacementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReplacementPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "depth-preferred" | "depth" => Ok(ReplacementPolicy::DepthPreferred),
            "always-replace" | "always" => Ok(ReplacementPolicy::AlwaysReplace),
            other => Err(format!(
                "unknown replacement policy '{other}' (expected depth-preferred or always-replace)"
            )),
        }
    }
}

/// Transposition table configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableConfig {
    /// Memory budget in bytes; the slot count is the largest power of two that fits
    pub hash_bytes: usize,
    /// Replacement policy used by `store`
    pub policy: ReplacementPolicy,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            hash_bytes: DEFAULT_SLOTS * SLOT_BYTES,
            policy: ReplacementPolicy::default(),
        }
    }
}

impl TableConfig {
    /// Config with a budget given in MiB (USI/UCI `Hash` option style)
    pub fn with_hash_mb(hash_mb: usize) -> Self {
        Self {
            // 飽和乗算で極端なサイズ指定時のオーバーフローを防止
            hash_bytes: hash_mb.saturating_mul(1024 * 1024),
            ..Default::default()
        }
    }
}
