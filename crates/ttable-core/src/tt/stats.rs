//! Probe/store counters
//!
//! Counters are plain std atomics with Relaxed ordering; they are diagnostics,
//! not part of the slot protocol, so they stay outside the loom switch.
//! Without the `tt-stats` feature every `record_*` call compiles to nothing.

use serde::Serialize;
#[cfg(feature = "tt-stats")]
use std::sync::atomic::{AtomicU64, Ordering::Relaxed};

/// Snapshot of table counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TableStats {
    /// Probes on an active table
    pub probes: u64,
    /// Probes that returned a value
    pub hits: u64,
    /// Probes that found an occupied slot holding another fingerprint (or a torn pair)
    pub collisions: u64,
    /// Stores that wrote the slot
    pub stores: u64,
    /// Stores dropped by the replacement policy
    pub rejected: u64,
}

impl TableStats {
    /// Hit rate in percent (0.0 when nothing was probed)
    pub fn hit_rate(&self) -> f64 {
        if self.probes == 0 {
            return 0.0;
        }
        self.hits as f64 / self.probes as f64 * 100.0
    }

    /// Build a human-readable summary string (multiline) without logging
    pub fn to_summary_string(&self) -> String {
        format!(
            "TT stats\n  probes={} hits={} ({:.1}%) collisions={}\n  stores={} rejected={}\n",
            self.probes,
            self.hits,
            self.hit_rate(),
            self.collisions,
            self.stores,
            self.rejected
        )
    }
}

#[derive(Default)]
pub(crate) struct StatsCounters {
    #[cfg(feature = "tt-stats")]
    probes: AtomicU64,
    #[cfg(feature = "tt-stats")]
    hits: AtomicU64,
    #[cfg(feature = "tt-stats")]
    collisions: AtomicU64,
    #[cfg(feature = "tt-stats")]
    stores: AtomicU64,
    #[cfg(feature = "tt-stats")]
    rejected: AtomicU64,
}

impl StatsCounters {
    #[inline]
    pub(crate) fn record_probe(&self) {
        #[cfg(feature = "tt-stats")]
        self.probes.fetch_add(1, Relaxed);
    }

    #[inline]
    pub(crate) fn record_hit(&self) {
        #[cfg(feature = "tt-stats")]
        self.hits.fetch_add(1, Relaxed);
    }

    #[inline]
    pub(crate) fn record_collision(&self) {
        #[cfg(feature = "tt-stats")]
        self.collisions.fetch_add(1, Relaxed);
    }

    #[inline]
    pub(crate) fn record_store(&self) {
        #[cfg(feature = "tt-stats")]
        self.stores.fetch_add(1, Relaxed);
    }

    #[inline]
    pub(crate) fn record_rejected(&self) {
        #[cfg(feature = "tt-stats")]
        self.rejected.fetch_add(1, Relaxed);
    }

    pub(crate) fn snapshot(&self) -> TableStats {
        #[cfg(feature = "tt-stats")]
        {
            TableStats {
                probes: self.probes.load(Relaxed),
                hits: self.hits.load(Relaxed),
                collisions: self.collisions.load(Relaxed),
                stores: self.stores.load(Relaxed),
                rejected: self.rejected.load(Relaxed),
            }
        }
        #[cfg(not(feature = "tt-stats"))]
        {
            TableStats::default()
        }
    }

    /// Reset all counters to zero
    pub(crate) fn reset(&self) {
        #[cfg(feature = "tt-stats")]
        {
            self.probes.store(0, Relaxed);
            self.hits.store(0, Relaxed);
            self.collisions.store(0, Relaxed);
            self.stores.store(0, Relaxed);
            self.rejected.store(0, Relaxed);
        }
    }
}
