//! TranspositionTable本体
//!
//! - SlotArray: 2^n slots and their index mask
//! - TranspositionTable: lifecycle, replacement policy, generation
//! - initialize/resize/store/probe/clear

use super::slot::Slot;
use super::stats::{StatsCounters, TableStats};
use super::{HASHFULL_SAMPLE, SLOT_BYTES};
use crate::config::{ReplacementPolicy, TableConfig};
use crate::error::{TableError, TableResult};
use crate::payload;
use crate::util::sync_compat::{AtomicU8, Ordering};
use std::fmt;

/// Extracts the search depth from an opaque stored value
pub type DepthFn = fn(u64) -> u8;

/// Lifecycle phase of a table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    /// No backing storage; stores are dropped and probes miss
    Uninitialized,
    /// Backing storage allocated and serving probes/stores
    Active,
}

/// Value-copied result of a successful probe
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entry {
    /// Stored payload
    pub value: u64,
    /// Generation that wrote the slot
    pub generation: u8,
}

/// Largest power-of-two slot count that fits in `bytes`
pub fn slot_count_for(bytes: usize) -> TableResult<usize> {
    let fit = bytes / SLOT_BYTES;
    if fit == 0 {
        return Err(TableError::CapacityTooSmall {
            requested: bytes,
            minimum: SLOT_BYTES,
        });
    }
    Ok(1usize << fit.ilog2())
}

struct SlotArray {
    slots: Box<[Slot]>,
    mask: u64,
}

impl SlotArray {
    /// Allocate `count` zeroed slots without aborting on allocation failure
    fn allocate(count: usize) -> TableResult<Self> {
        debug_assert!(count.is_power_of_two(), "slot count must be power of two");

        let mut slots = Vec::new();
        slots.try_reserve_exact(count).map_err(|source| TableError::Allocation {
            slots: count,
            bytes: count.saturating_mul(SLOT_BYTES),
            source,
        })?;
        slots.resize_with(count, Slot::new);

        Ok(Self {
            slots: slots.into_boxed_slice(),
            mask: (count - 1) as u64,
        })
    }

    #[inline(always)]
    fn slot(&self, fingerprint: u64) -> &Slot {
        &self.slots[(fingerprint & self.mask) as usize]
    }

    #[inline]
    fn len(&self) -> usize {
        self.slots.len()
    }
}

/// Zero `slots`, splitting large tables across scoped threads. Returns the number of workers used.
pub(super) fn clear_slots(slots: &[Slot], threads: usize) -> usize {
    // サイズが小さい場合やスレッド数が1の場合は逐次クリア
    if threads <= 1 || slots.len() < threads * PARALLEL_CLEAR_MIN_PER_THREAD {
        slots.iter().for_each(Slot::clear);
        return 1;
    }

    let chunk = slots.len().div_ceil(threads);
    std::thread::scope(|scope| {
        for part in slots.chunks(chunk) {
            scope.spawn(move || part.iter().for_each(Slot::clear));
        }
    });
    slots.len().div_ceil(chunk)
}

/// Minimum slots per worker before `clear` goes parallel
const PARALLEL_CLEAR_MIN_PER_THREAD: usize = 1024;

// (fingerprint, value) = (0, 0) は空スロットと区別できないため保存しない。一度だけログに流す。
static ZERO_KEY_LOG_ONCE: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);

/// Transposition table
///
/// Probes and stores take `&self` and never block; share the table between
/// workers with `Arc` or scoped threads. `initialize`/`resize` take
/// `&mut self`, so they can only run once no worker holds a reference.
pub struct TranspositionTable {
    /// Backing storage (`None` while uninitialized)
    array: Option<SlotArray>,
    /// Current generation (wraps at 256)
    generation: AtomicU8,
    /// Replacement policy used by `store`
    policy: ReplacementPolicy,
    /// Depth extractor for the depth-preferred policy
    depth_of: DepthFn,
    /// Probe/store counters
    stats: StatsCounters,
}

// Compile-time assertion: the table is shared by all search workers
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn check() {
        assert_send_sync::<TranspositionTable>();
    }
    let _ = check;
};

impl TranspositionTable {
    /// Create an uninitialized table using the default payload layout
    pub fn new(policy: ReplacementPolicy) -> Self {
        Self::with_depth_fn(policy, payload::depth_of)
    }

    /// Create an uninitialized table with a custom depth extractor
    pub fn with_depth_fn(policy: ReplacementPolicy, depth_of: DepthFn) -> Self {
        TranspositionTable {
            array: None,
            generation: AtomicU8::new(0),
            policy,
            depth_of,
            stats: StatsCounters::default(),
        }
    }

    /// Create and initialize a table from configuration
    pub fn from_config(config: &TableConfig) -> TableResult<Self> {
        let mut tt = Self::new(config.policy);
        tt.initialize(config.hash_bytes)?;
        Ok(tt)
    }

    /// Allocate backing storage for `capacity_bytes`.
    ///
    /// On an active table this is the same as [`TranspositionTable::resize`].
    pub fn initialize(&mut self, capacity_bytes: usize) -> TableResult<()> {
        if self.is_active() {
            log::debug!("TT initialize on active table: routed through resize");
            return self.resize(capacity_bytes);
        }
        self.install(capacity_bytes)
    }

    /// Replace the backing storage, discarding every entry.
    ///
    /// On failure the current storage (if any) is left untouched.
    pub fn resize(&mut self, new_capacity_bytes: usize) -> TableResult<()> {
        self.install(new_capacity_bytes)
    }

    fn install(&mut self, bytes: usize) -> TableResult<()> {
        let count = slot_count_for(bytes)?;
        let array = match SlotArray::allocate(count) {
            Ok(array) => array,
            Err(err) => {
                log::warn!("TT allocation failed: {err} (keeping {} slots)", self.capacity());
                return Err(err);
            }
        };

        let old_slots = self.capacity();
        log::info!(
            "TT init: bytes={} slots={} mask=0x{:x} slot_bytes={} policy={} (previous slots={})",
            bytes,
            count,
            array.mask,
            SLOT_BYTES,
            self.policy,
            old_slots
        );

        // The old array is dropped here, after the new one is in place.
        self.array = Some(array);
        self.generation.store(0, Ordering::Relaxed);
        self.stats.reset();
        Ok(())
    }

    /// Store `value` under `fingerprint`; returns whether the slot was written
    pub fn store(&self, fingerprint: u64, value: u64) -> bool {
        let Some(array) = self.array.as_ref() else {
            return false;
        };
        if fingerprint == 0 && value == 0 {
            if ZERO_KEY_LOG_ONCE
                .compare_exchange(
                    false,
                    true,
                    std::sync::atomic::Ordering::AcqRel,
                    std::sync::atomic::Ordering::Acquire,
                )
                .is_ok()
            {
                log::warn!("TT store of (fingerprint=0, value=0) dropped: indistinguishable from an empty slot");
            }
            return false;
        }

        let slot = array.slot(fingerprint);
        let current = self.generation();

        if self.policy == ReplacementPolicy::DepthPreferred {
            let existing = slot.load();
            // 同世代でより深い結果は残す（空スロットと古い世代は常に置換）
            if !existing.is_empty()
                && existing.generation == current
                && (self.depth_of)(value) < (self.depth_of)(existing.data)
            {
                self.stats.record_rejected();
                return false;
            }
        }

        slot.write(fingerprint, value, current);
        self.stats.record_store();
        true
    }

    /// Look up `fingerprint`; `None` on miss
    #[inline]
    pub fn probe(&self, fingerprint: u64) -> Option<u64> {
        self.probe_entry(fingerprint).map(|entry| entry.value)
    }

    /// Look up `fingerprint` and return the value together with its generation
    pub fn probe_entry(&self, fingerprint: u64) -> Option<Entry> {
        let array = self.array.as_ref()?;

        let raw = array.slot(fingerprint).load();
        self.stats.record_probe();
        // 空スロットは fingerprint 0 に対しても検証を通してはならない
        if raw.is_empty() {
            return None;
        }

        match raw.verify(fingerprint) {
            Some(value) => {
                self.stats.record_hit();
                Some(Entry {
                    value,
                    generation: raw.generation,
                })
            }
            None => {
                self.stats.record_collision();
                None
            }
        }
    }

    /// Empty every slot and advance the generation
    pub fn clear(&self) -> TableResult<()> {
        let array = self.array.as_ref().ok_or(TableError::NotInitialized)?;
        let threads = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        let workers = clear_slots(&array.slots, threads);
        let next = self.bump_generation();
        self.stats.reset();
        log::debug!("TT clear: slots={} workers={} generation={}", array.len(), workers, next);
        Ok(())
    }

    /// Start a new search (advance the generation, keep entries)
    pub fn new_search(&self) {
        let next = self.bump_generation();
        log::debug!("TT new_search: generation={next}");
    }

    fn bump_generation(&self) -> u8 {
        self.generation.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
    }

    /// Get current generation
    #[inline]
    pub fn generation(&self) -> u8 {
        self.generation.load(Ordering::Relaxed)
    }

    /// Occupancy of the current generation in permille (0-1000), sampled
    pub fn hashfull(&self) -> u16 {
        let Some(array) = self.array.as_ref() else {
            return 0;
        };
        let current = self.generation();
        let sample = HASHFULL_SAMPLE.min(array.len());
        let count = array.slots[..sample]
            .iter()
            .map(|slot| slot.load())
            .filter(|raw| !raw.is_empty() && raw.generation == current)
            .count();
        (count * 1000 / sample) as u16
    }

    /// Number of slots (0 while uninitialized)
    #[inline]
    pub fn capacity(&self) -> usize {
        self.array.as_ref().map_or(0, SlotArray::len)
    }

    /// Get size in bytes
    pub fn size_bytes(&self) -> usize {
        self.capacity() * SLOT_BYTES
    }

    pub fn lifecycle(&self) -> Lifecycle {
        if self.array.is_some() { Lifecycle::Active } else { Lifecycle::Uninitialized }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.array.is_some()
    }

    pub fn policy(&self) -> ReplacementPolicy {
        self.policy
    }

    /// Counter snapshot (all zero without the `tt-stats` feature)
    pub fn stats(&self) -> TableStats {
        self.stats.snapshot()
    }

    pub fn reset_stats(&self) {
        self.stats.reset();
    }

    /// Slot backing `fingerprint`, for torn-write simulation in tests
    #[cfg(test)]
    pub(crate) fn slot_for_test(&self, fingerprint: u64) -> &Slot {
        self.array.as_ref().expect("table must be initialized").slot(fingerprint)
    }
}

impl fmt::Debug for TranspositionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranspositionTable")
            .field("lifecycle", &self.lifecycle())
            .field("capacity", &self.capacity())
            .field("generation", &self.generation())
            .field("policy", &self.policy)
            .finish()
    }
}
