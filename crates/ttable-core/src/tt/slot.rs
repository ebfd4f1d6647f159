//! Slot storage and XOR verification

use crate::util::sync_compat::{AtomicU8, AtomicU64, Ordering};

/// One table slot (24 bytes)
///
/// `key` holds `fingerprint ^ data`, so a reader that sees the two words
/// from different writes reconstructs a fingerprint that matches neither.
#[repr(C)]
pub(crate) struct Slot {
    key: AtomicU64,
    data: AtomicU64,
    generation: AtomicU8,
}

impl Slot {
    pub(crate) fn new() -> Self {
        Slot {
            key: AtomicU64::new(0),
            data: AtomicU64::new(0),
            generation: AtomicU8::new(0),
        }
    }

    /// Snapshot of the three words
    #[inline]
    pub(crate) fn load(&self) -> RawSlot {
        RawSlot {
            key: self.key.load(Ordering::Relaxed),
            data: self.data.load(Ordering::Relaxed),
            generation: self.generation.load(Ordering::Relaxed),
        }
    }

    /// Publish a complete entry
    #[inline]
    pub(crate) fn write(&self, fingerprint: u64, value: u64, generation: u8) {
        self.data.store(value, Ordering::Relaxed);
        self.key.store(fingerprint ^ value, Ordering::Relaxed);
        self.generation.store(generation, Ordering::Relaxed);
    }

    /// Reset to the empty state
    #[inline]
    pub(crate) fn clear(&self) {
        self.data.store(0, Ordering::Relaxed);
        self.key.store(0, Ordering::Relaxed);
        self.generation.store(0, Ordering::Relaxed);
    }

    /// Write only the value word, as a writer preempted halfway would.
    #[cfg(test)]
    pub(crate) fn write_data_only(&self, value: u64) {
        self.data.store(value, Ordering::Relaxed);
    }

    /// Write only the verification word of `fingerprint`/`value`.
    #[cfg(test)]
    pub(crate) fn write_key_only(&self, fingerprint: u64, value: u64) {
        self.key.store(fingerprint ^ value, Ordering::Relaxed);
    }
}

/// Plain copy of a slot's words
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RawSlot {
    pub(crate) key: u64,
    pub(crate) data: u64,
    pub(crate) generation: u8,
}

impl RawSlot {
    /// Check if slot is empty
    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.key == 0 && self.data == 0
    }

    /// Fingerprint the stored pair belongs to
    #[inline]
    pub(crate) fn fingerprint(&self) -> u64 {
        self.key ^ self.data
    }

    /// Value if the pair verifies against `fingerprint`
    #[inline]
    pub(crate) fn verify(&self, fingerprint: u64) -> Option<u64> {
        (self.fingerprint() == fingerprint).then_some(self.data)
    }
}
