//! Packed search-result payload
//!
//! The table stores an opaque `u64`. This module is the search side of that
//! contract: it packs depth, score, bound and a move hint into one word and
//! provides the default depth extractor used by the replacement policy.
//!
//! Bit layout (64 bits total):
//! [63-58]: reserved (6 bits, always zero)
//! [57-56]: bound (2 bits) - MoveOnly/LowerBound/UpperBound/Exact
//! [55-48]: depth (8 bits)
//! [47-32]: score (16 bits, two's complement)
//! [31-0]:  move hint (32 bits, 0 = none)

pub const MOVE_SHIFT: u8 = 0;
pub const MOVE_BITS: u8 = 32;
pub const MOVE_MASK: u64 = (1 << MOVE_BITS) - 1;

pub const SCORE_SHIFT: u8 = 32;
pub const SCORE_BITS: u8 = 16;
pub const SCORE_MASK: u64 = (1 << SCORE_BITS) - 1;

pub const DEPTH_SHIFT: u8 = 48;
pub const DEPTH_BITS: u8 = 8;
pub const DEPTH_MASK: u64 = (1 << DEPTH_BITS) - 1;

pub const BOUND_SHIFT: u8 = 56;
pub const BOUND_BITS: u8 = 2;
pub const BOUND_MASK: u64 = (1 << BOUND_BITS) - 1;

/// Score of a mate at the root
pub const CHECKMATE: i32 = 32_767;

/// Scores at or beyond this magnitude are mate scores and are stored as bounds only
pub const MATE_BOUND: i32 = CHECKMATE - 500;

/// What the stored score means
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Bound {
    /// Score unusable for cutoffs; only the move hint is meaningful
    #[default]
    MoveOnly = 0,
    /// Search failed high: true score >= stored score
    LowerBound = 1,
    /// Search failed low: true score <= stored score
    UpperBound = 2,
    /// Exact score (PV node)
    Exact = 3,
}

impl Bound {
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & BOUND_MASK as u8 {
            1 => Bound::LowerBound,
            2 => Bound::UpperBound,
            3 => Bound::Exact,
            _ => Bound::MoveOnly,
        }
    }
}

/// Unpacked view of a stored value
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchResult {
    pub bound: Bound,
    pub score: i32,
    pub depth: u8,
    /// Move hint in the orchestrator's own encoding; 0 means no move
    pub mv: u32,
}

impl SearchResult {
    pub fn new(bound: Bound, score: i32, depth: u8, mv: u32) -> Self {
        Self {
            bound,
            score,
            depth,
            mv,
        }
    }

    /// Pack into the opaque table value
    pub fn pack(self) -> u64 {
        // Clamp score to 16-bit range (i16)
        let score = self.score.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
        let score_encoded = (score as u16) as u64; // two's complement bitcast

        ((self.mv as u64 & MOVE_MASK) << MOVE_SHIFT)
            | (score_encoded << SCORE_SHIFT)
            | ((self.depth as u64 & DEPTH_MASK) << DEPTH_SHIFT)
            | ((self.bound as u64 & BOUND_MASK) << BOUND_SHIFT)
    }

    /// Unpack a value previously produced by [`SearchResult::pack`]
    pub fn unpack(value: u64) -> Self {
        Self {
            bound: bound_of(value),
            score: score_of(value),
            depth: depth_of(value),
            mv: move_of(value),
        }
    }

    /// Rewrite mate scores so they are only ever stored as bounds.
    ///
    /// Mate distances are path dependent, so a stored mate score is not reused
    /// as an exact value. A mate score that failed low carries no usable
    /// bound and keeps only its move; any other mate score becomes a lower
    /// bound at [`MATE_BOUND`]. Mated scores are the mirror image.
    pub fn for_storage(self) -> Self {
        let mut out = self;
        if self.score >= MATE_BOUND {
            if self.bound == Bound::UpperBound {
                out.bound = Bound::MoveOnly;
            } else {
                out.bound = Bound::LowerBound;
                out.score = MATE_BOUND;
            }
        } else if self.score <= -MATE_BOUND {
            if self.bound == Bound::LowerBound {
                out.bound = Bound::MoveOnly;
            } else {
                out.bound = Bound::UpperBound;
                out.score = -MATE_BOUND;
            }
        }
        out
    }

    /// Move hint, if any
    #[inline]
    pub fn best_move(&self) -> Option<u32> {
        (self.mv != 0).then_some(self.mv)
    }
}

/// Extract depth from packed value (default `DepthFn` of the table)
#[inline(always)]
pub fn depth_of(value: u64) -> u8 {
    ((value >> DEPTH_SHIFT) & DEPTH_MASK) as u8
}

/// Extract score from packed value (16-bit signed)
#[inline]
pub fn score_of(value: u64) -> i32 {
    let raw = ((value >> SCORE_SHIFT) & SCORE_MASK) as u16;
    raw as i16 as i32
}

/// Extract bound from packed value
#[inline]
pub fn bound_of(value: u64) -> Bound {
    Bound::from_bits(((value >> BOUND_SHIFT) & BOUND_MASK) as u8)
}

/// Extract move hint from packed value
#[inline]
pub fn move_of(value: u64) -> u32 {
    ((value >> MOVE_SHIFT) & MOVE_MASK) as u32
}
