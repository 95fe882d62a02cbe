//! Queue module - 7-bag piece generation
//!
//! The bag randomizer keeps two sequences: the externally visible preview
//! queue (the pieces about to be dealt, fixed look-ahead length) and an
//! internal reserve bag. Dealing a piece moves one reserve piece into the
//! preview, and an emptied reserve is refilled with a freshly shuffled set
//! of all 7 shapes, so across any 7 draws from a bag boundary each shape
//! appears exactly once and the queue is never empty.
//!
//! The RNG is a small seedable LCG so games are deterministic per seed.

use arrayvec::ArrayVec;
use blockfall_types::{ShapeKind, PREVIEW_LEN};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    /// Current internal state (restarting with it replays the sequence).
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Source of upcoming pieces.
///
/// The bag randomizer is the production implementation; tests substitute
/// scripted sequences through the same seam.
pub trait PieceQueue {
    /// Deal the next piece, refilling the look-ahead window.
    fn shift_next(&mut self) -> ShapeKind;

    /// Non-mutating read of the first `n` upcoming pieces; `n` is clamped
    /// to `[1, preview_len]`.
    fn get_next(&self, n: usize) -> ArrayVec<ShapeKind, 7>;

    /// Length of the look-ahead window.
    fn preview_len(&self) -> usize;
}

/// The 7-bag randomizer.
#[derive(Debug, Clone)]
pub struct BagQueue {
    /// Pieces about to be dealt, oldest first.
    preview: ArrayVec<ShapeKind, 7>,
    /// Remainder of the current bag, dealt into the preview one-for-one.
    reserve: ArrayVec<ShapeKind, 7>,
    rng: SimpleRng,
}

impl BagQueue {
    /// Create a bag queue with the default preview length.
    pub fn new(seed: u32) -> Self {
        Self::with_preview_len(seed, PREVIEW_LEN)
    }

    /// Create a bag queue with a custom look-ahead window (1..=7).
    pub fn with_preview_len(seed: u32, preview_len: usize) -> Self {
        assert!(
            (1..=7).contains(&preview_len),
            "preview length must be in 1..=7"
        );
        let mut queue = Self {
            preview: ArrayVec::new(),
            reserve: ArrayVec::new(),
            rng: SimpleRng::new(seed),
        };
        queue.refill_reserve();
        for _ in 0..preview_len {
            queue.deal_into_preview();
        }
        queue
    }

    /// Seed-equivalent state for restarting with the same sequence.
    pub fn seed(&self) -> u32 {
        self.rng.state()
    }

    fn refill_reserve(&mut self) {
        let mut bag = ShapeKind::ALL;
        self.rng.shuffle(&mut bag);
        self.reserve.clear();
        self.reserve.extend(bag);
    }

    fn deal_into_preview(&mut self) {
        let next = self.reserve.remove(0);
        self.preview.push(next);
        if self.reserve.is_empty() {
            self.refill_reserve();
        }
    }
}

impl PieceQueue for BagQueue {
    fn shift_next(&mut self) -> ShapeKind {
        let dealt = self.preview.remove(0);
        // Refill one-for-one so the look-ahead window keeps its length.
        self.deal_into_preview();
        dealt
    }

    fn get_next(&self, n: usize) -> ArrayVec<ShapeKind, 7> {
        let n = n.clamp(1, self.preview.len());
        self.preview.iter().take(n).copied().collect()
    }

    fn preview_len(&self) -> usize {
        self.preview.len()
    }
}

/// A queue that repeats a fixed sequence forever.
///
/// Games accept any [`PieceQueue`] implementation at construction; this one
/// exists for deterministic tests and scripted demos.
#[derive(Debug, Clone)]
pub struct ScriptedQueue {
    sequence: Vec<ShapeKind>,
    cursor: usize,
    preview_len: usize,
}

impl ScriptedQueue {
    pub fn new(sequence: Vec<ShapeKind>) -> Self {
        assert!(!sequence.is_empty(), "scripted sequence must not be empty");
        Self {
            preview_len: PREVIEW_LEN.min(sequence.len()),
            sequence,
            cursor: 0,
        }
    }

    fn at(&self, offset: usize) -> ShapeKind {
        self.sequence[(self.cursor + offset) % self.sequence.len()]
    }
}

impl PieceQueue for ScriptedQueue {
    fn shift_next(&mut self) -> ShapeKind {
        let dealt = self.at(0);
        self.cursor = (self.cursor + 1) % self.sequence.len();
        dealt
    }

    fn get_next(&self, n: usize) -> ArrayVec<ShapeKind, 7> {
        let n = n.clamp(1, self.preview_len);
        (0..n).map(|i| self.at(i)).collect()
    }

    fn preview_len(&self) -> usize {
        self.preview_len
    }
}
