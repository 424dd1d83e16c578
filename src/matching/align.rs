//! Tolerant search for the smaller trend sequence inside the larger one.

use crate::fingerprint::{TrendFingerprint, WINDOWS_PER_SECOND};

const THRESHOLD_BITS_PER_STEP: usize = 20;
const THRESHOLD_BASE: usize = 2;

/// Mismatches one alignment attempt may absorb before it is abandoned.
pub fn mismatch_threshold(smaller_len: usize) -> usize {
    smaller_len / THRESHOLD_BITS_PER_STEP + THRESHOLD_BASE
}

/// A successful alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alignment {
    /// Attempts abandoned before the successful one.
    pub restarts: usize,
}

impl Alignment {
    /// Offset score in seconds, one restart per tenth of a second.
    pub fn score_seconds(&self) -> f32 {
        self.restarts as f32 / WINDOWS_PER_SECOND as f32
    }
}

/// Which input `align_pair` treated as the larger sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Larger {
    First,
    Second,
}

impl Larger {
    /// The longer fingerprint is the larger one; `first` wins ties.
    pub fn of(first: &TrendFingerprint, second: &TrendFingerprint) -> Self {
        if second.len() > first.len() {
            Larger::Second
        } else {
            Larger::First
        }
    }
}

/// Align two fingerprints, treating the longer one as the larger sequence.
pub fn align_pair(
    first: &TrendFingerprint,
    second: &TrendFingerprint,
) -> (Larger, Option<Alignment>) {
    match Larger::of(first, second) {
        Larger::Second => (Larger::Second, align(second, first)),
        Larger::First => (Larger::First, align(first, second)),
    }
}

#[derive(Debug, Default)]
struct Walk {
    /// Position in `larger` where the live attempt consumed `smaller[0]`.
    attempt_start: usize,
    /// Bits of `smaller` consumed by the live attempt.
    matched: usize,
    exceptions: usize,
    restarts: usize,
    alive: bool,
}

impl Walk {
    fn abandon(&mut self, cursor: usize) -> usize {
        self.restarts += 1;
        let next = if self.alive {
            self.attempt_start + 1
        } else {
            cursor + 1
        };
        self.matched = 0;
        self.exceptions = 0;
        self.alive = false;
        next
    }
}

/// Look for `smaller` inside `larger`, in order, with bounded mismatches.
///
/// Each attempt walks both sequences in lockstep. A disagreeing bit is
/// absorbed while the attempt has used fewer than [`mismatch_threshold`]
/// exceptions; past that the attempt is abandoned, counted as a restart, and
/// the next attempt begins one bit after where it started. Reaching the last
/// bit of `larger` with more than one bit of `smaller` left fails the whole
/// search. An empty `smaller` only matches an empty `larger`.
pub fn align(larger: &TrendFingerprint, smaller: &TrendFingerprint) -> Option<Alignment> {
    let (larger, smaller) = (larger.bits(), smaller.bits());
    if smaller.is_empty() {
        return larger.is_empty().then_some(Alignment { restarts: 0 });
    }

    let threshold = mismatch_threshold(smaller.len());
    let last = larger.len().saturating_sub(1);
    let mut walk = Walk::default();
    let mut cursor = 0usize;

    while cursor < larger.len() && walk.matched < smaller.len() {
        if cursor == last && walk.matched + 1 < smaller.len() {
            walk.alive = false;
            break;
        }
        let agrees = larger[cursor] == smaller[walk.matched];
        if agrees || walk.exceptions < threshold {
            if walk.matched == 0 {
                walk.attempt_start = cursor;
            }
            if !agrees {
                walk.exceptions += 1;
            }
            walk.matched += 1;
            walk.alive = true;
            cursor += 1;
        } else {
            cursor = walk.abandon(cursor);
        }
    }

    (walk.alive && walk.matched == smaller.len()).then_some(Alignment {
        restarts: walk.restarts,
    })
}
