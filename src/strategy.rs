//! Collision-resolution strategies.
//!
//! A strategy turns `(key, capacity)` into a [`ProbeSeq`]: the ordered list of
//! slot positions insert, lookup and delete visit. The sequence is recomputed
//! on every call and depends on nothing else, so insert and lookup always agree
//! on the path for the current capacity.

use crate::hashing::{hash1, hash2};

/// Probe-sequence generator selected at construction.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Strategy {
    /// `start = hash1 % cap`, `step = 1 + hash2 % (cap - 1)`.
    #[default]
    DoubleHashing,
    /// `start = hash1 % cap`, `step = 1`.
    LinearProbing,
}

impl Strategy {
    /// Probe sequence for `key` in a table of `capacity` slots.
    ///
    /// `capacity` must be non-zero.
    pub fn probe(self, key: &str, capacity: usize) -> ProbeSeq {
        debug_assert!(capacity > 0, "probe over an empty slot array");
        let start = hash1(key) as usize % capacity;
        let step = match self {
            Strategy::LinearProbing => 1,
            Strategy::DoubleHashing => double_hash_step(key, capacity),
        };
        ProbeSeq {
            pos: start,
            start,
            step,
            capacity,
            remaining: capacity,
        }
    }
}

fn double_hash_step(key: &str, capacity: usize) -> usize {
    if capacity <= 1 {
        return 1;
    }
    let step = 1 + hash2(key) as usize % (capacity - 1);
    if step == 0 || step >= capacity {
        1
    } else {
        step
    }
}

/// Iterator over at most `capacity` slot positions.
#[derive(Clone, Debug)]
pub struct ProbeSeq {
    pos: usize,
    start: usize,
    step: usize,
    capacity: usize,
    remaining: usize,
}

impl ProbeSeq {
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn step(&self) -> usize {
        self.step
    }
}

impl Iterator for ProbeSeq {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let pos = self.pos;
        self.pos = (self.pos + self.step) % self.capacity;
        Some(pos)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for ProbeSeq {}
