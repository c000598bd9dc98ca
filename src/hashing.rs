//! String hashes used to derive probe sequences.
//!
//! Both functions are deterministic and unseeded from the caller's point of
//! view, so a key maps to the same probe sequence for a given capacity no
//! matter how many times the table has grown.

/// Fixed seed for [`hash1`].
pub const SEED: u32 = 0x1234_5678;

const MURMUR_M: u32 = 0x5bd1_e995;
const BERNSTEIN_INIT: u32 = 5381;

/// One-byte-at-a-time Murmur mix seeded with [`SEED`]. Picks the home slot.
#[inline]
pub fn hash1(key: &str) -> u32 {
    murmur_oaat(key.as_bytes(), SEED)
}

/// Bernstein (`h * 33 + b`) hash. Picks the double-hashing step.
///
/// Never returns zero.
#[inline]
pub fn hash2(key: &str) -> u32 {
    match bernstein(key.as_bytes()) {
        0 => 1,
        h => h,
    }
}

#[inline]
fn murmur_oaat(bytes: &[u8], seed: u32) -> u32 {
    bytes.iter().fold(seed, |mut h, &b| {
        // Bytes are mixed unsigned. A signed-char variant would sign-extend
        // bytes >= 0x80 and place non-ASCII keys differently; ASCII keys,
        // postal codes included, hash the same either way.
        h ^= u32::from(b);
        h = h.wrapping_mul(MURMUR_M);
        h ^ (h >> 15)
    })
}

#[inline]
fn bernstein(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .fold(BERNSTEIN_INIT, |h, &b| h.wrapping_mul(33).wrapping_add(u32::from(b)))
}
