//! Benchmark workloads for bytevec.
//!
//! - [`filled`]: a vector of `n` elements of a given size
//! - [`random_indices`]: deterministic index streams for positional
//!   insert/remove workloads, driven by a seeded ChaCha generator

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use bytevec::ByteVec;
use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Element size used by the fixed-size workloads (a 64-byte record).
pub const RECORD_SIZE: usize = 64;

/// Build a platform-allocated vector holding `n` elements of `elem_size`
/// bytes. Element `i` is filled with the byte `i as u8`.
///
/// # Panics
///
/// Panics if allocation fails.
pub fn filled(n: usize, elem_size: usize) -> ByteVec {
    let mut bytes = Vec::with_capacity(n * elem_size);
    for i in 0..n {
        bytes.extend(std::iter::repeat(i as u8).take(elem_size));
    }
    let mut v = ByteVec::new(elem_size).expect("bench vector allocation");
    v.append_slice(&bytes, n).expect("bench vector fill");
    v
}

/// Generate up to `count` indices for a vector whose length starts at
/// `start_len` and changes by `delta` after every operation (+1 for
/// inserts, -1 for removes). Each index is valid for the length at its
/// step: `0..=len` for inserts, `0..len` for removes.
///
/// Stops early once a remove stream has emptied the vector.
pub fn random_indices(start_len: usize, count: usize, delta: isize, seed: u64) -> Vec<usize> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut len = start_len;
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let bound = if delta > 0 { len + 1 } else { len };
        if bound == 0 {
            break;
        }
        out.push((rng.next_u64() % bound as u64) as usize);
        len = len.saturating_add_signed(delta);
    }
    out
}
