//! Element fixtures.
//!
//! Most scenarios store native-endian `i32`s. These helpers build such a
//! vector from a slice and read one back, so tests can compare against
//! plain `Vec<i32>` literals.

use bytevec::{Allocator, ByteVec};

/// A platform-allocated vector of `i32` holding `values` in order.
pub fn int_vec(values: &[i32]) -> ByteVec {
    let mut v = ByteVec::new(std::mem::size_of::<i32>()).expect("allocation failed in fixture");
    let bytes: Vec<u8> = values.iter().flat_map(|x| x.to_ne_bytes()).collect();
    v.append_slice(&bytes, values.len())
        .expect("append failed in fixture");
    v
}

/// Decode the live elements of an `i32` vector.
///
/// # Panics
///
/// Panics if the vector's element size is not 4.
pub fn read_ints<A: Allocator>(v: &ByteVec<A>) -> Vec<i32> {
    assert_eq!(v.elem_size(), 4, "read_ints needs 4-byte elements");
    v.as_bytes()
        .chunks_exact(4)
        .map(|c| i32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}
