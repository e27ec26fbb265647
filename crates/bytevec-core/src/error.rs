//! Error types for the bytevec vector.
//!
//! Every fallible operation on a vector reports one of these variants.
//! Errors are detected before any element bytes move, so a failed call
//! leaves the vector exactly as it was.

use thiserror::Error;

/// Errors that can occur during vector operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum VecError {
    /// The allocator returned null for an allocate or reallocate request.
    #[error("allocation of {requested} bytes failed")]
    OutOfMemory {
        /// Number of bytes requested from the allocator.
        requested: usize,
    },
    /// The byte size of the requested capacity does not fit in `isize`.
    #[error("capacity overflow: {capacity} elements of {elem_size} bytes")]
    CapacityOverflow {
        /// Element count that was requested.
        capacity: usize,
        /// Size of one element in bytes.
        elem_size: usize,
    },
    /// An index outside the operation's valid range.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Length of the vector at the time of the call.
        len: usize,
    },
    /// `pop` or `remove_fast` on a vector with no elements.
    #[error("operation requires a non-empty vector")]
    EmptyContainer,
    /// An allocator set was supplied with one of its three functions missing.
    #[error("allocator set is missing its `{missing}` function")]
    InvalidAllocatorSet {
        /// Name of the missing member (`alloc`, `realloc` or `free`).
        missing: &'static str,
    },
    /// Raw element bytes whose length does not match the element size,
    /// or two vectors with different element sizes combined.
    #[error("element size mismatch: expected {expected} bytes, got {actual}")]
    ElementSizeMismatch {
        /// Byte length the vector expected.
        expected: usize,
        /// Byte length that was supplied.
        actual: usize,
    },
    /// A [`VecConfig`](crate::VecConfig) that cannot drive geometric growth.
    #[error("invalid vector config: {reason}")]
    InvalidConfig {
        /// Human-readable description of the problem.
        reason: String,
    },
    /// The vector has been destroyed and owns no buffer.
    #[error("vector has been destroyed")]
    Destroyed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_fields() {
        let e = VecError::IndexOutOfRange { index: 7, len: 3 };
        assert_eq!(e.to_string(), "index 7 out of range for length 3");

        let e = VecError::OutOfMemory { requested: 4096 };
        assert_eq!(e.to_string(), "allocation of 4096 bytes failed");

        let e = VecError::InvalidAllocatorSet { missing: "realloc" };
        assert_eq!(
            e.to_string(),
            "allocator set is missing its `realloc` function"
        );
    }

    #[test]
    fn errors_compare_by_value() {
        assert_eq!(VecError::EmptyContainer, VecError::EmptyContainer);
        assert_ne!(
            VecError::ElementSizeMismatch {
                expected: 4,
                actual: 8
            },
            VecError::ElementSizeMismatch {
                expected: 8,
                actual: 4
            }
        );
    }

    #[test]
    fn implements_std_error() {
        fn assert_error<E: std::error::Error + Send + Sync + 'static>(_: &E) {}
        assert_error(&VecError::Destroyed);
    }
}
