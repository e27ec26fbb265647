//! C-compatible status codes.
//!
//! [`BytevecStatus`] is a `repr(i32)` enum covering every failure a C
//! caller can observe. Each [`VecError`] maps onto exactly one code.

use bytevec::VecError;

/// C-compatible status code returned by all FFI functions.
///
/// `Ok` = 0, all errors are negative. Values are ABI-stable.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BytevecStatus {
    /// Success.
    Ok = 0,
    /// Handle is invalid or the vector was already destroyed.
    InvalidHandle = -1,
    /// A required pointer is null, or two handles alias where they must not.
    InvalidArgument = -2,
    /// The allocator returned null.
    OutOfMemory = -3,
    /// Requested capacity does not fit in the address space.
    CapacityOverflow = -4,
    /// Index outside the operation's valid range.
    IndexOutOfRange = -5,
    /// `pop` or `remove_fast` on an empty vector.
    EmptyContainer = -6,
    /// Allocator set with a null function pointer.
    InvalidAllocatorSet = -7,
    /// Element sizes of two vectors differ.
    ElementSizeMismatch = -8,
    /// Growth configuration rejected.
    InvalidConfig = -9,
    /// The vector's buffer has been released.
    Destroyed = -10,
    /// Internal error (e.g. poisoned mutex after a prior panic).
    InternalError = -20,
    /// A Rust panic was caught at the FFI boundary.
    Panicked = -128,
}

impl From<&VecError> for BytevecStatus {
    fn from(e: &VecError) -> Self {
        match e {
            VecError::OutOfMemory { .. } => BytevecStatus::OutOfMemory,
            VecError::CapacityOverflow { .. } => BytevecStatus::CapacityOverflow,
            VecError::IndexOutOfRange { .. } => BytevecStatus::IndexOutOfRange,
            VecError::EmptyContainer => BytevecStatus::EmptyContainer,
            VecError::InvalidAllocatorSet { .. } => BytevecStatus::InvalidAllocatorSet,
            VecError::ElementSizeMismatch { .. } => BytevecStatus::ElementSizeMismatch,
            VecError::InvalidConfig { .. } => BytevecStatus::InvalidConfig,
            VecError::Destroyed => BytevecStatus::Destroyed,
        }
    }
}

impl BytevecStatus {
    /// Collapse an operation result into a C status code.
    pub(crate) fn code(result: Result<(), VecError>) -> i32 {
        match result {
            Ok(()) => BytevecStatus::Ok as i32,
            Err(e) => {
                tracing::debug!(error = %e, "ffi call failed");
                BytevecStatus::from(&e) as i32
            }
        }
    }
}
