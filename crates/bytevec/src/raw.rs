//! Low-level buffer ownership.
//!
//! [`RawBuffer`] is the only place the crate touches raw pointers. It owns
//! one allocation of `capacity * elem_size` bytes obtained from an
//! [`Allocator`], zero-fills every byte it acquires, and hands out plain
//! byte slices over the whole capacity. Because no byte is ever left
//! uninitialised, all element shuffling above this layer is safe code.

#![allow(unsafe_code)]

use std::ptr::NonNull;

use bytevec_core::VecError;

use crate::alloc::Allocator;

/// An owned, zero-initialised byte buffer sized in element slots.
///
/// `ptr == None` is the destroyed state. The allocator never sees a
/// zero-byte request: an empty capacity is backed by a single byte.
pub(crate) struct RawBuffer<A: Allocator> {
    ptr: Option<NonNull<u8>>,
    /// Element slots backed by the allocation.
    capacity: usize,
    elem_size: usize,
    /// Actual size of the allocation handed out by `alloc`.
    alloc_bytes: usize,
    alloc: A,
}

// SAFETY: the buffer is exclusively owned; moving it to another thread
// moves the only handle to the allocation.
unsafe impl<A: Allocator + Send> Send for RawBuffer<A> {}
// SAFETY: `&RawBuffer` only permits reads of initialised bytes.
unsafe impl<A: Allocator + Sync> Sync for RawBuffer<A> {}

/// Byte size of `capacity` slots, rejecting anything past `isize::MAX`.
fn byte_len(capacity: usize, elem_size: usize) -> Result<usize, VecError> {
    capacity
        .checked_mul(elem_size)
        .filter(|&bytes| bytes <= isize::MAX as usize)
        .ok_or(VecError::CapacityOverflow {
            capacity,
            elem_size,
        })
}

impl<A: Allocator> RawBuffer<A> {
    /// Allocate a zeroed buffer of `capacity` slots.
    pub(crate) fn allocate(alloc: A, capacity: usize, elem_size: usize) -> Result<Self, VecError> {
        let bytes = byte_len(capacity, elem_size)?;
        let alloc_bytes = bytes.max(1);
        let ptr = alloc
            .allocate(alloc_bytes)
            .ok_or(VecError::OutOfMemory {
                requested: alloc_bytes,
            })?;
        // SAFETY: ptr is valid for writes of alloc_bytes (Allocator contract).
        unsafe { ptr.as_ptr().write_bytes(0, alloc_bytes) };
        tracing::debug!(capacity, elem_size, bytes = alloc_bytes, "buffer allocated");
        Ok(Self {
            ptr: Some(ptr),
            capacity,
            elem_size,
            alloc_bytes,
            alloc,
        })
    }

    /// Reallocate to exactly `new_capacity` slots.
    ///
    /// Leading contents are preserved; any newly acquired bytes are zeroed.
    /// On failure the buffer is left untouched.
    pub(crate) fn reallocate(&mut self, new_capacity: usize) -> Result<(), VecError> {
        let ptr = self.ptr.ok_or(VecError::Destroyed)?;
        let new_bytes = byte_len(new_capacity, self.elem_size)?.max(1);
        if new_bytes == self.alloc_bytes {
            self.capacity = new_capacity;
            return Ok(());
        }
        // SAFETY: ptr is our live allocation of alloc_bytes from self.alloc.
        let new_ptr = unsafe { self.alloc.reallocate(ptr, self.alloc_bytes, new_bytes) }
            .ok_or(VecError::OutOfMemory {
                requested: new_bytes,
            })?;
        if new_bytes > self.alloc_bytes {
            // SAFETY: new_ptr is valid for new_bytes; the tail past the old
            // size is in bounds.
            unsafe {
                new_ptr
                    .as_ptr()
                    .add(self.alloc_bytes)
                    .write_bytes(0, new_bytes - self.alloc_bytes)
            };
        }
        tracing::debug!(
            old_capacity = self.capacity,
            new_capacity,
            elem_size = self.elem_size,
            bytes = new_bytes,
            "buffer reallocated"
        );
        self.ptr = Some(new_ptr);
        self.capacity = new_capacity;
        self.alloc_bytes = new_bytes;
        Ok(())
    }

    /// Free the allocation and enter the destroyed state.
    ///
    /// Returns `false` if the buffer was already released.
    pub(crate) fn release(&mut self) -> bool {
        let Some(ptr) = self.ptr.take() else {
            return false;
        };
        // SAFETY: ptr is our live allocation of alloc_bytes; it was taken
        // out of `self.ptr` so it cannot be used again.
        unsafe { self.alloc.free(ptr, self.alloc_bytes) };
        tracing::debug!(
            capacity = self.capacity,
            bytes = self.alloc_bytes,
            "buffer released"
        );
        self.capacity = 0;
        self.alloc_bytes = 0;
        true
    }

    /// All `capacity * elem_size` bytes.
    ///
    /// Empty once released.
    pub(crate) fn bytes(&self) -> &[u8] {
        match self.ptr {
            // SAFETY: the allocation holds at least capacity * elem_size
            // bytes, all initialised (zeroed on acquisition), and is
            // borrowed immutably for the lifetime of &self.
            Some(ptr) => unsafe {
                std::slice::from_raw_parts(ptr.as_ptr(), self.capacity * self.elem_size)
            },
            None => &[],
        }
    }

    /// Mutable view of all `capacity * elem_size` bytes.
    pub(crate) fn bytes_mut(&mut self) -> &mut [u8] {
        match self.ptr {
            // SAFETY: as for `bytes`, with exclusive access through &mut self.
            Some(ptr) => unsafe {
                std::slice::from_raw_parts_mut(ptr.as_ptr(), self.capacity * self.elem_size)
            },
            None => &mut [],
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn elem_size(&self) -> usize {
        self.elem_size
    }

    pub(crate) fn is_released(&self) -> bool {
        self.ptr.is_none()
    }

    pub(crate) fn allocator(&self) -> &A {
        &self.alloc
    }
}

impl<A: Allocator> Drop for RawBuffer<A> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alloc::SystemAllocator;

    #[test]
    fn allocation_is_zeroed() {
        let buf = RawBuffer::allocate(SystemAllocator, 16, 4).unwrap();
        assert_eq!(buf.bytes().len(), 64);
        assert!(buf.bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn grow_preserves_prefix_and_zeroes_tail() {
        let mut buf = RawBuffer::allocate(SystemAllocator, 2, 4).unwrap();
        buf.bytes_mut().fill(0xFF);
        buf.reallocate(8).unwrap();
        assert_eq!(buf.capacity(), 8);
        assert!(buf.bytes()[..8].iter().all(|&b| b == 0xFF));
        assert!(buf.bytes()[8..].iter().all(|&b| b == 0));
    }

    #[test]
    fn shrink_keeps_leading_bytes() {
        let mut buf = RawBuffer::allocate(SystemAllocator, 4, 2).unwrap();
        buf.bytes_mut().copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
        buf.reallocate(2).unwrap();
        assert_eq!(buf.bytes(), &[1, 2, 3, 4]);
    }

    #[test]
    fn zero_capacity_is_backed_by_one_byte() {
        let mut buf = RawBuffer::allocate(SystemAllocator, 0, 8).unwrap();
        assert!(buf.bytes().is_empty());
        assert!(!buf.is_released());
        buf.reallocate(3).unwrap();
        assert_eq!(buf.bytes().len(), 24);
    }

    #[test]
    fn release_is_idempotent() {
        let mut buf = RawBuffer::allocate(SystemAllocator, 4, 4).unwrap();
        assert!(buf.release());
        assert!(!buf.release());
        assert!(buf.is_released());
        assert_eq!(buf.capacity(), 0);
        assert!(buf.bytes().is_empty());
    }

    #[test]
    fn reallocate_after_release_fails() {
        let mut buf = RawBuffer::allocate(SystemAllocator, 4, 4).unwrap();
        buf.release();
        assert_eq!(buf.reallocate(8).unwrap_err(), VecError::Destroyed);
    }

    #[test]
    fn oversized_capacity_is_overflow() {
        let err = RawBuffer::allocate(SystemAllocator, usize::MAX / 2, 4)
            .err()
            .unwrap();
        assert_eq!(
            err,
            VecError::CapacityOverflow {
                capacity: usize::MAX / 2,
                elem_size: 4
            }
        );
    }
}
