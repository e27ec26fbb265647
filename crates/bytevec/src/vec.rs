//! The type-erased growable vector.
//!
//! [`ByteVec`] stores fixed-size elements whose size is only known at
//! runtime. Elements go in and come out as raw byte slices of exactly
//! `elem_size` bytes; element `i` occupies bytes
//! `[i * elem_size, (i + 1) * elem_size)` of the buffer, with no gaps.
//!
//! Every operation validates its preconditions and performs any growth
//! before moving a single byte, so an `Err` always leaves the vector
//! unchanged.

use std::fmt;

use bytevec_core::{VecConfig, VecError};

use crate::alloc::{Allocator, SystemAllocator};
use crate::raw::RawBuffer;

/// A contiguous, growable buffer of runtime-sized elements.
///
/// Parameterised by the [`Allocator`] used for every buffer lifecycle
/// call. The allocator and the element size are fixed at construction.
///
/// Mutation requires `&mut self`; there is no interior locking. After
/// [`destroy`](ByteVec::destroy) the vector owns no memory and every
/// mutating operation returns [`VecError::Destroyed`].
pub struct ByteVec<A: Allocator = SystemAllocator> {
    raw: RawBuffer<A>,
    len: usize,
    config: VecConfig,
}

impl ByteVec<SystemAllocator> {
    /// Create an empty vector on the platform allocator with the default
    /// initial capacity.
    pub fn new(elem_size: usize) -> Result<Self, VecError> {
        Self::with_allocator(SystemAllocator, elem_size)
    }
}

impl<A: Allocator> ByteVec<A> {
    /// Create an empty vector whose buffer is managed by `alloc`.
    pub fn with_allocator(alloc: A, elem_size: usize) -> Result<Self, VecError> {
        Self::with_config(alloc, VecConfig::new(), elem_size)
    }

    /// Create an empty vector with an explicit growth policy.
    ///
    /// Allocates `config.initial_capacity` slots up front.
    pub fn with_config(alloc: A, config: VecConfig, elem_size: usize) -> Result<Self, VecError> {
        config.validate()?;
        let raw = RawBuffer::allocate(alloc, config.initial_capacity, elem_size)?;
        Ok(Self {
            raw,
            len: 0,
            config,
        })
    }

    // ── Accessors ──────────────────────────────────────────────

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the vector holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of element slots currently allocated.
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Size of one element in bytes.
    pub fn elem_size(&self) -> usize {
        self.raw.elem_size()
    }

    /// Whether [`destroy`](ByteVec::destroy) has released the buffer.
    pub fn is_destroyed(&self) -> bool {
        self.raw.is_released()
    }

    /// The growth policy this vector was built with.
    pub fn config(&self) -> &VecConfig {
        &self.config
    }

    /// The allocator backing this vector.
    pub fn allocator(&self) -> &A {
        self.raw.allocator()
    }

    /// Byte offset of slot `index` within the buffer, or `None` if it
    /// overflows `usize`.
    pub fn byte_offset(&self, index: usize) -> Option<usize> {
        index.checked_mul(self.elem_size())
    }

    /// Bytes of the element at `index`, or `None` if out of range.
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        if index >= self.len {
            return None;
        }
        let es = self.elem_size();
        Some(&self.raw.bytes()[index * es..(index + 1) * es])
    }

    /// Mutable bytes of the element at `index`, or `None` if out of range.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut [u8]> {
        if index >= self.len {
            return None;
        }
        let es = self.elem_size();
        Some(&mut self.raw.bytes_mut()[index * es..(index + 1) * es])
    }

    /// The live elements as one contiguous byte slice (`len * elem_size` bytes).
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw.bytes()[..self.len * self.elem_size()]
    }

    /// Mutable view of the live elements.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        let end = self.len * self.elem_size();
        &mut self.raw.bytes_mut()[..end]
    }

    // ── Capacity management ────────────────────────────────────

    /// Grow geometrically until the capacity is at least `target`.
    ///
    /// The capacity is multiplied by the growth factor one step at a time,
    /// so the result is always `capacity * factor^k` for the smallest
    /// sufficient `k`. A no-op if the capacity already covers `target`.
    pub fn grow(&mut self, target: usize) -> Result<(), VecError> {
        self.ensure_live()?;
        let current = self.capacity();
        let new_capacity =
            self.config
                .grown_capacity(current, target)
                .ok_or(VecError::CapacityOverflow {
                    capacity: target,
                    elem_size: self.elem_size(),
                })?;
        if new_capacity == current {
            return Ok(());
        }
        self.raw.reallocate(new_capacity)
    }

    /// Set the capacity to exactly `new_capacity` slots.
    ///
    /// Destructive: shrinking below the current length discards the
    /// trailing elements, and the length is clamped to the new capacity.
    pub fn resize(&mut self, new_capacity: usize) -> Result<(), VecError> {
        self.ensure_live()?;
        self.raw.reallocate(new_capacity)?;
        if self.len > new_capacity {
            tracing::debug!(
                old_len = self.len,
                new_len = new_capacity,
                "resize truncated live elements"
            );
            self.len = new_capacity;
        }
        Ok(())
    }

    /// Ensure at least `min_capacity` slots, growing to exactly that value
    /// in a single step if needed.
    pub fn reserve(&mut self, min_capacity: usize) -> Result<(), VecError> {
        self.ensure_live()?;
        if self.capacity() >= min_capacity {
            return Ok(());
        }
        self.resize(min_capacity)
    }

    // ── End operations ─────────────────────────────────────────

    /// Append one element. Amortised O(1).
    pub fn push(&mut self, element: &[u8]) -> Result<(), VecError> {
        self.ensure_live()?;
        self.check_element(element.len())?;
        let new_len = self.extended_len(1)?;
        self.grow(new_len)?;
        let slot = self.len;
        self.slot_mut(slot).copy_from_slice(element);
        self.len = new_len;
        Ok(())
    }

    /// Copy the last element into `out` and remove it.
    pub fn pop(&mut self, out: &mut [u8]) -> Result<(), VecError> {
        self.ensure_live()?;
        self.check_element(out.len())?;
        if self.len == 0 {
            return Err(VecError::EmptyContainer);
        }
        let last = self.len - 1;
        out.copy_from_slice(self.slot(last));
        self.len = last;
        Ok(())
    }

    // ── Bulk append ────────────────────────────────────────────

    /// Append every element of `from`, leaving `from` untouched.
    ///
    /// Capacity is grown to cover `self.capacity() + from.capacity()`,
    /// sized by the source's capacity rather than its length.
    pub fn append_vec<B: Allocator>(&mut self, from: &ByteVec<B>) -> Result<(), VecError> {
        self.ensure_live()?;
        self.check_source(from)?;
        let target = self.capacity().checked_add(from.capacity()).ok_or(
            VecError::CapacityOverflow {
                capacity: usize::MAX,
                elem_size: self.elem_size(),
            },
        )?;
        let new_len = self.extended_len(from.len)?;
        self.grow(target)?;
        let start = self.len * self.elem_size();
        let src = from.as_bytes();
        self.raw.bytes_mut()[start..start + src.len()].copy_from_slice(src);
        self.len = new_len;
        Ok(())
    }

    /// Append `count` elements packed contiguously in `elements`.
    ///
    /// `elements` must be exactly `count * elem_size` bytes.
    pub fn append_slice(&mut self, elements: &[u8], count: usize) -> Result<(), VecError> {
        self.ensure_live()?;
        let expected = count
            .checked_mul(self.elem_size())
            .ok_or(VecError::CapacityOverflow {
                capacity: count,
                elem_size: self.elem_size(),
            })?;
        if elements.len() != expected {
            return Err(VecError::ElementSizeMismatch {
                expected,
                actual: elements.len(),
            });
        }
        let new_len = self.extended_len(count)?;
        self.grow(new_len)?;
        let start = self.len * self.elem_size();
        self.raw.bytes_mut()[start..start + expected].copy_from_slice(elements);
        self.len = new_len;
        Ok(())
    }

    // ── Insertion ──────────────────────────────────────────────

    /// Insert `element` at `index`, shifting later elements right.
    ///
    /// Preserves order. `index` may equal `len()` to append. O(len - index).
    pub fn insert(&mut self, element: &[u8], index: usize) -> Result<(), VecError> {
        self.ensure_live()?;
        self.check_element(element.len())?;
        self.check_insert_index(index)?;
        let new_len = self.extended_len(1)?;
        self.grow(new_len)?;

        let es = self.elem_size();
        let len = self.len;
        tracing::trace!(index, shifted = len - index, "ordered insert");
        self.raw
            .bytes_mut()
            .copy_within(index * es..len * es, (index + 1) * es);
        self.slot_mut(index).copy_from_slice(element);
        self.len = new_len;
        Ok(())
    }

    /// Insert `element` at `index` by moving the current occupant to the end.
    ///
    /// Does not preserve order. O(1). The length grows by one, exactly as
    /// with [`insert`](ByteVec::insert).
    pub fn insert_fast(&mut self, element: &[u8], index: usize) -> Result<(), VecError> {
        self.ensure_live()?;
        self.check_element(element.len())?;
        self.check_insert_index(index)?;
        let new_len = self.extended_len(1)?;
        self.grow(new_len)?;

        let es = self.elem_size();
        let len = self.len;
        if index < len {
            self.raw
                .bytes_mut()
                .copy_within(index * es..(index + 1) * es, len * es);
        }
        self.slot_mut(index).copy_from_slice(element);
        self.len = new_len;
        Ok(())
    }

    /// Insert every element of `from` at `index`, preserving order.
    ///
    /// Elements at positions `>= index` shift right by `from.len()`.
    /// `index == len()` appends. `from` is left untouched.
    pub fn insert_vec<B: Allocator>(
        &mut self,
        from: &ByteVec<B>,
        index: usize,
    ) -> Result<(), VecError> {
        self.ensure_live()?;
        self.check_source(from)?;
        self.check_insert_index(index)?;
        let count = from.len;
        let new_len = self.extended_len(count)?;
        self.grow(new_len)?;

        let es = self.elem_size();
        let len = self.len;
        tracing::trace!(index, count, shifted = len - index, "ordered bulk insert");
        let bytes = self.raw.bytes_mut();
        bytes.copy_within(index * es..len * es, (index + count) * es);
        bytes[index * es..(index + count) * es].copy_from_slice(from.as_bytes());
        self.len = new_len;
        Ok(())
    }

    // ── Removal ────────────────────────────────────────────────

    /// Remove the element at `index`, shifting later elements left.
    ///
    /// Preserves order. O(len - index).
    pub fn remove(&mut self, index: usize) -> Result<(), VecError> {
        self.ensure_live()?;
        if index >= self.len {
            return Err(VecError::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        let es = self.elem_size();
        let len = self.len;
        tracing::trace!(index, shifted = len - index - 1, "ordered remove");
        self.raw
            .bytes_mut()
            .copy_within((index + 1) * es..len * es, index * es);
        self.len = len - 1;
        Ok(())
    }

    /// Remove the element at `index` by overwriting it with the last element.
    ///
    /// Does not preserve order. O(1).
    pub fn remove_fast(&mut self, index: usize) -> Result<(), VecError> {
        self.ensure_live()?;
        if self.len == 0 {
            return Err(VecError::EmptyContainer);
        }
        if index >= self.len {
            return Err(VecError::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        let es = self.elem_size();
        let last = self.len - 1;
        if index != last {
            self.raw
                .bytes_mut()
                .copy_within(last * es..(last + 1) * es, index * es);
        }
        self.len = last;
        Ok(())
    }

    // ── Destruction ────────────────────────────────────────────

    /// Release the buffer and reset to the null state.
    ///
    /// Calling this again is a no-op.
    pub fn destroy(&mut self) {
        if self.raw.release() {
            self.len = 0;
        }
    }

    // ── Internal helpers ───────────────────────────────────────

    fn ensure_live(&self) -> Result<(), VecError> {
        if self.is_destroyed() {
            return Err(VecError::Destroyed);
        }
        Ok(())
    }

    fn check_element(&self, actual: usize) -> Result<(), VecError> {
        let expected = self.elem_size();
        if actual != expected {
            return Err(VecError::ElementSizeMismatch { expected, actual });
        }
        Ok(())
    }

    fn check_source<B: Allocator>(&self, from: &ByteVec<B>) -> Result<(), VecError> {
        if from.is_destroyed() {
            return Err(VecError::Destroyed);
        }
        self.check_element(from.elem_size())
    }

    fn check_insert_index(&self, index: usize) -> Result<(), VecError> {
        if index > self.len {
            return Err(VecError::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        Ok(())
    }

    fn extended_len(&self, extra: usize) -> Result<usize, VecError> {
        self.len
            .checked_add(extra)
            .ok_or(VecError::CapacityOverflow {
                capacity: usize::MAX,
                elem_size: self.elem_size(),
            })
    }

    fn slot(&self, index: usize) -> &[u8] {
        let es = self.elem_size();
        &self.raw.bytes()[index * es..(index + 1) * es]
    }

    fn slot_mut(&mut self, index: usize) -> &mut [u8] {
        let es = self.elem_size();
        &mut self.raw.bytes_mut()[index * es..(index + 1) * es]
    }
}

impl<A: Allocator> Drop for ByteVec<A> {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl<A: Allocator> fmt::Debug for ByteVec<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteVec")
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .field("elem_size", &self.elem_size())
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ints(values: &[u32]) -> ByteVec {
        let mut v = ByteVec::new(4).unwrap();
        for x in values {
            v.push(&x.to_ne_bytes()).unwrap();
        }
        v
    }

    fn read(v: &ByteVec) -> Vec<u32> {
        v.as_bytes()
            .chunks_exact(4)
            .map(|c| u32::from_ne_bytes(c.try_into().unwrap()))
            .collect()
    }

    #[test]
    fn new_has_default_capacity() {
        let v = ByteVec::new(4).unwrap();
        assert_eq!(v.len(), 0);
        assert_eq!(v.capacity(), VecConfig::DEFAULT_INITIAL_CAPACITY);
        assert_eq!(v.elem_size(), 4);
        assert!(v.is_empty());
    }

    #[test]
    fn invalid_config_rejected() {
        let config = VecConfig::new().with_growth_factor(1);
        let err = ByteVec::with_config(SystemAllocator, config, 4).unwrap_err();
        assert!(matches!(err, VecError::InvalidConfig { .. }));
    }

    #[test]
    fn push_then_get() {
        let v = ints(&[4]);
        assert_eq!(v.get(0), Some(&4u32.to_ne_bytes()[..]));
        assert_eq!(v.get(1), None);
    }

    #[test]
    fn push_wrong_size_rejected() {
        let mut v = ByteVec::new(4).unwrap();
        let err = v.push(&[1, 2]).unwrap_err();
        assert_eq!(
            err,
            VecError::ElementSizeMismatch {
                expected: 4,
                actual: 2
            }
        );
        assert_eq!(v.len(), 0);
    }

    #[test]
    fn pop_returns_reverse_order() {
        let mut v = ints(&[1, 2, 3]);
        let mut out = [0u8; 4];
        for expected in [3u32, 2, 1] {
            v.pop(&mut out).unwrap();
            assert_eq!(u32::from_ne_bytes(out), expected);
        }
        assert!(v.is_empty());
    }

    #[test]
    fn pop_empty_is_error() {
        let mut v = ByteVec::new(4).unwrap();
        let mut out = [0u8; 4];
        assert_eq!(v.pop(&mut out).unwrap_err(), VecError::EmptyContainer);
        assert_eq!(v.len(), 0);
    }

    #[test]
    fn push_past_capacity_doubles() {
        let config = VecConfig::new().with_initial_capacity(2);
        let mut v = ByteVec::with_config(SystemAllocator, config, 1).unwrap();
        for i in 0..5u8 {
            v.push(&[i]).unwrap();
        }
        assert_eq!(v.capacity(), 8);
        assert_eq!(v.as_bytes(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn grow_is_geometric() {
        let mut v = ByteVec::new(4).unwrap();
        v.grow(65).unwrap();
        assert_eq!(v.capacity(), 128);
        v.grow(100).unwrap();
        assert_eq!(v.capacity(), 128);
        v.grow(1000).unwrap();
        assert_eq!(v.capacity(), 1024);
    }

    #[test]
    fn reserve_is_exact() {
        let mut v = ByteVec::new(4).unwrap();
        v.reserve(10).unwrap();
        assert_eq!(v.capacity(), 64);
        v.reserve(100).unwrap();
        assert_eq!(v.capacity(), 100);
    }

    #[test]
    fn resize_shrink_clamps_len() {
        let mut v = ints(&[0, 1, 2, 3, 4]);
        v.resize(3).unwrap();
        assert_eq!(v.capacity(), 3);
        assert_eq!(v.len(), 3);
        assert_eq!(read(&v), vec![0, 1, 2]);
    }

    #[test]
    fn resize_to_zero_then_push() {
        let mut v = ints(&[7]);
        v.resize(0).unwrap();
        assert_eq!(v.len(), 0);
        assert_eq!(v.capacity(), 0);
        v.push(&9u32.to_ne_bytes()).unwrap();
        assert_eq!(v.capacity(), 1);
        assert_eq!(read(&v), vec![9]);
    }

    #[test]
    fn insert_preserves_order() {
        let mut v = ints(&[0, 1, 4, 5]);
        v.insert(&2u32.to_ne_bytes(), 2).unwrap();
        v.insert(&3u32.to_ne_bytes(), 3).unwrap();
        assert_eq!(read(&v), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn insert_at_ends() {
        let mut v = ints(&[1, 2]);
        v.insert(&0u32.to_ne_bytes(), 0).unwrap();
        v.insert(&3u32.to_ne_bytes(), 3).unwrap();
        assert_eq!(read(&v), vec![0, 1, 2, 3]);
    }

    #[test]
    fn insert_past_len_rejected() {
        let mut v = ints(&[1]);
        let err = v.insert(&0u32.to_ne_bytes(), 2).unwrap_err();
        assert_eq!(err, VecError::IndexOutOfRange { index: 2, len: 1 });
        assert_eq!(read(&v), vec![1]);
    }

    #[test]
    fn insert_fast_moves_occupant_to_end() {
        let mut v = ints(&[0, 1, 2]);
        v.insert_fast(&9u32.to_ne_bytes(), 1).unwrap();
        assert_eq!(v.len(), 4);
        assert_eq!(read(&v), vec![0, 9, 2, 1]);
    }

    #[test]
    fn insert_fast_at_len_appends() {
        let mut v = ints(&[0]);
        v.insert_fast(&5u32.to_ne_bytes(), 1).unwrap();
        assert_eq!(read(&v), vec![0, 5]);
    }

    #[test]
    fn insert_fast_rejects_index_past_len() {
        let mut v = ints(&[1, 2]);
        let err = v.insert_fast(&0u32.to_ne_bytes(), 3).unwrap_err();
        assert_eq!(err, VecError::IndexOutOfRange { index: 3, len: 2 });
        assert_eq!(read(&v), vec![1, 2]);
    }

    #[test]
    fn insert_vec_in_middle() {
        let mut into = ints(&[0, 1, 4, 5]);
        let from = ints(&[2, 3]);
        into.insert_vec(&from, 2).unwrap();
        assert_eq!(into.len(), 6);
        assert_eq!(read(&into), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(read(&from), vec![2, 3]);
    }

    #[test]
    fn insert_vec_into_empty() {
        let mut into = ints(&[]);
        let from = ints(&[1, 2]);
        into.insert_vec(&from, 0).unwrap();
        assert_eq!(read(&into), vec![1, 2]);
    }

    #[test]
    fn insert_vec_size_mismatch() {
        let mut into = ints(&[1]);
        let from = ByteVec::new(8).unwrap();
        let err = into.insert_vec(&from, 0).unwrap_err();
        assert_eq!(
            err,
            VecError::ElementSizeMismatch {
                expected: 4,
                actual: 8
            }
        );
    }

    #[test]
    fn remove_preserves_order() {
        let mut v = ints(&[0, 1, 2, 3]);
        v.remove(1).unwrap();
        assert_eq!(v.len(), 3);
        assert_eq!(read(&v), vec![0, 2, 3]);
    }

    #[test]
    fn remove_last_index() {
        let mut v = ints(&[0, 1, 2]);
        v.remove(2).unwrap();
        assert_eq!(read(&v), vec![0, 1]);
    }

    #[test]
    fn remove_out_of_range() {
        let mut v = ints(&[]);
        assert_eq!(
            v.remove(0).unwrap_err(),
            VecError::IndexOutOfRange { index: 0, len: 0 }
        );
    }

    #[test]
    fn remove_fast_swaps_last_in() {
        let mut v = ints(&[0, 1, 2, 3]);
        v.remove_fast(0).unwrap();
        assert_eq!(read(&v), vec![3, 1, 2]);
    }

    #[test]
    fn remove_fast_errors() {
        let mut v = ints(&[]);
        assert_eq!(v.remove_fast(0).unwrap_err(), VecError::EmptyContainer);
        let mut v = ints(&[1]);
        assert_eq!(
            v.remove_fast(1).unwrap_err(),
            VecError::IndexOutOfRange { index: 1, len: 1 }
        );
    }

    #[test]
    fn append_vec_sizes_by_source_capacity() {
        let mut into = ints(&[0, 1]);
        let from = ints(&[2, 3, 4]);
        into.append_vec(&from).unwrap();
        assert_eq!(read(&into), vec![0, 1, 2, 3, 4]);
        assert_eq!(into.capacity(), 128);
        assert_eq!(read(&from), vec![2, 3, 4]);
    }

    #[test]
    fn append_slice_copies_all() {
        let mut v = ByteVec::new(4).unwrap();
        let src: Vec<u8> = (0u32..5).flat_map(|x| x.to_ne_bytes()).collect();
        v.append_slice(&src, 5).unwrap();
        assert_eq!(read(&v), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn append_slice_length_mismatch() {
        let mut v = ByteVec::new(4).unwrap();
        let err = v.append_slice(&[0u8; 7], 2).unwrap_err();
        assert_eq!(
            err,
            VecError::ElementSizeMismatch {
                expected: 8,
                actual: 7
            }
        );
    }

    #[test]
    fn destroy_is_idempotent() {
        let mut v = ints(&[1, 2]);
        v.destroy();
        assert!(v.is_destroyed());
        assert_eq!(v.len(), 0);
        assert_eq!(v.capacity(), 0);
        v.destroy();
        assert!(v.is_destroyed());
        assert_eq!(v.len(), 0);
        assert_eq!(v.capacity(), 0);
    }

    #[test]
    fn operations_after_destroy_fail() {
        let mut v = ints(&[1]);
        v.destroy();
        assert_eq!(v.push(&[0; 4]).unwrap_err(), VecError::Destroyed);
        assert_eq!(v.grow(100).unwrap_err(), VecError::Destroyed);
        assert_eq!(v.reserve(1).unwrap_err(), VecError::Destroyed);
        assert_eq!(v.remove_fast(0).unwrap_err(), VecError::Destroyed);
        assert!(v.get(0).is_none());
        assert!(v.as_bytes().is_empty());
    }

    #[test]
    fn zero_sized_elements() {
        let mut v = ByteVec::new(0).unwrap();
        for _ in 0..100 {
            v.push(&[]).unwrap();
        }
        assert_eq!(v.len(), 100);
        v.remove(50).unwrap();
        v.remove_fast(0).unwrap();
        assert_eq!(v.len(), 98);
        assert!(v.as_bytes().is_empty());
    }

    #[test]
    fn get_mut_writes_through() {
        let mut v = ints(&[1, 2]);
        v.get_mut(1).unwrap().copy_from_slice(&7u32.to_ne_bytes());
        assert_eq!(read(&v), vec![1, 7]);
    }

    #[test]
    fn byte_offset_scales_by_elem_size() {
        let v = ByteVec::new(12).unwrap();
        assert_eq!(v.byte_offset(0), Some(0));
        assert_eq!(v.byte_offset(3), Some(36));
        assert_eq!(v.byte_offset(usize::MAX), None);
    }

    #[derive(Clone, Debug)]
    enum Op {
        Push(u32),
        Pop,
        Insert(u32, usize),
        InsertFast(u32, usize),
        InsertVec(Vec<u32>, usize),
        Remove(usize),
        RemoveFast(usize),
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            any::<u32>().prop_map(Op::Push),
            Just(Op::Pop),
            (any::<u32>(), 0usize..64).prop_map(|(v, i)| Op::Insert(v, i)),
            (any::<u32>(), 0usize..64).prop_map(|(v, i)| Op::InsertFast(v, i)),
            (proptest::collection::vec(any::<u32>(), 0..8), 0usize..64)
                .prop_map(|(xs, i)| Op::InsertVec(xs, i)),
            (0usize..64).prop_map(Op::Remove),
            (0usize..64).prop_map(Op::RemoveFast),
        ]
    }

    proptest! {
        #[test]
        fn matches_vec_model(ops in proptest::collection::vec(arb_op(), 0..200)) {
            let config = VecConfig::new().with_initial_capacity(1);
            let mut v = ByteVec::with_config(SystemAllocator, config, 4).unwrap();
            let mut model: Vec<u32> = Vec::new();
            let mut out = [0u8; 4];

            for op in ops {
                match op {
                    Op::Push(x) => {
                        v.push(&x.to_ne_bytes()).unwrap();
                        model.push(x);
                    }
                    Op::Pop => match model.pop() {
                        Some(x) => {
                            v.pop(&mut out).unwrap();
                            prop_assert_eq!(u32::from_ne_bytes(out), x);
                        }
                        None => {
                            prop_assert_eq!(v.pop(&mut out), Err(VecError::EmptyContainer));
                        }
                    },
                    Op::Insert(x, i) => {
                        if i <= model.len() {
                            v.insert(&x.to_ne_bytes(), i).unwrap();
                            model.insert(i, x);
                        } else {
                            prop_assert!(v.insert(&x.to_ne_bytes(), i).is_err());
                        }
                    }
                    Op::InsertFast(x, i) => {
                        if i <= model.len() {
                            v.insert_fast(&x.to_ne_bytes(), i).unwrap();
                            if i < model.len() {
                                model.push(model[i]);
                                model[i] = x;
                            } else {
                                model.push(x);
                            }
                        } else {
                            prop_assert_eq!(
                                v.insert_fast(&x.to_ne_bytes(), i),
                                Err(VecError::IndexOutOfRange { index: i, len: model.len() })
                            );
                        }
                    }
                    Op::InsertVec(xs, i) => {
                        let from = ints(&xs);
                        if i <= model.len() {
                            v.insert_vec(&from, i).unwrap();
                            model.splice(i..i, xs.iter().copied());
                        } else {
                            prop_assert!(v.insert_vec(&from, i).is_err());
                        }
                        prop_assert_eq!(read(&from), xs);
                    }
                    Op::Remove(i) => {
                        if i < model.len() {
                            v.remove(i).unwrap();
                            model.remove(i);
                        } else {
                            prop_assert!(v.remove(i).is_err());
                        }
                    }
                    Op::RemoveFast(i) => {
                        if i < model.len() {
                            v.remove_fast(i).unwrap();
                            model.swap_remove(i);
                        } else {
                            prop_assert!(v.remove_fast(i).is_err());
                        }
                    }
                }
                prop_assert_eq!(read(&v), model.clone());
                prop_assert!(v.len() <= v.capacity());
            }
        }
    }
}
