//! Typed accessor over [`ByteVec`].
//!
//! [`TypedVec<T>`] fixes the element size to `size_of::<T>()` and converts
//! at the call boundary, so callers that do know their element type get
//! type-checked `push`/`pop`/`get` while the storage and algorithms stay
//! the byte-level ones. `T: Pod` guarantees every byte pattern in the
//! buffer is a valid `T`. Reads are unaligned, so allocators weaker than
//! [`BUFFER_ALIGN`](crate::alloc::BUFFER_ALIGN) are still sound.

use std::fmt;
use std::marker::PhantomData;

use bytemuck::Pod;
use bytevec_core::{VecConfig, VecError};

use crate::alloc::{Allocator, SystemAllocator};
use crate::vec::ByteVec;

/// A [`ByteVec`] whose elements are `T`.
pub struct TypedVec<T: Pod, A: Allocator = SystemAllocator> {
    raw: ByteVec<A>,
    _marker: PhantomData<T>,
}

impl<T: Pod> TypedVec<T, SystemAllocator> {
    /// Create an empty vector on the platform allocator.
    pub fn new() -> Result<Self, VecError> {
        Self::with_allocator(SystemAllocator)
    }
}

impl<T: Pod, A: Allocator> TypedVec<T, A> {
    /// Create an empty vector on `alloc`.
    pub fn with_allocator(alloc: A) -> Result<Self, VecError> {
        Self::with_config(alloc, VecConfig::new())
    }

    /// Create an empty vector with an explicit growth policy.
    pub fn with_config(alloc: A, config: VecConfig) -> Result<Self, VecError> {
        Ok(Self {
            raw: ByteVec::with_config(alloc, config, std::mem::size_of::<T>())?,
            _marker: PhantomData,
        })
    }

    /// The untyped vector underneath.
    pub fn as_raw(&self) -> &ByteVec<A> {
        &self.raw
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Whether the vector holds no elements.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Number of element slots currently allocated.
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Copy of the element at `index`.
    pub fn get(&self, index: usize) -> Option<T> {
        self.raw.get(index).map(bytemuck::pod_read_unaligned)
    }

    /// Overwrite the element at `index`.
    pub fn set(&mut self, index: usize, value: T) -> Result<(), VecError> {
        let len = self.raw.len();
        let slot = self
            .raw
            .get_mut(index)
            .ok_or(VecError::IndexOutOfRange { index, len })?;
        slot.copy_from_slice(bytemuck::bytes_of(&value));
        Ok(())
    }

    /// Copy the live elements out into a `Vec`.
    pub fn to_vec(&self) -> Vec<T> {
        (0..self.len()).filter_map(|i| self.get(i)).collect()
    }

    /// See [`ByteVec::grow`].
    pub fn grow(&mut self, target: usize) -> Result<(), VecError> {
        self.raw.grow(target)
    }

    /// See [`ByteVec::resize`].
    pub fn resize(&mut self, new_capacity: usize) -> Result<(), VecError> {
        self.raw.resize(new_capacity)
    }

    /// See [`ByteVec::reserve`].
    pub fn reserve(&mut self, min_capacity: usize) -> Result<(), VecError> {
        self.raw.reserve(min_capacity)
    }

    /// Append one element.
    pub fn push(&mut self, value: T) -> Result<(), VecError> {
        self.raw.push(bytemuck::bytes_of(&value))
    }

    /// Remove and return the last element.
    pub fn pop(&mut self) -> Result<T, VecError> {
        let mut out = T::zeroed();
        self.raw.pop(bytemuck::bytes_of_mut(&mut out))?;
        Ok(out)
    }

    /// Append a slice of elements.
    pub fn extend_from_slice(&mut self, values: &[T]) -> Result<(), VecError> {
        self.raw
            .append_slice(bytemuck::cast_slice(values), values.len())
    }

    /// Append every element of `from`. See [`ByteVec::append_vec`].
    pub fn append_vec<B: Allocator>(&mut self, from: &TypedVec<T, B>) -> Result<(), VecError> {
        self.raw.append_vec(&from.raw)
    }

    /// Ordered insert. See [`ByteVec::insert`].
    pub fn insert(&mut self, value: T, index: usize) -> Result<(), VecError> {
        self.raw.insert(bytemuck::bytes_of(&value), index)
    }

    /// Unordered insert. See [`ByteVec::insert_fast`].
    pub fn insert_fast(&mut self, value: T, index: usize) -> Result<(), VecError> {
        self.raw.insert_fast(bytemuck::bytes_of(&value), index)
    }

    /// Ordered bulk insert. See [`ByteVec::insert_vec`].
    pub fn insert_vec<B: Allocator>(
        &mut self,
        from: &TypedVec<T, B>,
        index: usize,
    ) -> Result<(), VecError> {
        self.raw.insert_vec(&from.raw, index)
    }

    /// Ordered remove. See [`ByteVec::remove`].
    pub fn remove(&mut self, index: usize) -> Result<(), VecError> {
        self.raw.remove(index)
    }

    /// Unordered remove. See [`ByteVec::remove_fast`].
    pub fn remove_fast(&mut self, index: usize) -> Result<(), VecError> {
        self.raw.remove_fast(index)
    }

    /// Release the buffer. Idempotent.
    pub fn destroy(&mut self) {
        self.raw.destroy();
    }
}

impl<T: Pod + fmt::Debug, A: Allocator> fmt::Debug for TypedVec<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.to_vec()).finish()
    }
}
