//! C-side allocator and growth configuration.
//!
//! A C caller supplies its allocator as a [`BytevecAllocatorSet`] of three
//! nullable function pointers. A set with any null member is rejected at
//! construction with `InvalidAllocatorSet` rather than crashing on first
//! use.

#![allow(unsafe_code)]

use std::ptr::NonNull;

use bytevec::alloc::{AllocFn, FreeFn, ReallocFn};
use bytevec::{Allocator, FnAllocatorSet, SystemAllocator, VecConfig, VecError};

/// Allocator functions supplied from C.
///
/// Each member follows the C standard library contract of its namesake.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct BytevecAllocatorSet {
    /// `malloc`-style allocate.
    pub alloc: Option<AllocFn>,
    /// `realloc`-style reallocate.
    pub realloc: Option<ReallocFn>,
    /// `free`-style release.
    pub free: Option<FreeFn>,
}

impl BytevecAllocatorSet {
    /// Validate the set into an allocator.
    ///
    /// # Safety
    ///
    /// Present members must form a malloc family (see [`FnAllocatorSet::new`]).
    pub(crate) unsafe fn into_allocator(self) -> Result<FnAllocatorSet, VecError> {
        // SAFETY: forwarded caller contract.
        unsafe { FnAllocatorSet::from_parts(self.alloc, self.realloc, self.free) }
    }
}

/// Growth configuration supplied from C.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BytevecConfig {
    /// Slots allocated at construction. Must be at least 1.
    pub initial_capacity: usize,
    /// Capacity multiplier per growth step. Must be at least 2.
    pub growth_factor: usize,
}

impl From<BytevecConfig> for VecConfig {
    fn from(c: BytevecConfig) -> Self {
        VecConfig::new()
            .with_initial_capacity(c.initial_capacity)
            .with_growth_factor(c.growth_factor)
    }
}

impl From<VecConfig> for BytevecConfig {
    fn from(c: VecConfig) -> Self {
        Self {
            initial_capacity: c.initial_capacity,
            growth_factor: c.growth_factor,
        }
    }
}

/// The allocator behind a C-owned vector: platform default or C-supplied.
#[derive(Clone, Copy, Debug)]
pub(crate) enum FfiAllocator {
    System(SystemAllocator),
    Custom(FnAllocatorSet),
}

// SAFETY: dispatches to one of two valid allocators.
unsafe impl Allocator for FfiAllocator {
    fn allocate(&self, size: usize) -> Option<NonNull<u8>> {
        match self {
            Self::System(a) => a.allocate(size),
            Self::Custom(a) => a.allocate(size),
        }
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_size: usize,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        // SAFETY: ptr was produced by the same variant (allocator is
        // immutable for the vector's lifetime).
        unsafe {
            match self {
                Self::System(a) => a.reallocate(ptr, old_size, new_size),
                Self::Custom(a) => a.reallocate(ptr, old_size, new_size),
            }
        }
    }

    unsafe fn free(&self, ptr: NonNull<u8>, size: usize) {
        // SAFETY: as for reallocate.
        unsafe {
            match self {
                Self::System(a) => a.free(ptr, size),
                Self::Custom(a) => a.free(ptr, size),
            }
        }
    }
}
