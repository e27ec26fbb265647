//! Injectable allocation primitives.
//!
//! A vector never talks to the global allocator directly: every buffer
//! lifecycle call goes through an [`Allocator`] held by value inside the
//! vector. [`SystemAllocator`] is the default. [`FnAllocatorSet`] is the
//! plain `alloc`/`realloc`/`free` function-pointer triple used by C
//! callers and by anything that wants malloc-style semantics.

#![allow(unsafe_code)]

use std::alloc::Layout;
use std::ptr::NonNull;

use bytevec_core::VecError;

/// Alignment every allocator must provide for returned buffers.
///
/// Matches the `max_align_t` guarantee of a C `malloc` on mainstream
/// 64-bit targets.
pub const BUFFER_ALIGN: usize = 16;

/// Buffer allocation capability.
///
/// Sizes are in bytes and always non-zero. Returned pointers must be
/// aligned to [`BUFFER_ALIGN`]. Returning `None` reports allocation
/// failure; the vector surfaces it as [`VecError::OutOfMemory`].
///
/// # Safety
///
/// Implementations must return pointers valid for reads and writes of
/// the requested size until passed to `reallocate` or `free`, and
/// `reallocate` must preserve the first `min(old_size, new_size)` bytes.
pub unsafe trait Allocator {
    /// Allocate `size` bytes.
    fn allocate(&self, size: usize) -> Option<NonNull<u8>>;

    /// Resize an allocation, preserving its leading contents.
    ///
    /// On failure the original allocation is left untouched.
    ///
    /// # Safety
    ///
    /// `ptr` must come from this allocator with current size `old_size`.
    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_size: usize,
        new_size: usize,
    ) -> Option<NonNull<u8>>;

    /// Release an allocation.
    ///
    /// # Safety
    ///
    /// `ptr` must come from this allocator with current size `size`, and
    /// must not be used afterwards.
    unsafe fn free(&self, ptr: NonNull<u8>, size: usize);
}

// SAFETY: forwards to the referenced allocator unchanged.
unsafe impl<A: Allocator + ?Sized> Allocator for &A {
    fn allocate(&self, size: usize) -> Option<NonNull<u8>> {
        (**self).allocate(size)
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_size: usize,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        // SAFETY: caller contract is forwarded verbatim.
        unsafe { (**self).reallocate(ptr, old_size, new_size) }
    }

    unsafe fn free(&self, ptr: NonNull<u8>, size: usize) {
        // SAFETY: caller contract is forwarded verbatim.
        unsafe { (**self).free(ptr, size) }
    }
}

/// The platform allocator, via `std::alloc`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SystemAllocator;

impl SystemAllocator {
    fn layout(size: usize) -> Option<Layout> {
        Layout::from_size_align(size, BUFFER_ALIGN).ok()
    }
}

// SAFETY: std::alloc returns BUFFER_ALIGN-aligned blocks for the layouts
// built here, and realloc preserves contents.
unsafe impl Allocator for SystemAllocator {
    fn allocate(&self, size: usize) -> Option<NonNull<u8>> {
        let layout = Self::layout(size)?;
        debug_assert!(layout.size() > 0);
        // SAFETY: layout has non-zero size (trait contract).
        NonNull::new(unsafe { std::alloc::alloc(layout) })
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_size: usize,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        let old_layout = Self::layout(old_size)?;
        // Rejects sizes that would overflow isize once rounded to the alignment.
        Self::layout(new_size)?;
        // SAFETY: ptr was allocated by us with old_layout; new_size is
        // non-zero and valid for BUFFER_ALIGN (checked above).
        NonNull::new(unsafe { std::alloc::realloc(ptr.as_ptr(), old_layout, new_size) })
    }

    unsafe fn free(&self, ptr: NonNull<u8>, size: usize) {
        if let Some(layout) = Self::layout(size) {
            // SAFETY: ptr was allocated by us with this layout.
            unsafe { std::alloc::dealloc(ptr.as_ptr(), layout) }
        }
    }
}

/// `malloc`-style allocation function.
pub type AllocFn = unsafe extern "C" fn(size: usize) -> *mut u8;
/// `realloc`-style reallocation function.
pub type ReallocFn = unsafe extern "C" fn(ptr: *mut u8, new_size: usize) -> *mut u8;
/// `free`-style release function.
pub type FreeFn = unsafe extern "C" fn(ptr: *mut u8);

/// An allocator made of three plain function pointers.
///
/// The functions follow C `malloc`/`realloc`/`free` semantics: they do
/// not receive the old size, and null means failure. All three must be
/// present; [`FnAllocatorSet::from_parts`] rejects a partial set.
#[derive(Clone, Copy, Debug)]
pub struct FnAllocatorSet {
    alloc: AllocFn,
    realloc: ReallocFn,
    free: FreeFn,
}

impl FnAllocatorSet {
    /// Build a set from three present functions.
    ///
    /// # Safety
    ///
    /// The functions must behave like C `malloc`/`realloc`/`free`: blocks
    /// aligned to [`BUFFER_ALIGN`], `realloc` preserving contents and
    /// leaving the original block intact when it returns null.
    pub const unsafe fn new(alloc: AllocFn, realloc: ReallocFn, free: FreeFn) -> Self {
        Self {
            alloc,
            realloc,
            free,
        }
    }

    /// Build a set from possibly-missing functions.
    ///
    /// # Safety
    ///
    /// Same contract as [`FnAllocatorSet::new`] for every present function.
    pub unsafe fn from_parts(
        alloc: Option<AllocFn>,
        realloc: Option<ReallocFn>,
        free: Option<FreeFn>,
    ) -> Result<Self, VecError> {
        let alloc = alloc.ok_or(VecError::InvalidAllocatorSet { missing: "alloc" })?;
        let realloc = realloc.ok_or(VecError::InvalidAllocatorSet { missing: "realloc" })?;
        let free = free.ok_or(VecError::InvalidAllocatorSet { missing: "free" })?;
        // SAFETY: forwarded caller contract.
        Ok(unsafe { Self::new(alloc, realloc, free) })
    }
}

// SAFETY: the constructor's contract makes the three functions a valid
// malloc family.
unsafe impl Allocator for FnAllocatorSet {
    fn allocate(&self, size: usize) -> Option<NonNull<u8>> {
        // SAFETY: `alloc` is malloc-like per the constructor contract.
        NonNull::new(unsafe { (self.alloc)(size) })
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        _old_size: usize,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        // SAFETY: ptr came from this set's alloc/realloc.
        NonNull::new(unsafe { (self.realloc)(ptr.as_ptr(), new_size) })
    }

    unsafe fn free(&self, ptr: NonNull<u8>, _size: usize) {
        // SAFETY: ptr came from this set's alloc/realloc.
        unsafe { (self.free)(ptr.as_ptr()) }
    }
}
