//! A C-style `malloc`/`realloc`/`free` family built on `std::alloc`.
//!
//! C allocators do not pass the block size back to `realloc`/`free`, so
//! each block carries a [`HEADER`]-byte prefix recording its usable size.
//! The returned pointer sits just past the header and stays 16-byte
//! aligned.

#![allow(unsafe_code)]

use std::alloc::Layout;

use bytevec::{FnAllocatorSet, BUFFER_ALIGN};

const HEADER: usize = BUFFER_ALIGN;

fn block_layout(size: usize) -> Option<Layout> {
    let total = size.checked_add(HEADER)?;
    Layout::from_size_align(total, BUFFER_ALIGN).ok()
}

/// `malloc` replacement. Returns null on failure or oversized requests.
///
/// # Safety
///
/// Always safe to call; `unsafe` only to match the C signature.
pub unsafe extern "C" fn test_malloc(size: usize) -> *mut u8 {
    let Some(layout) = block_layout(size) else {
        return std::ptr::null_mut();
    };
    // SAFETY: layout is non-zero (at least HEADER bytes).
    let base = unsafe { std::alloc::alloc(layout) };
    if base.is_null() {
        return base;
    }
    // SAFETY: base is valid for HEADER bytes and suitably aligned for usize.
    unsafe {
        (base as *mut usize).write(size);
        base.add(HEADER)
    }
}

/// `realloc` replacement. A null `ptr` behaves like [`test_malloc`].
///
/// # Safety
///
/// `ptr` must be null or come from this module and not yet be freed.
pub unsafe extern "C" fn test_realloc(ptr: *mut u8, new_size: usize) -> *mut u8 {
    if ptr.is_null() {
        // SAFETY: no preconditions.
        return unsafe { test_malloc(new_size) };
    }
    let Some(new_layout) = block_layout(new_size) else {
        return std::ptr::null_mut();
    };
    // SAFETY: ptr came from test_malloc/test_realloc, so the header sits
    // HEADER bytes before it and records the usable size.
    unsafe {
        let base = ptr.sub(HEADER);
        let old_size = (base as *const usize).read();
        let Some(old_layout) = block_layout(old_size) else {
            return std::ptr::null_mut();
        };
        let new_base = std::alloc::realloc(base, old_layout, new_layout.size());
        if new_base.is_null() {
            return new_base;
        }
        (new_base as *mut usize).write(new_size);
        new_base.add(HEADER)
    }
}

/// `free` replacement. Null is ignored.
///
/// # Safety
///
/// `ptr` must be null or come from this module and not yet be freed.
pub unsafe extern "C" fn test_free(ptr: *mut u8) {
    if ptr.is_null() {
        return;
    }
    // SAFETY: see test_realloc.
    unsafe {
        let base = ptr.sub(HEADER);
        let size = (base as *const usize).read();
        if let Some(layout) = block_layout(size) {
            std::alloc::dealloc(base, layout);
        }
    }
}

/// An [`FnAllocatorSet`] over the functions in this module.
pub fn malloc_set() -> FnAllocatorSet {
    // SAFETY: the three functions form a malloc family with 16-byte alignment.
    unsafe { FnAllocatorSet::new(test_malloc, test_realloc, test_free) }
}
