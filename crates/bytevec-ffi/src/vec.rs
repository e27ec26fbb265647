//! Vector lifecycle and element FFI.
//!
//! Every vector lives in the global `VECS` table. Element pointers passed
//! in or out must address at least `elem_size` bytes (or `count *
//! elem_size` for bulk calls); the vector never retains them.

use std::sync::Mutex;

use bytevec::{ByteVec, SystemAllocator, VecConfig};

use crate::alloc::{BytevecAllocatorSet, BytevecConfig, FfiAllocator};
use crate::handle::HandleTable;
use crate::status::BytevecStatus;

type FfiVec = ByteVec<FfiAllocator>;

static VECS: Mutex<HandleTable<FfiVec>> = Mutex::new(HandleTable::new());

#[allow(unsafe_code)]
fn register(v: FfiVec, out: *mut u64) -> i32 {
    let handle = ffi_lock!(VECS).insert(v);
    // SAFETY: caller checked out is non-null.
    unsafe {
        *out = handle;
    }
    BytevecStatus::Ok as i32
}

/// Write the default growth configuration to `out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bytevec_config_default(out: *mut BytevecConfig) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return BytevecStatus::InvalidArgument as i32;
        }
        // SAFETY: out is non-null and points to a BytevecConfig.
        unsafe {
            *out = VecConfig::default().into();
        }
        BytevecStatus::Ok as i32
    })
}

/// Create an empty vector on the platform allocator.
///
/// On success writes the new handle to `out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bytevec_new(elem_size: usize, out: *mut u64) -> i32 {
    bytevec_new_with_config(std::ptr::null(), std::ptr::null(), elem_size, out)
}

/// Create an empty vector whose buffer is managed by `allocators`.
///
/// A set with any null member yields `InvalidAllocatorSet` and no vector.
/// The functions must behave like `malloc`/`realloc`/`free` and remain
/// callable until the vector is destroyed.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bytevec_new_with_allocator(
    allocators: *const BytevecAllocatorSet,
    elem_size: usize,
    out: *mut u64,
) -> i32 {
    if allocators.is_null() {
        return BytevecStatus::InvalidArgument as i32;
    }
    bytevec_new_with_config(allocators, std::ptr::null(), elem_size, out)
}

/// Create an empty vector with an explicit allocator set and growth policy.
///
/// Either pointer may be null to select the platform allocator or the
/// default configuration respectively.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bytevec_new_with_config(
    allocators: *const BytevecAllocatorSet,
    config: *const BytevecConfig,
    elem_size: usize,
    out: *mut u64,
) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return BytevecStatus::InvalidArgument as i32;
        }
        let alloc = if allocators.is_null() {
            FfiAllocator::System(SystemAllocator)
        } else {
            // SAFETY: allocators is non-null; the caller vouches that its
            // members form a malloc family.
            match unsafe { (*allocators).into_allocator() } {
                Ok(set) => FfiAllocator::Custom(set),
                Err(e) => return BytevecStatus::from(&e) as i32,
            }
        };
        let config = if config.is_null() {
            VecConfig::default()
        } else {
            // SAFETY: config is non-null and points to a BytevecConfig.
            VecConfig::from(unsafe { *config })
        };
        match ByteVec::with_config(alloc, config, elem_size) {
            Ok(v) => register(v, out),
            Err(e) => BytevecStatus::from(&e) as i32,
        }
    })
}

/// Release a vector and invalidate its handle.
///
/// Destroying an already-destroyed handle returns `InvalidHandle` and has
/// no other effect.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bytevec_destroy(handle: u64) -> i32 {
    ffi_guard!({
        // Take the vector out under the lock; free its buffer after.
        let removed = ffi_lock!(VECS).remove(handle);
        match removed {
            Some(mut v) => {
                v.destroy();
                BytevecStatus::Ok as i32
            }
            None => BytevecStatus::InvalidHandle as i32,
        }
    })
}

/// Run `$body` against the vector behind `$handle` and map its result to a status.
macro_rules! with_vec {
    ($handle:expr, |$v:ident| $body:expr) => {
        ffi_guard!({
            let mut table = ffi_lock!(VECS);
            let $v = match table.get_mut($handle) {
                Some(v) => v,
                None => return BytevecStatus::InvalidHandle as i32,
            };
            BytevecStatus::code($body)
        })
    };
}

/// Grow capacity geometrically until it reaches at least `target` slots.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bytevec_grow(handle: u64, target: usize) -> i32 {
    with_vec!(handle, |v| v.grow(target))
}

/// Set capacity to exactly `new_capacity` slots, truncating if smaller.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bytevec_resize(handle: u64, new_capacity: usize) -> i32 {
    with_vec!(handle, |v| v.resize(new_capacity))
}

/// Ensure capacity for at least `min_capacity` slots without growth rounding.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bytevec_reserve(handle: u64, min_capacity: usize) -> i32 {
    with_vec!(handle, |v| v.reserve(min_capacity))
}

/// Copy `elem_size` bytes from `element` onto the end.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bytevec_push(handle: u64, element: *const u8) -> i32 {
    if element.is_null() {
        return BytevecStatus::InvalidArgument as i32;
    }
    with_vec!(handle, |v| {
        // SAFETY: element is non-null and addresses elem_size readable bytes.
        let bytes = unsafe { std::slice::from_raw_parts(element, v.elem_size()) };
        v.push(bytes)
    })
}

/// Copy the last element into `out` and remove it.
///
/// `out` is untouched when the vector is empty.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bytevec_pop(handle: u64, out: *mut u8) -> i32 {
    if out.is_null() {
        return BytevecStatus::InvalidArgument as i32;
    }
    with_vec!(handle, |v| {
        // SAFETY: out is non-null and addresses elem_size writable bytes.
        let buf = unsafe { std::slice::from_raw_parts_mut(out, v.elem_size()) };
        v.pop(buf)
    })
}

/// Copy element `index` into `out` without removing it.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bytevec_get(handle: u64, index: usize, out: *mut u8) -> i32 {
    if out.is_null() {
        return BytevecStatus::InvalidArgument as i32;
    }
    ffi_guard!({
        let table = ffi_lock!(VECS);
        let v = match table.get(handle) {
            Some(v) => v,
            None => return BytevecStatus::InvalidHandle as i32,
        };
        if v.is_destroyed() {
            return BytevecStatus::Destroyed as i32;
        }
        match v.get(index) {
            Some(src) => {
                // SAFETY: out is non-null and addresses elem_size writable
                // bytes; src is exactly elem_size bytes.
                unsafe { std::ptr::copy_nonoverlapping(src.as_ptr(), out, src.len()) };
                BytevecStatus::Ok as i32
            }
            None => BytevecStatus::IndexOutOfRange as i32,
        }
    })
}

/// Append every element of `from` onto `to`. `from` is unchanged.
///
/// `to` and `from` must be distinct handles.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bytevec_append(to: u64, from: u64) -> i32 {
    ffi_guard!({
        let mut table = ffi_lock!(VECS);
        if table.get(to).is_none() || table.get(from).is_none() {
            return BytevecStatus::InvalidHandle as i32;
        }
        match table.get_pair_mut(to, from) {
            Some((dst, src)) => BytevecStatus::code(dst.append_vec(src)),
            None => BytevecStatus::InvalidArgument as i32,
        }
    })
}

/// Append `count` elements packed contiguously at `elements`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bytevec_append_list(handle: u64, elements: *const u8, count: usize) -> i32 {
    if elements.is_null() {
        return BytevecStatus::InvalidArgument as i32;
    }
    with_vec!(handle, |v| {
        match count.checked_mul(v.elem_size()) {
            Some(n) => {
                // SAFETY: elements is non-null and addresses count * elem_size
                // readable bytes.
                let bytes = unsafe { std::slice::from_raw_parts(elements, n) };
                v.append_slice(bytes, count)
            }
            None => Err(bytevec::VecError::CapacityOverflow {
                capacity: count,
                elem_size: v.elem_size(),
            }),
        }
    })
}

/// Insert a copy of `element` at `index`, shifting later elements right.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bytevec_insert(handle: u64, element: *const u8, index: usize) -> i32 {
    if element.is_null() {
        return BytevecStatus::InvalidArgument as i32;
    }
    with_vec!(handle, |v| {
        // SAFETY: element is non-null and addresses elem_size readable bytes.
        let bytes = unsafe { std::slice::from_raw_parts(element, v.elem_size()) };
        v.insert(bytes, index)
    })
}

/// Insert a copy of `element` at `index`, moving the displaced element
/// to the end. Does not preserve order.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bytevec_insert_fast(handle: u64, element: *const u8, index: usize) -> i32 {
    if element.is_null() {
        return BytevecStatus::InvalidArgument as i32;
    }
    with_vec!(handle, |v| {
        // SAFETY: element is non-null and addresses elem_size readable bytes.
        let bytes = unsafe { std::slice::from_raw_parts(element, v.elem_size()) };
        v.insert_fast(bytes, index)
    })
}

/// Insert every element of `from` into `to` at `index`, preserving order.
///
/// `to` and `from` must be distinct handles.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bytevec_insert_vec(to: u64, from: u64, index: usize) -> i32 {
    ffi_guard!({
        let mut table = ffi_lock!(VECS);
        if table.get(to).is_none() || table.get(from).is_none() {
            return BytevecStatus::InvalidHandle as i32;
        }
        match table.get_pair_mut(to, from) {
            Some((dst, src)) => BytevecStatus::code(dst.insert_vec(src, index)),
            None => BytevecStatus::InvalidArgument as i32,
        }
    })
}

/// Remove element `index`, shifting later elements left.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bytevec_remove(handle: u64, index: usize) -> i32 {
    with_vec!(handle, |v| v.remove(index))
}

/// Remove element `index` by moving the last element into its place.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bytevec_remove_fast(handle: u64, index: usize) -> i32 {
    with_vec!(handle, |v| v.remove_fast(index))
}

/// Number of live elements, or 0 for an invalid handle.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bytevec_len(handle: u64) -> usize {
    ffi_guard_or!(0, {
        VECS.lock()
            .ok()
            .and_then(|t| t.get(handle).map(ByteVec::len))
            .unwrap_or(0)
    })
}

/// Allocated slots, or 0 for an invalid handle.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bytevec_capacity(handle: u64) -> usize {
    ffi_guard_or!(0, {
        VECS.lock()
            .ok()
            .and_then(|t| t.get(handle).map(ByteVec::capacity))
            .unwrap_or(0)
    })
}

/// Element size in bytes, or 0 for an invalid handle.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bytevec_elem_size(handle: u64) -> usize {
    ffi_guard_or!(0, {
        VECS.lock()
            .ok()
            .and_then(|t| t.get(handle).map(ByteVec::elem_size))
            .unwrap_or(0)
    })
}
