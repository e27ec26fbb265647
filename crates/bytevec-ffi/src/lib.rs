//! C ABI for type-erased byte vectors.
//!
//! C callers hold opaque `u64` handles. Every entry point returns an
//! `i32` status from [`BytevecStatus`] (or a plain value for infallible
//! getters), never unwinds across the boundary, and never writes an out
//! parameter on failure. This crate is one of two that may contain
//! `unsafe` code (along with `bytevec`).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

use std::cell::RefCell;
use std::ffi::c_char;

thread_local! {
    /// Message of the most recent panic caught by `ffi_guard!` on this thread.
    pub(crate) static LAST_PANIC: RefCell<String> = const { RefCell::new(String::new()) };
}

pub(crate) fn record_panic(payload: &(dyn std::any::Any + Send)) {
    let msg = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    };
    tracing::error!(message = %msg, "panic caught at ffi boundary");
    LAST_PANIC.with(|cell| *cell.borrow_mut() = msg);
}

/// Run an FFI body, converting a panic into `BytevecStatus::Panicked`.
///
/// The body is a closure returning `i32`; `return` inside it returns
/// from the guarded block.
macro_rules! ffi_guard {
    ($body:block) => {
        ffi_guard_or!($crate::status::BytevecStatus::Panicked as i32, $body)
    };
}

/// Like `ffi_guard!`, but with an explicit value to return on panic.
macro_rules! ffi_guard_or {
    ($on_panic:expr, $body:block) => {
        match ::std::panic::catch_unwind(::std::panic::AssertUnwindSafe(|| $body)) {
            Ok(v) => v,
            Err(payload) => {
                $crate::record_panic(&*payload);
                $on_panic
            }
        }
    };
}

/// Lock a mutex inside an `ffi_guard!` body, returning `InternalError` if
/// a prior panic poisoned it.
macro_rules! ffi_lock {
    ($m:expr) => {
        match $m.lock() {
            Ok(guard) => guard,
            Err(_) => return $crate::status::BytevecStatus::InternalError as i32,
        }
    };
}

pub mod alloc;
mod handle;
pub mod status;
pub mod vec;

pub use alloc::{BytevecAllocatorSet, BytevecConfig};
pub use status::BytevecStatus;

/// Copy the last caught panic message on this thread into `buf`.
///
/// Writes at most `cap - 1` bytes plus a NUL terminator. Returns the full
/// message length in bytes, so a caller may pass a null `buf` to size its
/// buffer first. Returns 0 when no panic has been recorded.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn bytevec_last_panic_message(buf: *mut c_char, cap: usize) -> i32 {
    LAST_PANIC.with(|cell| {
        let msg = cell.borrow();
        let bytes = msg.as_bytes();
        if !buf.is_null() && cap > 0 {
            let n = bytes.len().min(cap - 1);
            // SAFETY: caller guarantees buf points to at least cap writable
            // bytes; n + 1 <= cap.
            unsafe {
                std::ptr::copy_nonoverlapping(bytes.as_ptr(), buf.cast::<u8>(), n);
                *buf.add(n) = 0;
            }
        }
        i32::try_from(bytes.len()).unwrap_or(i32::MAX)
    })
}
