//! Test utilities for bytevec development.
//!
//! Provides instrumented allocators ([`CountingAllocator`],
//! [`FailingAllocator`]), a C-style `malloc` family for exercising
//! [`FnAllocatorSet`](bytevec::FnAllocatorSet) and the FFI layer, element
//! fixtures, and a tracing subscriber for test output.

#![deny(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod allocators;
pub mod fixtures;
pub mod malloc;

pub use allocators::{AllocStats, CountingAllocator, FailingAllocator};
pub use fixtures::{int_vec, read_ints};
pub use malloc::{malloc_set, test_free, test_malloc, test_realloc};

use tracing_subscriber::{fmt, EnvFilter};

/// Install a test-friendly tracing subscriber.
///
/// Honours `RUST_LOG`, defaulting to `warn`. Safe to call from every test:
/// a subscriber that is already installed is left in place.
pub fn init_test_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // Another test may have installed the global subscriber first.
    let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
}
