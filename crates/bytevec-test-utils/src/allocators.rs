//! Instrumented allocators.
//!
//! - [`CountingAllocator`]: forwards to an inner allocator and records
//!   every call, so tests can assert on reallocation counts and leaks.
//! - [`FailingAllocator`]: succeeds a fixed number of times, then
//!   returns null for every allocate/reallocate.

#![allow(unsafe_code)]

use std::ptr::NonNull;
use std::sync::atomic::{AtomicUsize, Ordering};

use bytevec::{Allocator, SystemAllocator};

/// Snapshot of a [`CountingAllocator`]'s counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AllocStats {
    pub allocations: usize,
    pub reallocations: usize,
    pub frees: usize,
    /// Bytes currently held by live allocations.
    pub live_bytes: usize,
    /// Size of the most recent allocate/reallocate request.
    pub last_request: usize,
}

/// Forwards to `A` and counts calls.
///
/// Pass `&counting` to a vector so the counters stay readable while the
/// vector owns its allocator handle.
#[derive(Debug, Default)]
pub struct CountingAllocator<A: Allocator = SystemAllocator> {
    inner: A,
    allocations: AtomicUsize,
    reallocations: AtomicUsize,
    frees: AtomicUsize,
    live_bytes: AtomicUsize,
    last_request: AtomicUsize,
}

impl CountingAllocator<SystemAllocator> {
    pub fn new() -> Self {
        Self::wrap(SystemAllocator)
    }
}

impl<A: Allocator> CountingAllocator<A> {
    pub fn wrap(inner: A) -> Self {
        Self {
            inner,
            allocations: AtomicUsize::new(0),
            reallocations: AtomicUsize::new(0),
            frees: AtomicUsize::new(0),
            live_bytes: AtomicUsize::new(0),
            last_request: AtomicUsize::new(0),
        }
    }

    pub fn stats(&self) -> AllocStats {
        AllocStats {
            allocations: self.allocations.load(Ordering::Relaxed),
            reallocations: self.reallocations.load(Ordering::Relaxed),
            frees: self.frees.load(Ordering::Relaxed),
            live_bytes: self.live_bytes.load(Ordering::Relaxed),
            last_request: self.last_request.load(Ordering::Relaxed),
        }
    }

    /// Allocations not yet freed.
    pub fn outstanding(&self) -> usize {
        let s = self.stats();
        s.allocations - s.frees
    }
}

// SAFETY: every call is forwarded to `inner` unchanged.
unsafe impl<A: Allocator> Allocator for CountingAllocator<A> {
    fn allocate(&self, size: usize) -> Option<NonNull<u8>> {
        self.last_request.store(size, Ordering::Relaxed);
        let ptr = self.inner.allocate(size)?;
        self.allocations.fetch_add(1, Ordering::Relaxed);
        self.live_bytes.fetch_add(size, Ordering::Relaxed);
        Some(ptr)
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_size: usize,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        self.last_request.store(new_size, Ordering::Relaxed);
        // SAFETY: forwarded caller contract.
        let new_ptr = unsafe { self.inner.reallocate(ptr, old_size, new_size) }?;
        self.reallocations.fetch_add(1, Ordering::Relaxed);
        self.live_bytes.fetch_sub(old_size, Ordering::Relaxed);
        self.live_bytes.fetch_add(new_size, Ordering::Relaxed);
        Some(new_ptr)
    }

    unsafe fn free(&self, ptr: NonNull<u8>, size: usize) {
        // SAFETY: forwarded caller contract.
        unsafe { self.inner.free(ptr, size) };
        self.frees.fetch_add(1, Ordering::Relaxed);
        self.live_bytes.fetch_sub(size, Ordering::Relaxed);
    }
}

/// Succeeds `successes` times, then reports out-of-memory forever.
///
/// Both allocate and reallocate draw from the same budget. Frees always
/// succeed.
#[derive(Debug)]
pub struct FailingAllocator<A: Allocator = SystemAllocator> {
    inner: A,
    remaining: AtomicUsize,
}

impl FailingAllocator<SystemAllocator> {
    pub fn new(successes: usize) -> Self {
        Self::wrap(SystemAllocator, successes)
    }
}

impl<A: Allocator> FailingAllocator<A> {
    pub fn wrap(inner: A, successes: usize) -> Self {
        Self {
            inner,
            remaining: AtomicUsize::new(successes),
        }
    }

    /// Reset the number of calls that will succeed.
    pub fn set_remaining(&self, successes: usize) {
        self.remaining.store(successes, Ordering::Relaxed);
    }

    fn take_budget(&self) -> bool {
        self.remaining
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
            .is_ok()
    }
}

// SAFETY: successful calls are forwarded unchanged; failures return None
// without touching the original allocation.
unsafe impl<A: Allocator> Allocator for FailingAllocator<A> {
    fn allocate(&self, size: usize) -> Option<NonNull<u8>> {
        if !self.take_budget() {
            return None;
        }
        self.inner.allocate(size)
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_size: usize,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        if !self.take_budget() {
            return None;
        }
        // SAFETY: forwarded caller contract.
        unsafe { self.inner.reallocate(ptr, old_size, new_size) }
    }

    unsafe fn free(&self, ptr: NonNull<u8>, size: usize) {
        // SAFETY: forwarded caller contract.
        unsafe { self.inner.free(ptr, size) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counting_tracks_live_bytes() {
        let a = CountingAllocator::new();
        let p = a.allocate(64).unwrap();
        assert_eq!(a.stats().live_bytes, 64);
        let p = unsafe { a.reallocate(p, 64, 256) }.unwrap();
        assert_eq!(a.stats().live_bytes, 256);
        unsafe { a.free(p, 256) };
        let s = a.stats();
        assert_eq!(s.allocations, 1);
        assert_eq!(s.reallocations, 1);
        assert_eq!(s.frees, 1);
        assert_eq!(s.live_bytes, 0);
        assert_eq!(a.outstanding(), 0);
    }

    #[test]
    fn failing_exhausts_budget() {
        let a = FailingAllocator::new(1);
        let p = a.allocate(8).unwrap();
        assert!(unsafe { a.reallocate(p, 8, 16) }.is_none());
        assert!(a.allocate(8).is_none());
        a.set_remaining(1);
        let p = unsafe { a.reallocate(p, 8, 16) }.unwrap();
        unsafe { a.free(p, 16) };
    }
}
