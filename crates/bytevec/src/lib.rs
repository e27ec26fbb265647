//! Type-erased growable vector with injectable allocators.
//!
//! A [`ByteVec`] stores elements whose size is fixed at construction but
//! unknown at compile time. Elements enter and leave as byte slices;
//! growth, ordered and unordered insertion/removal, and bulk appends all
//! operate on the raw buffer. [`TypedVec`] layers a `T: Pod` view on top
//! for callers that do know their element type.
//!
//! # Architecture
//!
//! ```text
//! TypedVec<T, A>            (typed call boundary)
//! └── ByteVec<A>            (length, growth policy, shuffling algorithms)
//!     └── RawBuffer<A>      (owned zero-initialised allocation)
//!         └── A: Allocator  (SystemAllocator | FnAllocatorSet | custom)
//! ```
//!
//! # Safety
//!
//! `unsafe` is confined to `alloc.rs` (allocator plumbing) and `raw.rs`
//! (the owned buffer). Every byte the buffer acquires is zeroed, so the
//! vector algorithms work on ordinary byte slices.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod alloc;
mod raw;
pub mod typed;
pub mod vec;

// Public re-exports for the primary API surface.
pub use alloc::{Allocator, FnAllocatorSet, SystemAllocator, BUFFER_ALIGN};
pub use bytevec_core::{VecConfig, VecError};
pub use typed::TypedVec;
pub use vec::ByteVec;
