//! Core types for the bytevec type-erased vector.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the error taxonomy shared by the vector engine and the C ABI, and the
//! tunable growth parameters every vector is constructed with.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;

pub use config::VecConfig;
pub use error::VecError;
