//! # Trellis Testkit
//!
//! Test utilities for trellis.
//!
//! This crate provides:
//! - Mutation scripts and a driver that applies them to a state tree
//! - Property-based generators using proptest
//! - A loopback harness wiring a server session to a client mirror
//!   through encoded byte frames
//! - An isomorphism check between server and mirror graphs

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod builders;
pub mod generators;
pub mod harness;
pub mod isomorphism;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::builders::*;
    pub use crate::generators::*;
    pub use crate::harness::*;
    pub use crate::isomorphism::*;
}

pub use builders::*;
pub use generators::*;
pub use harness::*;
pub use isomorphism::*;
