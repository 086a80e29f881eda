//! # Trellis Mirror
//!
//! Client-side replica of the server state graph.
//!
//! This crate provides:
//! - `Mirror`: applies sequence-ordered envelopes to a replica graph
//! - `MirrorNode` with the `Unbound → Bound → Detached` binding lifecycle
//! - `DomBinder`: the collaborator trait for concrete rendered elements,
//!   with `MockDom` for tests
//! - `EventOutbox`: assigns client sequence ids to outgoing messages
//!
//! Envelope application is single-threaded and strictly ordered: exactly
//! one envelope applies at a time, later arrivals queue by sequence
//! number, duplicates are dropped, and a gap beyond the configured window
//! asks the server for a full resynchronization.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod dom;
mod error;
mod mirror;
mod node;
mod outbox;

pub use dom::{DomBinder, DomHandle, MockDom};
pub use error::{MirrorError, MirrorResult};
pub use mirror::{ApplyOutcome, Mirror, MirrorConfig};
pub use node::{BindingState, MirrorNode};
pub use outbox::EventOutbox;
