//! # Trellis Protocol
//!
//! Wire protocol types for trellis state synchronization.
//!
//! This crate provides:
//! - `NodeId` and typed `Value` for node features
//! - `ChangeRecord` for tree mutations
//! - `Envelope` for sequence-numbered server-to-client batches
//! - `ClientMessage` for client-to-server events and model changes
//! - JSON encoding/decoding with per-record forward compatibility
//!
//! This is a pure protocol crate with no I/O operations.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod change;
mod client;
mod envelope;
mod error;
mod id;
mod value;

pub use change::{ChangeOp, ChangeRecord};
pub use client::{ClientMessage, ClientMessageBody};
pub use envelope::{Envelope, EnvelopeWriter};
pub use error::{CodecError, CodecResult};
pub use id::NodeId;
pub use value::Value;
