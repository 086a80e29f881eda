//! # Trellis Tree
//!
//! Server-side state-node graph for trellis.
//!
//! This crate provides:
//! - `StateTree`: the session-scoped node graph with id allocation
//! - `StateNode`: typed feature storage and an ordered child list
//! - `ChangeTracker`: the ordered mutation log with coalescing
//!
//! All mutations go through `StateTree` so that every change is observed
//! by the tracker and reaches the client exactly once.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod node;
mod tracker;
mod tree;

pub use error::{TreeError, TreeResult};
pub use node::StateNode;
pub use tracker::ChangeTracker;
pub use tree::StateTree;
