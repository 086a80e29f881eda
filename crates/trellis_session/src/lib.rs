//! # Trellis Session
//!
//! Session locking and the server-side sync engine for trellis.
//!
//! This crate provides:
//! - `Session`: one mutual-exclusion lock per session, request tracking,
//!   and the background access queue
//! - `UiSession`: the engine owning the state tree, envelope writer,
//!   client sequencer, event routing, and heartbeat clock
//! - `ClientSequencer`: in-order admission of client messages over an
//!   unreliable transport
//!
//! ## Key invariants
//!
//! - Exactly one holder of a session's lock mutates its graph at a time
//! - Client messages apply in `client_seq` order; gaps beyond the resend
//!   window trigger a full resynchronization
//! - Push delivery happens while the lock is held, so no mutation can
//!   interleave between collect and transmission

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod lock;
mod sequencer;
mod ui;

pub use config::{PushMode, SessionConfig};
pub use error::{SessionError, SessionResult};
pub use lock::{RequestGuard, Session, SessionId};
pub use sequencer::{Admission, ClientSequencer};
pub use ui::{EventHandler, MessageOutcome, UiSession};
