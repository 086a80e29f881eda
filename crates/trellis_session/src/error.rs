//! Error types for session handling.

use thiserror::Error;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors that can occur while handling a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session lock is already held, or the caller holds another
    /// session's lock. Fatal to the calling operation; never retried
    /// silently.
    #[error("concurrent access to session {session}")]
    ConcurrentAccess {
        /// The session whose lock was contended.
        session: crate::SessionId,
    },

    /// A client message arrived beyond the resend window.
    ///
    /// Recovered by a full resynchronization, not fatal to the session.
    #[error("client sequence gap: expected {expected}, received {received}")]
    SequenceGap {
        /// The next sequence id the server would accept.
        expected: u64,
        /// The sequence id that arrived.
        received: u64,
    },

    /// The session has been closed; no further work is accepted.
    #[error("session is closed")]
    SessionClosed,

    /// The session lock could not be acquired within the timeout.
    #[error("session lock timed out")]
    LockTimeout,

    /// A tree operation failed.
    #[error("tree error: {0}")]
    Tree(#[from] trellis_tree::TreeError),

    /// A codec operation failed.
    #[error("codec error: {0}")]
    Codec(#[from] trellis_protocol::CodecError),
}
