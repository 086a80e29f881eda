//! Configuration for sessions.

use std::time::Duration;

/// When accumulated changes are pushed to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushMode {
    /// Changes are flushed automatically whenever a locked access that
    /// left changes behind completes.
    Automatic,
    /// Changes are flushed only when the request handler asks for them.
    Manual,
}

impl PushMode {
    /// Returns true if unlocking should flush automatically.
    pub fn is_automatic(&self) -> bool {
        matches!(self, PushMode::Automatic)
    }
}

/// Configuration for one UI session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Interval at which the client is expected to send heartbeats.
    pub heartbeat_interval: Duration,
    /// Number of missed heartbeats after which the session is stale.
    pub max_missed_heartbeats: u32,
    /// How far ahead of the expected client sequence a message may arrive
    /// and still be buffered. Beyond this, the gap is treated as lost
    /// messages and the session resynchronizes.
    pub resend_window: u64,
    /// Timeout for blocking lock acquisition by background accesses.
    pub lock_timeout: Duration,
    /// Push mode.
    pub push_mode: PushMode,
}

impl SessionConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self {
            heartbeat_interval: Duration::from_secs(300),
            max_missed_heartbeats: 3,
            resend_window: 32,
            lock_timeout: Duration::from_secs(10),
            push_mode: PushMode::Manual,
        }
    }

    /// Sets the heartbeat interval.
    pub fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = interval;
        self
    }

    /// Sets the missed heartbeat threshold.
    pub fn with_max_missed_heartbeats(mut self, count: u32) -> Self {
        self.max_missed_heartbeats = count;
        self
    }

    /// Sets the client resend window.
    pub fn with_resend_window(mut self, window: u64) -> Self {
        self.resend_window = window;
        self
    }

    /// Sets the lock timeout for background accesses.
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Sets the push mode.
    pub fn with_push_mode(mut self, mode: PushMode) -> Self {
        self.push_mode = mode;
        self
    }

    /// Time without a heartbeat after which the session is stale.
    pub fn stale_after(&self) -> Duration {
        self.heartbeat_interval * self.max_missed_heartbeats
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}
