//! Session identity, locking, and request tracking.

use crate::config::SessionConfig;
use crate::error::{SessionError, SessionResult};
use crate::ui::UiSession;
use parking_lot::{Mutex, MutexGuard};
use std::cell::Cell;
use std::collections::VecDeque;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::time::Duration;
use tracing::debug;
use trellis_protocol::Envelope;
use uuid::Uuid;

/// Unique identifier for a UI session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Creates a fresh random session id.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

thread_local! {
    /// The session whose lock this thread currently holds, if any.
    ///
    /// Acquiring a second session lock while one is held would risk
    /// deadlock; the marker lets acquisition fail fast instead.
    static HELD_LOCK: Cell<Option<SessionId>> = const { Cell::new(None) };
}

type Access = Box<dyn FnOnce(&mut UiSession) + Send>;

/// One logical session: the engine state behind a mutual-exclusion lock,
/// plus the queue of pending background accesses.
///
/// All graph mutation — request handling, background tasks, push — goes
/// through this lock, one holder at a time. Request handling uses
/// [`start_request`](Session::start_request), which fails fast on
/// contention; background accesses block up to the configured timeout.
pub struct Session {
    id: SessionId,
    state: Mutex<UiSession>,
    queued: Mutex<VecDeque<Access>>,
    lock_timeout: Duration,
}

impl Session {
    /// Creates a session with a fresh id.
    pub fn new(config: SessionConfig) -> Self {
        let id = SessionId::random();
        let lock_timeout = config.lock_timeout;
        Self {
            id,
            state: Mutex::new(UiSession::new(id, config)),
            queued: Mutex::new(VecDeque::new()),
            lock_timeout,
        }
    }

    /// Returns the session id.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Begins handling a request, taking exclusive ownership of the
    /// session state.
    ///
    /// Fails with [`SessionError::ConcurrentAccess`] if another thread is
    /// handling a request for this session, or if the calling thread
    /// already holds any session lock.
    pub fn start_request(&self) -> SessionResult<RequestGuard<'_>> {
        self.check_reentry()?;
        let inner = self
            .state
            .try_lock()
            .ok_or(SessionError::ConcurrentAccess { session: self.id })?;
        Ok(RequestGuard::new(self.id, inner))
    }

    /// Runs a closure with the session state locked, blocking until the
    /// lock is available.
    ///
    /// When the session is in automatic push mode, changes left behind by
    /// the closure are flushed before the lock is released and returned
    /// alongside the closure's result, ready for delivery.
    pub fn access<R>(
        &self,
        f: impl FnOnce(&mut UiSession) -> R,
    ) -> SessionResult<(R, Option<Envelope>)> {
        let mut guard = self.lock_blocking()?;
        let result = f(&mut guard);
        let envelope = guard.flush_if_automatic()?;
        Ok((result, envelope))
    }

    /// Queues a background access to run at the next
    /// [`run_pending_accesses`](Session::run_pending_accesses).
    pub fn queue_access(&self, f: impl FnOnce(&mut UiSession) + Send + 'static) {
        self.queued.lock().push_back(Box::new(f));
    }

    /// Returns the number of queued background accesses.
    pub fn pending_access_count(&self) -> usize {
        self.queued.lock().len()
    }

    /// Runs all queued background accesses, one at a time, each with the
    /// session lock held.
    ///
    /// In automatic push mode every access that left changes behind
    /// produces an envelope, flushed while the lock is still held so no
    /// concurrent mutation can interleave with the collect.
    pub fn run_pending_accesses(&self) -> SessionResult<Vec<Envelope>> {
        let mut envelopes = Vec::new();
        loop {
            let next = self.queued.lock().pop_front();
            let Some(access) = next else { break };

            let mut guard = self.lock_blocking()?;
            access(&mut guard);
            if let Some(envelope) = guard.flush_if_automatic()? {
                envelopes.push(envelope);
            }
        }
        if !envelopes.is_empty() {
            debug!(session = %self.id, count = envelopes.len(), "pushed background changes");
        }
        Ok(envelopes)
    }

    fn lock_blocking(&self) -> SessionResult<RequestGuard<'_>> {
        self.check_reentry()?;
        let inner = self
            .state
            .try_lock_for(self.lock_timeout)
            .ok_or(SessionError::LockTimeout)?;
        Ok(RequestGuard::new(self.id, inner))
    }

    /// A thread holding any session lock must not acquire another one.
    fn check_reentry(&self) -> SessionResult<()> {
        if HELD_LOCK.get().is_some() {
            return Err(SessionError::ConcurrentAccess { session: self.id });
        }
        Ok(())
    }
}

/// Exclusive access to a session's state for the duration of one request.
///
/// While a guard is alive the session is in its request-active state; it
/// returns to idle when the guard drops.
pub struct RequestGuard<'a> {
    inner: MutexGuard<'a, UiSession>,
}

impl<'a> RequestGuard<'a> {
    fn new(id: SessionId, inner: MutexGuard<'a, UiSession>) -> Self {
        HELD_LOCK.set(Some(id));
        Self { inner }
    }

    /// Flushes pending changes when the session pushes automatically.
    pub fn flush_if_automatic(&mut self) -> SessionResult<Option<Envelope>> {
        if self.inner.is_closed() {
            return Ok(None);
        }
        if self.inner.config().push_mode.is_automatic() && self.inner.has_pending_changes() {
            return self.inner.flush();
        }
        Ok(None)
    }
}

impl Deref for RequestGuard<'_> {
    type Target = UiSession;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for RequestGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl Drop for RequestGuard<'_> {
    fn drop(&mut self) {
        HELD_LOCK.set(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PushMode;
    use std::sync::mpsc;
    use std::thread;

    #[test]
    fn start_request_gives_exclusive_access() {
        let session = Session::new(SessionConfig::new());
        let mut guard = session.start_request().unwrap();
        let root = guard.tree().root_id();
        guard.tree_mut().unwrap().create_node(root, 0).unwrap();
        let envelope = guard.flush().unwrap().unwrap();
        assert_eq!(envelope.seq, 0);
    }

    #[test]
    fn contended_start_request_fails_fast() {
        let session = std::sync::Arc::new(Session::new(SessionConfig::new()));
        let guard = session.start_request().unwrap();

        let (tx, rx) = mpsc::channel();
        let other = std::sync::Arc::clone(&session);
        let handle = thread::spawn(move || {
            let denied = matches!(
                other.start_request(),
                Err(SessionError::ConcurrentAccess { .. })
            );
            tx.send(denied).unwrap();
        });
        assert!(rx.recv().unwrap());
        handle.join().unwrap();
        drop(guard);

        // Released: the lock is available again.
        assert!(session.start_request().is_ok());
    }

    #[test]
    fn holding_one_session_lock_blocks_acquiring_another() {
        let first = Session::new(SessionConfig::new());
        let second = Session::new(SessionConfig::new());

        let _guard = first.start_request().unwrap();
        assert!(matches!(
            second.start_request(),
            Err(SessionError::ConcurrentAccess { .. })
        ));
        assert!(matches!(
            second.access(|_| ()),
            Err(SessionError::ConcurrentAccess { .. })
        ));
    }

    #[test]
    fn reentrant_start_request_fails_fast() {
        let session = Session::new(SessionConfig::new());
        let _guard = session.start_request().unwrap();
        assert!(matches!(
            session.start_request(),
            Err(SessionError::ConcurrentAccess { .. })
        ));
    }

    #[test]
    fn access_flushes_automatically_in_automatic_push_mode() {
        let session = Session::new(SessionConfig::new().with_push_mode(PushMode::Automatic));
        let ((), envelope) = session
            .access(|ui| {
                let root = ui.tree().root_id();
                ui.tree_mut().unwrap().create_node(root, 0).unwrap();
            })
            .unwrap();
        assert!(envelope.is_some());
        assert_eq!(envelope.unwrap().changes.len(), 1);
    }

    #[test]
    fn access_leaves_changes_for_manual_push() {
        let session = Session::new(SessionConfig::new());
        let ((), envelope) = session
            .access(|ui| {
                let root = ui.tree().root_id();
                ui.tree_mut().unwrap().create_node(root, 0).unwrap();
            })
            .unwrap();
        assert!(envelope.is_none());

        let mut guard = session.start_request().unwrap();
        assert!(guard.has_pending_changes());
        assert!(guard.flush().unwrap().is_some());
    }

    #[test]
    fn queued_accesses_run_in_order_with_push() {
        let session = Session::new(SessionConfig::new().with_push_mode(PushMode::Automatic));
        session.queue_access(|ui| {
            let root = ui.tree().root_id();
            ui.tree_mut().unwrap().create_node(root, 0).unwrap();
        });
        session.queue_access(|ui| {
            let root = ui.tree().root_id();
            ui.tree_mut().unwrap().create_node(root, 1).unwrap();
        });
        assert_eq!(session.pending_access_count(), 2);

        let envelopes = session.run_pending_accesses().unwrap();
        assert_eq!(envelopes.len(), 2);
        assert_eq!(envelopes[0].seq, 0);
        assert_eq!(envelopes[1].seq, 1);
        assert_eq!(session.pending_access_count(), 0);
    }
}
