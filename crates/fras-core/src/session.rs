//! The session manager: who is logged in, and the durable copy of it.
//!
//! States and transitions:
//!
//! ```text
//!   Unauthenticated --login--> Authenticating --ok-----> Authenticated
//!                                     |
//!                                     +------fail------> (previous state)
//!   Authenticated   --logout-> Unauthenticated
//! ```
//!
//! [`SessionManager::restore`] jumps straight from process start to either
//! end state. At most one login is outstanding at a time; a second call while
//! one is in flight fails with [`Error::LoginInProgress`]. A logout while a
//! login is in flight cancels it: the login fails with
//! [`Error::LoginCancelled`] and leaves both memory and the slot empty.

use std::sync::{
  Mutex, MutexGuard, PoisonError,
  atomic::{AtomicU64, Ordering},
};

use crate::{
  Error, Result,
  accounts::Authenticator,
  identity::{Identity, Role},
  slot::IdentitySlot,
};

// ─── State ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
  Unauthenticated,
  /// A login is in flight. The identity active before it started (if any)
  /// stays visible and comes back if the login fails.
  Authenticating { previous: Option<Identity> },
  Authenticated(Identity),
}

impl SessionState {
  pub fn identity(&self) -> Option<&Identity> {
    match self {
      Self::Unauthenticated => None,
      Self::Authenticating { previous } => previous.as_ref(),
      Self::Authenticated(identity) => Some(identity),
    }
  }

  pub fn is_authenticating(&self) -> bool {
    matches!(self, Self::Authenticating { .. })
  }

  fn settled(identity: Option<Identity>) -> Self {
    identity.map_or(Self::Unauthenticated, Self::Authenticated)
  }
}

/// Parse slot content into an identity, rejecting anything unusable.
pub fn parse_stored_identity(raw: &str) -> Result<Identity> {
  let identity: Identity = serde_json::from_str(raw)
    .map_err(|e| Error::MalformedStoredIdentity(e.to_string()))?;
  if !identity.is_well_formed() {
    return Err(Error::MalformedStoredIdentity(
      "id, name and email must be non-empty".into(),
    ));
  }
  Ok(identity)
}

// ─── Manager ─────────────────────────────────────────────────────────────────

/// Owns the active identity. Create one per process with
/// [`SessionManager::init`] and share it by reference with the views.
pub struct SessionManager<S, A> {
  slot:          S,
  authenticator: A,
  state:         Mutex<SessionState>,
  /// Bumped by every logout, always while `state` is locked.
  logouts:       AtomicU64,
}

impl<S: IdentitySlot, A: Authenticator> SessionManager<S, A> {
  /// A manager in the `Unauthenticated` state that has not looked at the
  /// slot yet.
  pub fn new(slot: S, authenticator: A) -> Self {
    Self {
      slot,
      authenticator,
      state: Mutex::new(SessionState::Unauthenticated),
      logouts: AtomicU64::new(0),
    }
  }

  /// [`new`](Self::new) followed by [`restore`](Self::restore).
  pub async fn init(slot: S, authenticator: A) -> Self {
    let manager = Self::new(slot, authenticator);
    manager.restore().await;
    manager
  }

  /// Adopt the identity in the durable slot, if there is a usable one.
  ///
  /// Never fails: slot errors and malformed content are logged and treated
  /// as an empty slot.
  pub async fn restore(&self) {
    let raw = match self.slot.load().await {
      Ok(raw) => raw,
      Err(e) => {
        tracing::warn!(error = %e, "could not read identity slot");
        None
      }
    };

    let restored = raw.and_then(|raw| match parse_stored_identity(&raw) {
      Ok(identity) => Some(identity),
      Err(e) => {
        tracing::warn!(error = %e, "ignoring stored identity");
        None
      }
    });

    match &restored {
      Some(identity) => tracing::info!(
        id = %identity.id,
        role = %identity.role,
        "restored session",
      ),
      None => tracing::debug!("no stored session"),
    }

    let mut state = self.lock();
    *state = match &*state {
      SessionState::Authenticating { .. } => {
        SessionState::Authenticating { previous: restored }
      }
      _ => SessionState::settled(restored),
    };
  }

  /// Check credentials and, on success, make the result the active identity
  /// and persist it.
  ///
  /// On any failure the session is left exactly as it was before the call,
  /// except that a [`logout`](Self::logout) made while the login was in
  /// flight still takes effect.
  pub async fn login(
    &self,
    email: &str,
    password: &str,
    role: Role,
  ) -> Result<Identity> {
    let mut attempt = self.begin_login()?;

    let identity = match self
      .authenticator
      .authenticate(email, password, role)
      .await
    {
      Ok(identity) => identity,
      Err(e) => {
        tracing::info!(%email, %role, error = %e, "login rejected");
        return Err(e);
      }
    };

    if attempt.cancelled() {
      tracing::info!(id = %identity.id, "login cancelled before persisting");
      return Err(Error::LoginCancelled);
    }

    let raw = serde_json::to_string(&identity)?;
    if let Err(e) = self.slot.store(raw).await {
      tracing::warn!(error = %e, "could not persist identity");
      return Err(Error::slot(e));
    }

    if !attempt.complete(identity.clone()) {
      // The logout's own clear may have run before our write landed.
      if let Err(e) = self.slot.clear().await {
        tracing::warn!(error = %e, "could not clear identity slot");
      }
      tracing::info!(id = %identity.id, "login cancelled after persisting");
      return Err(Error::LoginCancelled);
    }
    tracing::info!(id = %identity.id, role = %identity.role, "logged in");
    Ok(identity)
  }

  /// Drop the active identity and clear the slot. Always succeeds.
  pub async fn logout(&self) {
    {
      let mut state = self.lock();
      self.logouts.fetch_add(1, Ordering::SeqCst);
      *state = match &*state {
        // The in-flight login sees the bump and gives up; once it does there
        // is nothing to fall back to.
        SessionState::Authenticating { .. } => {
          SessionState::Authenticating { previous: None }
        }
        _ => SessionState::Unauthenticated,
      };
    }

    if let Err(e) = self.slot.clear().await {
      tracing::warn!(error = %e, "could not clear identity slot");
    }
    tracing::info!("logged out");
  }

  /// Snapshot of the current state.
  pub fn state(&self) -> SessionState { self.lock().clone() }

  pub fn identity(&self) -> Option<Identity> { self.lock().identity().cloned() }

  pub fn is_authenticated(&self) -> bool { self.lock().identity().is_some() }

  pub fn is_authenticating(&self) -> bool { self.lock().is_authenticating() }

  fn lock(&self) -> MutexGuard<'_, SessionState> {
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }

  fn begin_login(&self) -> Result<LoginAttempt<'_>> {
    let mut state = self.lock();
    let previous = match &*state {
      SessionState::Authenticating { .. } => {
        return Err(Error::LoginInProgress);
      }
      SessionState::Unauthenticated => None,
      SessionState::Authenticated(identity) => Some(identity.clone()),
    };
    *state = SessionState::Authenticating { previous };
    Ok(LoginAttempt {
      state:     &self.state,
      logouts:   &self.logouts,
      epoch:     self.logouts.load(Ordering::SeqCst),
      completed: false,
    })
  }
}

// ─── Login attempt ───────────────────────────────────────────────────────────

/// Marks a login as in flight. Unless [`complete`](Self::complete)d, dropping
/// it puts back whatever was active before the attempt, which covers both
/// failures, cancellation by logout, and a caller abandoning the future.
struct LoginAttempt<'a> {
  state:     &'a Mutex<SessionState>,
  logouts:   &'a AtomicU64,
  /// Logout count when the attempt began.
  epoch:     u64,
  completed: bool,
}

impl LoginAttempt<'_> {
  fn lock(&self) -> MutexGuard<'_, SessionState> {
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }

  fn cancelled_while_locked(&self) -> bool {
    self.logouts.load(Ordering::SeqCst) != self.epoch
  }

  fn cancelled(&self) -> bool {
    let _state = self.lock();
    self.cancelled_while_locked()
  }

  /// Commit `identity` unless a logout has happened since the attempt began.
  /// Returns whether it was committed.
  fn complete(&mut self, identity: Identity) -> bool {
    let mut state = self.lock();
    if self.cancelled_while_locked() {
      return false;
    }
    *state = SessionState::Authenticated(identity);
    drop(state);
    self.completed = true;
    true
  }
}

impl Drop for LoginAttempt<'_> {
  fn drop(&mut self) {
    if self.completed {
      return;
    }
    let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
    if let SessionState::Authenticating { previous } = &mut *state {
      let previous = previous.take();
      *state = SessionState::settled(previous);
    }
  }
}
