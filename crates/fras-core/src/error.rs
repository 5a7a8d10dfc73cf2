//! Error types for `fras-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid credentials")]
  InvalidCredentials,

  #[error("a login is already in progress")]
  LoginInProgress,

  /// A logout landed while the login was still in flight. Nothing from the
  /// attempt is kept.
  #[error("login was cancelled by a logout")]
  LoginCancelled,

  /// The durable identity slot held something that is not an identity.
  /// Recovered locally by [`crate::session::SessionManager::restore`].
  #[error("stored identity is malformed: {0}")]
  MalformedStoredIdentity(String),

  #[error("identity slot error: {0}")]
  Slot(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("record supplier error: {0}")]
  Supplier(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("{0}")]
  InvalidIssue(String),

  #[error("{0} cannot be changed")]
  ProfileLocked(&'static str),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl Error {
  /// Box a collaborator's error as a slot failure.
  pub fn slot<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Slot(Box::new(err))
  }

  /// Box a collaborator's error as a supplier failure.
  pub fn supplier<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Supplier(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
