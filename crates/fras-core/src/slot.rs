//! The durable identity slot: one named key-value entry that survives
//! process restarts.
//!
//! The slot stores the serialised identity verbatim; parsing (and deciding
//! that the content is garbage) is the session manager's job.

use std::{
  convert::Infallible,
  future::Future,
  sync::{Arc, Mutex, PoisonError},
};

/// Name of the slot entry holding the serialised identity.
pub const IDENTITY_SLOT_KEY: &str = "frasUser";

/// Abstraction over wherever the identity is persisted between runs.
pub trait IdentitySlot: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Raw slot content, or `None` if nothing was ever written (or it was
  /// cleared).
  fn load(
    &self,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + '_;

  /// Replace the slot content.
  fn store(
    &self,
    value: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Remove the slot content. Clearing an empty slot is not an error.
  fn clear(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

/// A process-local slot. Clones share the same content, so a test can hand
/// one clone to a session manager and inspect or reuse the other.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
  inner: Arc<Mutex<Option<String>>>,
}

impl MemorySlot {
  pub fn new() -> Self { Self::default() }

  /// A slot that already holds `content`, as if written by an earlier run.
  pub fn with_content(content: impl Into<String>) -> Self {
    Self { inner: Arc::new(Mutex::new(Some(content.into()))) }
  }

  /// Current content without going through the async trait.
  pub fn peek(&self) -> Option<String> {
    self.inner.lock().unwrap_or_else(PoisonError::into_inner).clone()
  }

  fn set(&self, value: Option<String>) {
    *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = value;
  }
}

impl IdentitySlot for MemorySlot {
  type Error = Infallible;

  async fn load(&self) -> Result<Option<String>, Infallible> { Ok(self.peek()) }

  async fn store(&self, value: String) -> Result<(), Infallible> {
    self.set(Some(value));
    Ok(())
  }

  async fn clear(&self) -> Result<(), Infallible> {
    self.set(None);
    Ok(())
  }
}
