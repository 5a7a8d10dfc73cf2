//! Credential checking.
//!
//! [`AccountTable`] is the fixed demo credential store. A real deployment
//! swaps in another [`Authenticator`] without touching the session manager.

use std::{future::Future, time::Duration};

use crate::{
  Error, Result,
  identity::{Account, Identity, Role},
};

/// How long the demo table pretends a credential check takes.
pub const DEFAULT_LOGIN_LATENCY: Duration = Duration::from_secs(1);

/// Something that can turn credentials into an [`Identity`].
pub trait Authenticator: Send + Sync {
  /// Resolve to the matching identity, or [`Error::InvalidCredentials`].
  fn authenticate<'a>(
    &'a self,
    email: &'a str,
    password: &'a str,
    role: Role,
  ) -> impl Future<Output = Result<Identity>> + Send + 'a;
}

/// A small in-memory credential table checked by exact match on email,
/// password and role.
#[derive(Debug, Clone)]
pub struct AccountTable {
  accounts: Vec<Account>,
  latency:  Duration,
}

impl AccountTable {
  pub fn new(accounts: Vec<Account>) -> Self {
    Self { accounts, latency: DEFAULT_LOGIN_LATENCY }
  }

  /// The two demo accounts (one student, one faculty).
  pub fn demo() -> Self {
    Self::new(vec![
      Account {
        id:              "student1".into(),
        email:           "student@example.com".into(),
        password:        "password".into(),
        name:            "Alex Student".into(),
        role:            Role::Student,
        profile_picture: Some("https://i.pravatar.cc/150?img=11".into()),
      },
      Account {
        id:              "faculty1".into(),
        email:           "faculty@example.com".into(),
        password:        "password".into(),
        name:            "Dr. Morgan Faculty".into(),
        role:            Role::Faculty,
        profile_picture: Some("https://i.pravatar.cc/150?img=32".into()),
      },
    ])
  }

  pub fn with_latency(mut self, latency: Duration) -> Self {
    self.latency = latency;
    self
  }

  pub fn accounts(&self) -> &[Account] { &self.accounts }
}

impl Authenticator for AccountTable {
  async fn authenticate(
    &self,
    email: &str,
    password: &str,
    role: Role,
  ) -> Result<Identity> {
    if !self.latency.is_zero() {
      tokio::time::sleep(self.latency).await;
    }
    self
      .accounts
      .iter()
      .find(|a| a.matches(email, password, role))
      .map(Account::to_identity)
      .ok_or(Error::InvalidCredentials)
  }
}
