//! The authenticated user held for the lifetime of a session.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Which dashboard a user gets. Fixed for the lifetime of a session.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
  Student,
  Faculty,
}

impl Role {
  /// The other role; used by the login form's role toggle.
  pub fn toggled(self) -> Self {
    match self {
      Self::Student => Self::Faculty,
      Self::Faculty => Self::Student,
    }
  }
}

/// The user record stored in the session and in the durable identity slot.
///
/// Serialised in camelCase so the slot content reads
/// `{"id":..,"name":..,"email":..,"role":..,"profilePicture":..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
  pub id:              String,
  pub name:            String,
  pub email:           String,
  pub role:            Role,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub profile_picture: Option<String>,
}

impl Identity {
  /// A parsed identity is only usable if its identifying fields are filled.
  pub fn is_well_formed(&self) -> bool {
    !self.id.trim().is_empty()
      && !self.email.trim().is_empty()
      && !self.name.trim().is_empty()
  }
}

/// A row of the credential table. Never leaves the authenticator; only the
/// password-free [`Identity`] does.
#[derive(Debug, Clone)]
pub struct Account {
  pub id:              String,
  pub email:           String,
  pub password:        String,
  pub name:            String,
  pub role:            Role,
  pub profile_picture: Option<String>,
}

impl Account {
  pub fn matches(&self, email: &str, password: &str, role: Role) -> bool {
    self.email == email && self.password == password && self.role == role
  }

  /// Strip the password.
  pub fn to_identity(&self) -> Identity {
    Identity {
      id:              self.id.clone(),
      name:            self.name.clone(),
      email:           self.email.clone(),
      role:            self.role,
      profile_picture: self.profile_picture.clone(),
    }
  }
}
