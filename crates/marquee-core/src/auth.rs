//! Caller identity and the ownership policy shared by every resource handler.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// The identity attached to a single request by the session provider.
///
/// Passed explicitly into every resource operation; there is no ambient
/// session state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
  pub user_id:   Option<Uuid>,
  pub username:  Option<String>,
  pub logged_in: bool,
}

impl AuthContext {
  pub fn anonymous() -> Self { Self::default() }

  pub fn user(user_id: Uuid, username: impl Into<String>) -> Self {
    Self {
      user_id:   Some(user_id),
      username:  Some(username.into()),
      logged_in: true,
    }
  }

  /// The caller's id, or [`Error::Unauthenticated`].
  pub fn require_login(&self) -> Result<Uuid> {
    match (self.logged_in, self.user_id) {
      (true, Some(id)) => Ok(id),
      _ => Err(Error::Unauthenticated),
    }
  }

  /// Check this caller against the owner (or author) of a resource.
  pub fn check(&self, required_owner: Uuid) -> Result<()> {
    authorize(self.user_id, required_owner, self.logged_in).into_result()
  }
}

/// The verdict of [`authorize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
  Allow,
  Forbidden,
  Unauthenticated,
}

impl Access {
  pub fn into_result(self) -> Result<()> {
    match self {
      Access::Allow => Ok(()),
      Access::Forbidden => Err(Error::Forbidden),
      Access::Unauthenticated => Err(Error::Unauthenticated),
    }
  }
}

/// Decide whether `actor` may mutate a resource owned by `required_owner`.
///
/// Ids are compared by value.
pub fn authorize(
  actor: Option<Uuid>,
  required_owner: Uuid,
  authenticated: bool,
) -> Access {
  match actor {
    Some(id) if authenticated => {
      if id == required_owner {
        Access::Allow
      } else {
        Access::Forbidden
      }
    }
    _ => Access::Unauthenticated,
  }
}
