//! User accounts and their public projection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub user_id:       Uuid,
  pub username:      String,
  /// PHC string produced by argon2. Never serialised.
  #[serde(skip_serializing, default)]
  pub password_hash: String,
  pub created_at:    DateTime<Utc>,
}

impl User {
  pub fn profile(&self) -> Profile {
    Profile {
      user_id:  self.user_id,
      username: Some(self.username.clone()),
    }
  }
}

/// Input to [`crate::store::MovieStore::add_user`].
#[derive(Debug, Clone)]
pub struct NewUser {
  pub username:      String,
  pub password_hash: String,
}

/// The public face of a user as embedded in owner and author fields.
/// `username` is `None` when the referenced account no longer resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
  pub user_id:  Uuid,
  pub username: Option<String>,
}

impl Profile {
  pub fn unresolved(user_id: Uuid) -> Self {
    Self { user_id, username: None }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn password_hash_is_never_serialised() {
    let user = User {
      user_id:       Uuid::new_v4(),
      username:      "alice".into(),
      password_hash: "$argon2id$v=19$secret".into(),
      created_at:    Utc::now(),
    };
    let json = serde_json::to_string(&user).unwrap();
    assert!(!json.contains("password"));
    assert!(!json.contains("argon2"));
    assert!(json.contains("alice"));
  }
}
