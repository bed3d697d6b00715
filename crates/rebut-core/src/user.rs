//! User accounts.
//!
//! Users exist in the data model but no HTTP route reads or writes them yet;
//! debates reference them only through an unchecked `user_id`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id:          i64,
  /// Unique across the store.
  pub username:    String,
  pub password:    String,
  /// Free-form per-user settings; starts as an empty object.
  pub preferences: serde_json::Value,
  pub created_at:  DateTime<Utc>,
}

/// Input to [`crate::store::DebateStore::create_user`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewUser {
  pub username: String,
  pub password: String,
}
