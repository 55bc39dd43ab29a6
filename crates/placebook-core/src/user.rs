//! Users are owned by the external auth service; places only reference them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user row known to the store, used to resolve usernames on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  #[serde(rename = "_id")]
  pub id:         Uuid,
  pub username:   String,
  pub created_at: DateTime<Utc>,
}

/// The expanded form of a `createdBy` reference.
///
/// `username` is `None` when the referenced user is unknown to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
  #[serde(rename = "_id")]
  pub id:       Uuid,
  pub username: Option<String>,
}
