//! User domain model

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A registered user account
///
/// The `password_hash` is an argon2 PHC string. It is compared only through
/// the hash function's verify operation and is never included in serialized
/// output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}
