//! Customer (driver) account entity

use chrono::{DateTime, Utc};

/// A driver account. Credentials are stored as bcrypt hashes.
#[derive(Debug, Clone)]
pub struct Customer {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}
