//! Admin (station operator) account entity

use chrono::{DateTime, Utc};

/// An operator account owning one or more stations.
#[derive(Debug, Clone)]
pub struct Admin {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}
