//! Admin repository interface

use async_trait::async_trait;

use super::model::Admin;
use crate::domain::DomainResult;

/// Fields for creating an admin account.
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub email: String,
}

#[async_trait]
pub trait AdminRepository: Send + Sync {
    /// Insert a new admin. Duplicate email or username yields `Conflict`.
    async fn create(&self, admin: NewAdmin) -> DomainResult<Admin>;

    /// Find admin by email
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Admin>>;

    /// Find admin by ID
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Admin>>;

    /// Total number of admin accounts
    async fn count(&self) -> DomainResult<u64>;
}
