//! Customer repository interface

use async_trait::async_trait;

use super::model::Customer;
use crate::domain::DomainResult;

/// Fields for registering a new customer.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub email: String,
}

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Insert a new customer. Duplicate email or username yields `Conflict`.
    async fn create(&self, customer: NewCustomer) -> DomainResult<Customer>;

    /// Find customer by email
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Customer>>;

    /// Find customer by ID
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Customer>>;
}
