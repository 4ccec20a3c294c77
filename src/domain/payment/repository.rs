//! Payment repository interface and read models

use async_trait::async_trait;

use super::model::{Payment, PaymentStatus};
use crate::domain::reservation::AdminScope;
use crate::domain::DomainResult;

/// A payment joined with its reservation and payer, for the admin table.
#[derive(Debug, Clone)]
pub struct PaymentRow {
    pub payment: Payment,
    pub customer_id: i32,
    pub customer_name: String,
}

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Find payment by ID
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Payment>>;

    /// Find a payment joined with payer details
    async fn find_detail(&self, id: i32) -> DomainResult<Option<PaymentRow>>;

    /// List payments visible to an admin scope, newest first
    async fn list_for_admin(&self, scope: AdminScope) -> DomainResult<Vec<Payment>>;

    /// Update the status field only; no side effects
    async fn set_status(&self, id: i32, status: PaymentStatus) -> DomainResult<Payment>;
}
