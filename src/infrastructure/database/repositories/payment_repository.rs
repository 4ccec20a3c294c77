//! SeaORM implementation of PaymentRepository
//!
//! Refunds are not handled here: the refund cascade lives in the payment
//! service, which owns the transaction and lock ordering.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};

use crate::domain::payment::{Payment, PaymentRepository, PaymentRow, PaymentStatus};
use crate::domain::reservation::AdminScope;
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{customer, payment, reservation, station};

pub struct SeaOrmPaymentRepository {
    db: DatabaseConnection,
}

impl SeaOrmPaymentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

pub(crate) fn model_to_domain(m: payment::Model) -> Payment {
    Payment {
        id: m.id,
        reservation_id: m.reservation_id,
        amount: m.amount,
        method: m.payment_method,
        status: PaymentStatus::from_str(&m.payment_status),
        payment_date: m.payment_date,
    }
}

#[async_trait]
impl PaymentRepository for SeaOrmPaymentRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Payment>> {
        let model = payment::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn find_detail(&self, id: i32) -> DomainResult<Option<PaymentRow>> {
        let Some((payment_model, reservation_model)) = payment::Entity::find_by_id(id)
            .find_also_related(reservation::Entity)
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };
        let Some(reservation_model) = reservation_model else {
            return Ok(None);
        };

        let payer = customer::Entity::find_by_id(reservation_model.customer_id)
            .one(&self.db)
            .await?;

        Ok(Some(PaymentRow {
            payment: model_to_domain(payment_model),
            customer_id: reservation_model.customer_id,
            customer_name: payer.map(|c| c.name).unwrap_or_default(),
        }))
    }

    async fn list_for_admin(&self, scope: AdminScope) -> DomainResult<Vec<Payment>> {
        let mut query = payment::Entity::find()
            .join(JoinType::InnerJoin, payment::Relation::Reservation.def());

        if let AdminScope::Admin(admin_id) = scope {
            query = query
                .join(JoinType::InnerJoin, reservation::Relation::Station.def())
                .filter(station::Column::AdminId.eq(admin_id));
        }

        let models = query
            .order_by_desc(payment::Column::PaymentDate)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn set_status(&self, id: i32, status: PaymentStatus) -> DomainResult<Payment> {
        let existing = payment::Entity::find_by_id(id).one(&self.db).await?;
        let Some(existing) = existing else {
            return Err(DomainError::NotFound {
                entity: "Payment",
                field: "id",
                value: id.to_string(),
            });
        };

        let mut active: payment::ActiveModel = existing.into();
        active.payment_status = Set(status.as_str().to_string());
        let updated = active.update(&self.db).await?;
        Ok(model_to_domain(updated))
    }
}
