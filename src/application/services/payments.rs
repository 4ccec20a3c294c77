//! Payment service: refund processing
//!
//! A refund reverses a payment and cascades into reservation cancellation
//! and slot release, all inside one transaction. Lock order is payment,
//! reservation, station; the same order as the booking side touches them in
//! reverse-cascade, with the station row always last.

use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, QuerySelect, Set, TransactionTrait,
};
use tracing::info;

use crate::domain::payment::{Payment, PaymentStatus};
use crate::domain::reservation::ReservationStatus;
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{payment, reservation};
use crate::infrastructure::database::repositories::payment_repository::model_to_domain;

use super::slots::release_station_slot;

/// Refund handler.
pub struct PaymentService {
    db: DatabaseConnection,
}

impl PaymentService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Refund a payment: mark it Refunded, cancel its reservation, release
    /// the slot. Refunding an already-Refunded payment is refused.
    pub async fn refund(&self, payment_id: i32) -> DomainResult<Payment> {
        let txn = self.db.begin().await?;

        let payment_model = payment::Entity::find_by_id(payment_id)
            .lock_exclusive()
            .one(&txn)
            .await?;
        let Some(payment_model) = payment_model else {
            return Err(DomainError::NotFound {
                entity: "Payment",
                field: "id",
                value: payment_id.to_string(),
            });
        };

        if PaymentStatus::from_str(&payment_model.payment_status) == PaymentStatus::Refunded {
            return Err(DomainError::AlreadyRefunded(payment_id));
        }

        let reservation_model = reservation::Entity::find_by_id(payment_model.reservation_id)
            .lock_exclusive()
            .one(&txn)
            .await?;
        let Some(reservation_model) = reservation_model else {
            return Err(DomainError::NotFound {
                entity: "Reservation",
                field: "id",
                value: payment_model.reservation_id.to_string(),
            });
        };

        let was_cancelled =
            ReservationStatus::from_str(&reservation_model.status) == ReservationStatus::Cancelled;
        let station_id = reservation_model.station_id;
        let reservation_id = reservation_model.id;

        let mut active_payment: payment::ActiveModel = payment_model.into();
        active_payment.payment_status = Set(PaymentStatus::Refunded.as_str().to_string());
        let refunded = active_payment.update(&txn).await?;

        let mut active_reservation: reservation::ActiveModel = reservation_model.into();
        active_reservation.status = Set(ReservationStatus::Cancelled.as_str().to_string());
        active_reservation.update(&txn).await?;

        // The slot was already returned if the reservation had been
        // cancelled through another path.
        if !was_cancelled {
            release_station_slot(&txn, station_id).await?;
        }
        txn.commit().await?;

        info!(
            "Payment {} refunded, reservation {} cancelled",
            payment_id, reservation_id
        );
        Ok(model_to_domain(refunded))
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use sea_orm::ColumnTrait;
    use sea_orm::QueryFilter;

    use crate::application::services::booking::tests::{
        booking_request, seed_accounts, seed_station, setup_db,
    };
    use crate::application::services::booking::{BookingConfig, BookingService, CancelActor};
    use crate::domain::station::StationStatus;
    use crate::infrastructure::database::entities::station;

    async fn station_state(db: &DatabaseConnection, id: i32) -> (i32, StationStatus) {
        let model = station::Entity::find_by_id(id).one(db).await.unwrap().unwrap();
        (model.available_slots, StationStatus::from_str(&model.status))
    }

    async fn payment_for_reservation(db: &DatabaseConnection, reservation_id: i32) -> i32 {
        payment::Entity::find()
            .filter(payment::Column::ReservationId.eq(reservation_id))
            .one(db)
            .await
            .unwrap()
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn refund_cascades_into_cancellation_and_slot_release() {
        let db = setup_db().await;
        let (admin_id, customer_id) = seed_accounts(&db).await;
        let station_id = seed_station(&db, admin_id, 1, Decimal::new(70, 1)).await;
        let booking = BookingService::new(db.clone(), BookingConfig::default());
        let payments = PaymentService::new(db.clone());

        let confirmation = booking
            .create_reservation(booking_request(customer_id, station_id))
            .await
            .unwrap();
        let (available, status) = station_state(&db, station_id).await;
        assert_eq!(available, 0);
        assert_eq!(status, StationStatus::Busy);

        let payment_id = payment_for_reservation(&db, confirmation.reservation_id).await;
        let refunded = payments.refund(payment_id).await.unwrap();
        assert_eq!(refunded.status, PaymentStatus::Refunded);

        let reservation_model = reservation::Entity::find_by_id(confirmation.reservation_id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reservation_model.status, "Cancelled");

        let (available, status) = station_state(&db, station_id).await;
        assert_eq!(available, 1);
        assert_eq!(status, StationStatus::Available);
    }

    #[tokio::test]
    async fn refund_is_idempotent_guarded() {
        let db = setup_db().await;
        let (admin_id, customer_id) = seed_accounts(&db).await;
        let station_id = seed_station(&db, admin_id, 2, Decimal::new(70, 1)).await;
        let booking = BookingService::new(db.clone(), BookingConfig::default());
        let payments = PaymentService::new(db.clone());

        let confirmation = booking
            .create_reservation(booking_request(customer_id, station_id))
            .await
            .unwrap();
        let payment_id = payment_for_reservation(&db, confirmation.reservation_id).await;

        payments.refund(payment_id).await.unwrap();
        let err = payments.refund(payment_id).await.unwrap_err();
        assert!(matches!(err, DomainError::AlreadyRefunded(_)));

        // The second attempt must not release another slot.
        let (available, _) = station_state(&db, station_id).await;
        assert_eq!(available, 2);
    }

    #[tokio::test]
    async fn refund_after_customer_cancel_does_not_double_release() {
        let db = setup_db().await;
        let (admin_id, customer_id) = seed_accounts(&db).await;
        let station_id = seed_station(&db, admin_id, 2, Decimal::new(70, 1)).await;
        let booking = BookingService::new(db.clone(), BookingConfig::default());
        let payments = PaymentService::new(db.clone());

        let confirmation = booking
            .create_reservation(booking_request(customer_id, station_id))
            .await
            .unwrap();
        booking
            .cancel_reservation(confirmation.reservation_id, CancelActor::Customer)
            .await
            .unwrap();
        let (available, _) = station_state(&db, station_id).await;
        assert_eq!(available, 2);

        let payment_id = payment_for_reservation(&db, confirmation.reservation_id).await;
        payments.refund(payment_id).await.unwrap();

        let (available, _) = station_state(&db, station_id).await;
        assert_eq!(available, 2);
    }

    #[tokio::test]
    async fn refund_unknown_payment_is_not_found() {
        let db = setup_db().await;
        let payments = PaymentService::new(db.clone());

        let err = payments.refund(12345).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Payment", .. }));
    }
}
