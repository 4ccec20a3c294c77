//! Booking service: reservation lifecycle and slot accounting
//!
//! Each operation is one transaction. The station row is read under an
//! exclusive lock before any slot arithmetic, so concurrent bookings against
//! the same station serialize and never observe a stale counter. Any error
//! after the lock rolls the whole transaction back.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, QuerySelect, Set, TransactionTrait,
};
use tracing::info;

use crate::domain::reservation::{Reservation, ReservationStatus};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{customer, payment, reservation};
use crate::infrastructure::database::repositories::reservation_repository::model_to_domain;

use super::slots::{lock_station, persist_station_slots, release_station_slot};

/// Tunables for the booking flow.
#[derive(Debug, Clone)]
pub struct BookingConfig {
    /// Assumed charging power in kW used to estimate delivered energy
    pub charge_rate_kw: i32,
    /// How long after the start time a customer may still cancel
    pub cancellation_grace_minutes: i64,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            charge_rate_kw: 50,
            cancellation_grace_minutes: 5,
        }
    }
}

/// Who is asking for a cancellation. Customers are bound by the grace
/// window; admins are not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelActor {
    Customer,
    Admin,
}

/// A new booking request, already parsed and field-validated.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub customer_id: i32,
    pub station_id: i32,
    pub date: NaiveDate,
    pub time_slot: NaiveTime,
    pub duration_hours: i32,
    pub payment_method: String,
}

/// Summary returned to the customer after a successful booking.
#[derive(Debug, Clone)]
pub struct BookingConfirmation {
    pub reservation_id: i32,
    pub station_id: i32,
    pub station_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_hours: i32,
    pub estimated_kwh: i32,
    pub total_price: Decimal,
    pub slot_number: i32,
    pub status: ReservationStatus,
}

/// Reservation lifecycle handler.
pub struct BookingService {
    db: DatabaseConnection,
    config: BookingConfig,
}

impl BookingService {
    pub fn new(db: DatabaseConnection, config: BookingConfig) -> Self {
        Self { db, config }
    }

    fn grace(&self) -> Duration {
        Duration::minutes(self.config.cancellation_grace_minutes)
    }

    /// Create a reservation, a backing payment, and claim one slot.
    pub async fn create_reservation(
        &self,
        request: BookingRequest,
    ) -> DomainResult<BookingConfirmation> {
        if request.duration_hours <= 0 {
            return Err(DomainError::Validation(
                "duration must be at least one hour".to_string(),
            ));
        }

        let start_time = NaiveDateTime::new(request.date, request.time_slot).and_utc();
        if start_time < Utc::now() {
            return Err(DomainError::Temporal(
                "Cannot book a time in the past".to_string(),
            ));
        }
        let end_time = start_time + Duration::hours(request.duration_hours as i64);

        let txn = self.db.begin().await?;

        let payer = customer::Entity::find_by_id(request.customer_id)
            .one(&txn)
            .await?;
        if payer.is_none() {
            return Err(DomainError::NotFound {
                entity: "Customer",
                field: "id",
                value: request.customer_id.to_string(),
            });
        }

        let mut station = lock_station(&txn, request.station_id).await?;
        let slot_number = station.occupy_slot()?;

        let estimated_kwh = request.duration_hours * self.config.charge_rate_kw;
        let total_price = Decimal::from(estimated_kwh) * station.price_per_kwh;

        let now = Utc::now();
        let inserted = reservation::ActiveModel {
            customer_id: Set(request.customer_id),
            station_id: Set(request.station_id),
            slot_number: Set(slot_number),
            start_time: Set(start_time),
            end_time: Set(end_time),
            total_price: Set(total_price),
            status: Set(ReservationStatus::Confirmed.as_str().to_string()),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        payment::ActiveModel {
            reservation_id: Set(inserted.id),
            amount: Set(total_price),
            payment_method: Set(request.payment_method.clone()),
            payment_status: Set("Pending".to_string()),
            payment_date: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        persist_station_slots(&txn, &station).await?;
        txn.commit().await?;

        info!(
            "Reservation {} confirmed: station {} slot {} ({} kWh, {})",
            inserted.id, station.id, slot_number, estimated_kwh, total_price
        );

        Ok(BookingConfirmation {
            reservation_id: inserted.id,
            station_id: station.id,
            station_name: station.name,
            start_time,
            end_time,
            duration_hours: request.duration_hours,
            estimated_kwh,
            total_price,
            slot_number,
            status: ReservationStatus::Confirmed,
        })
    }

    /// Cancel a reservation and release its slot.
    pub async fn cancel_reservation(
        &self,
        reservation_id: i32,
        actor: CancelActor,
    ) -> DomainResult<Reservation> {
        let txn = self.db.begin().await?;

        let model = reservation::Entity::find_by_id(reservation_id)
            .lock_exclusive()
            .one(&txn)
            .await?;
        let Some(model) = model else {
            return Err(DomainError::NotFound {
                entity: "Reservation",
                field: "id",
                value: reservation_id.to_string(),
            });
        };
        let existing = model_to_domain(model.clone());

        if existing.is_cancelled() {
            return Err(DomainError::AlreadyCancelled(reservation_id));
        }

        if actor == CancelActor::Customer
            && !existing.within_cancellation_window(Utc::now(), self.grace())
        {
            return Err(DomainError::Temporal(format!(
                "This reservation started at {}. You can only cancel before it starts.",
                existing.start_time.to_rfc3339()
            )));
        }

        let mut active: reservation::ActiveModel = model.into();
        active.status = Set(ReservationStatus::Cancelled.as_str().to_string());
        let updated = active.update(&txn).await?;

        release_station_slot(&txn, existing.station_id).await?;
        txn.commit().await?;

        info!("Reservation {} cancelled", reservation_id);
        Ok(model_to_domain(updated))
    }

    /// Admin override of a reservation status. Releases the slot only when
    /// moving into Cancelled from a non-Cancelled state.
    pub async fn admin_set_status(
        &self,
        reservation_id: i32,
        new_status: ReservationStatus,
    ) -> DomainResult<Reservation> {
        let txn = self.db.begin().await?;

        let model = reservation::Entity::find_by_id(reservation_id)
            .lock_exclusive()
            .one(&txn)
            .await?;
        let Some(model) = model else {
            return Err(DomainError::NotFound {
                entity: "Reservation",
                field: "id",
                value: reservation_id.to_string(),
            });
        };

        let old_status = ReservationStatus::from_str(&model.status);
        let station_id = model.station_id;

        let mut active: reservation::ActiveModel = model.into();
        active.status = Set(new_status.as_str().to_string());
        let updated = active.update(&txn).await?;

        if new_status == ReservationStatus::Cancelled && old_status != ReservationStatus::Cancelled
        {
            release_station_slot(&txn, station_id).await?;
        }
        txn.commit().await?;

        info!(
            "Reservation {} status: {} -> {}",
            reservation_id, old_status, new_status
        );
        Ok(model_to_domain(updated))
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Timelike;
    use sea_orm::{ConnectOptions, Database};
    use sea_orm_migration::MigratorTrait;

    use crate::domain::station::StationStatus;
    use crate::infrastructure::database::entities::{admin, station};
    use crate::infrastructure::database::migrator::Migrator;

    pub(crate) async fn setup_db() -> DatabaseConnection {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1);
        let db = Database::connect(options).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        db
    }

    pub(crate) async fn seed_accounts(db: &DatabaseConnection) -> (i32, i32) {
        let admin = admin::ActiveModel {
            username: Set("operator1".to_string()),
            password_hash: Set("hash".to_string()),
            name: Set("Operator".to_string()),
            email: Set("operator@example.com".to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap();

        let driver = customer::ActiveModel {
            username: Set("driver1".to_string()),
            password_hash: Set("hash".to_string()),
            name: Set("Driver".to_string()),
            email: Set("driver@example.com".to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap();

        (admin.id, driver.id)
    }

    pub(crate) async fn seed_station(
        db: &DatabaseConnection,
        admin_id: i32,
        total_slots: i32,
        price_per_kwh: Decimal,
    ) -> i32 {
        let model = station::ActiveModel {
            admin_id: Set(admin_id),
            station_name: Set("Central Plaza".to_string()),
            latitude: Set(13.7563),
            longitude: Set(100.5018),
            connector_type: Set("CCS2".to_string()),
            charging_watt: Set(50_000),
            total_slots: Set(total_slots),
            available_slots: Set(total_slots),
            price_per_kwh: Set(price_per_kwh),
            status: Set("Available".to_string()),
            description: Set(None),
            operating_hours: Set(Some("24/7".to_string())),
            average_wait_time: Set(0),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap();
        model.id
    }

    pub(crate) fn booking_request(customer_id: i32, station_id: i32) -> BookingRequest {
        let start = Utc::now() + Duration::days(1);
        BookingRequest {
            customer_id,
            station_id,
            date: start.date_naive(),
            time_slot: NaiveTime::from_hms_opt(start.hour(), 0, 0).unwrap(),
            duration_hours: 1,
            payment_method: "Card".to_string(),
        }
    }

    async fn station_state(db: &DatabaseConnection, id: i32) -> (i32, StationStatus) {
        let model = station::Entity::find_by_id(id).one(db).await.unwrap().unwrap();
        (model.available_slots, StationStatus::from_str(&model.status))
    }

    fn service(db: &DatabaseConnection) -> BookingService {
        BookingService::new(db.clone(), BookingConfig::default())
    }

    #[tokio::test]
    async fn booking_computes_price_and_claims_slot() {
        let db = setup_db().await;
        let (admin_id, customer_id) = seed_accounts(&db).await;
        let station_id = seed_station(&db, admin_id, 2, Decimal::new(70, 1)).await;
        let svc = service(&db);

        let confirmation = svc
            .create_reservation(booking_request(customer_id, station_id))
            .await
            .unwrap();

        assert_eq!(confirmation.estimated_kwh, 50);
        assert_eq!(confirmation.total_price, Decimal::from(350));
        assert_eq!(confirmation.slot_number, 1);
        assert_eq!(confirmation.status, ReservationStatus::Confirmed);

        let (available, status) = station_state(&db, station_id).await;
        assert_eq!(available, 1);
        assert_eq!(status, StationStatus::Available);
    }

    #[tokio::test]
    async fn filling_the_station_sets_busy_and_rejects_overflow() {
        let db = setup_db().await;
        let (admin_id, customer_id) = seed_accounts(&db).await;
        let station_id = seed_station(&db, admin_id, 2, Decimal::new(70, 1)).await;
        let svc = service(&db);

        let first = svc
            .create_reservation(booking_request(customer_id, station_id))
            .await
            .unwrap();
        let second = svc
            .create_reservation(booking_request(customer_id, station_id))
            .await
            .unwrap();
        assert_eq!(first.slot_number, 1);
        assert_eq!(second.slot_number, 2);

        let (available, status) = station_state(&db, station_id).await;
        assert_eq!(available, 0);
        assert_eq!(status, StationStatus::Busy);

        let err = svc
            .create_reservation(booking_request(customer_id, station_id))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Capacity(_)));

        // Counters untouched by the failed attempt.
        let (available, _) = station_state(&db, station_id).await;
        assert_eq!(available, 0);
    }

    #[tokio::test]
    async fn booking_in_the_past_is_rejected() {
        let db = setup_db().await;
        let (admin_id, customer_id) = seed_accounts(&db).await;
        let station_id = seed_station(&db, admin_id, 2, Decimal::new(70, 1)).await;
        let svc = service(&db);

        let start = Utc::now() - Duration::days(1);
        let request = BookingRequest {
            date: start.date_naive(),
            time_slot: NaiveTime::from_hms_opt(start.hour(), 0, 0).unwrap(),
            ..booking_request(customer_id, station_id)
        };

        let err = svc.create_reservation(request).await.unwrap_err();
        assert!(matches!(err, DomainError::Temporal(_)));

        let (available, _) = station_state(&db, station_id).await;
        assert_eq!(available, 2);
    }

    #[tokio::test]
    async fn booking_unknown_station_is_not_found() {
        let db = setup_db().await;
        let (_, customer_id) = seed_accounts(&db).await;
        let svc = service(&db);

        let err = svc
            .create_reservation(booking_request(customer_id, 999))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Station", .. }));
    }

    #[tokio::test]
    async fn cancel_releases_the_slot_and_round_trips() {
        let db = setup_db().await;
        let (admin_id, customer_id) = seed_accounts(&db).await;
        let station_id = seed_station(&db, admin_id, 2, Decimal::new(70, 1)).await;
        let svc = service(&db);

        let confirmation = svc
            .create_reservation(booking_request(customer_id, station_id))
            .await
            .unwrap();
        let (available, _) = station_state(&db, station_id).await;
        assert_eq!(available, 1);

        let cancelled = svc
            .cancel_reservation(confirmation.reservation_id, CancelActor::Customer)
            .await
            .unwrap();
        assert_eq!(cancelled.status, ReservationStatus::Cancelled);

        let (available, status) = station_state(&db, station_id).await;
        assert_eq!(available, 2);
        assert_eq!(status, StationStatus::Available);
    }

    #[tokio::test]
    async fn double_cancel_is_rejected_and_counters_hold() {
        let db = setup_db().await;
        let (admin_id, customer_id) = seed_accounts(&db).await;
        let station_id = seed_station(&db, admin_id, 2, Decimal::new(70, 1)).await;
        let svc = service(&db);

        let confirmation = svc
            .create_reservation(booking_request(customer_id, station_id))
            .await
            .unwrap();
        svc.cancel_reservation(confirmation.reservation_id, CancelActor::Customer)
            .await
            .unwrap();

        let err = svc
            .cancel_reservation(confirmation.reservation_id, CancelActor::Customer)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::AlreadyCancelled(_)));

        let (available, _) = station_state(&db, station_id).await;
        assert_eq!(available, 2);
    }

    #[tokio::test]
    async fn customer_cannot_cancel_past_grace_but_admin_can() {
        let db = setup_db().await;
        let (admin_id, customer_id) = seed_accounts(&db).await;
        let station_id = seed_station(&db, admin_id, 2, Decimal::new(70, 1)).await;
        let svc = service(&db);

        let confirmation = svc
            .create_reservation(booking_request(customer_id, station_id))
            .await
            .unwrap();

        // Push the start time past the grace window.
        let model = reservation::Entity::find_by_id(confirmation.reservation_id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        let mut active: reservation::ActiveModel = model.into();
        active.start_time = Set(Utc::now() - Duration::minutes(10));
        active.update(&db).await.unwrap();

        let err = svc
            .cancel_reservation(confirmation.reservation_id, CancelActor::Customer)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Temporal(_)));
        let (available, _) = station_state(&db, station_id).await;
        assert_eq!(available, 1);

        svc.cancel_reservation(confirmation.reservation_id, CancelActor::Admin)
            .await
            .unwrap();
        let (available, _) = station_state(&db, station_id).await;
        assert_eq!(available, 2);
    }

    #[tokio::test]
    async fn admin_status_override_releases_slot_once() {
        let db = setup_db().await;
        let (admin_id, customer_id) = seed_accounts(&db).await;
        let station_id = seed_station(&db, admin_id, 2, Decimal::new(70, 1)).await;
        let svc = service(&db);

        let confirmation = svc
            .create_reservation(booking_request(customer_id, station_id))
            .await
            .unwrap();

        let updated = svc
            .admin_set_status(confirmation.reservation_id, ReservationStatus::Pending)
            .await
            .unwrap();
        assert_eq!(updated.status, ReservationStatus::Pending);
        let (available, _) = station_state(&db, station_id).await;
        assert_eq!(available, 1);

        svc.admin_set_status(confirmation.reservation_id, ReservationStatus::Cancelled)
            .await
            .unwrap();
        let (available, _) = station_state(&db, station_id).await;
        assert_eq!(available, 2);

        // Setting Cancelled again must not release another slot.
        svc.admin_set_status(confirmation.reservation_id, ReservationStatus::Cancelled)
            .await
            .unwrap();
        let (available, _) = station_state(&db, station_id).await;
        assert_eq!(available, 2);
    }

    #[tokio::test]
    async fn maintenance_station_keeps_status_through_booking() {
        let db = setup_db().await;
        let (admin_id, customer_id) = seed_accounts(&db).await;
        let station_id = seed_station(&db, admin_id, 2, Decimal::new(70, 1)).await;

        let model = station::Entity::find_by_id(station_id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        let mut active: station::ActiveModel = model.into();
        active.status = Set("Maintenance".to_string());
        active.update(&db).await.unwrap();

        let svc = service(&db);
        svc.create_reservation(booking_request(customer_id, station_id))
            .await
            .unwrap();

        let (available, status) = station_state(&db, station_id).await;
        assert_eq!(available, 1);
        assert_eq!(status, StationStatus::Maintenance);
    }
}
