//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::admin::AdminRepository;
use crate::domain::customer::CustomerRepository;
use crate::domain::payment::PaymentRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::reservation::ReservationRepository;
use crate::domain::station::StationRepository;

use super::admin_repository::SeaOrmAdminRepository;
use super::customer_repository::SeaOrmCustomerRepository;
use super::payment_repository::SeaOrmPaymentRepository;
use super::reservation_repository::SeaOrmReservationRepository;
use super::station_repository::SeaOrmStationRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let station = repos.stations().find_by_id(1).await?;
/// let bookings = repos.reservations().list_for_customer(7).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    customers: SeaOrmCustomerRepository,
    admins: SeaOrmAdminRepository,
    stations: SeaOrmStationRepository,
    reservations: SeaOrmReservationRepository,
    payments: SeaOrmPaymentRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            customers: SeaOrmCustomerRepository::new(db.clone()),
            admins: SeaOrmAdminRepository::new(db.clone()),
            stations: SeaOrmStationRepository::new(db.clone()),
            reservations: SeaOrmReservationRepository::new(db.clone()),
            payments: SeaOrmPaymentRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn customers(&self) -> &dyn CustomerRepository {
        &self.customers
    }

    fn admins(&self) -> &dyn AdminRepository {
        &self.admins
    }

    fn stations(&self) -> &dyn StationRepository {
        &self.stations
    }

    fn reservations(&self) -> &dyn ReservationRepository {
        &self.reservations
    }

    fn payments(&self) -> &dyn PaymentRepository {
        &self.payments
    }
}
