//! Repository provider interface
//!
//! One object granting access to every per-aggregate repository, so services
//! and handlers depend on a single `Arc<dyn RepositoryProvider>`.

use crate::domain::admin::AdminRepository;
use crate::domain::customer::CustomerRepository;
use crate::domain::payment::PaymentRepository;
use crate::domain::reservation::ReservationRepository;
use crate::domain::station::StationRepository;

pub trait RepositoryProvider: Send + Sync {
    fn customers(&self) -> &dyn CustomerRepository;

    fn admins(&self) -> &dyn AdminRepository;

    fn stations(&self) -> &dyn StationRepository;

    fn reservations(&self) -> &dyn ReservationRepository;

    fn payments(&self) -> &dyn PaymentRepository;
}
