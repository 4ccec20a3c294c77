//! SeaORM repository implementations

pub mod admin_repository;
pub mod customer_repository;
pub mod payment_repository;
pub mod repository_provider;
pub mod reservation_repository;
pub mod station_repository;

pub use repository_provider::SeaOrmRepositoryProvider;
