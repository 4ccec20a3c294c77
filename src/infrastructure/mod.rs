//! External concerns: database storage and connection management

pub mod database;

pub use database::{init_database, DatabaseConfig};
pub use database::repositories::SeaOrmRepositoryProvider;
