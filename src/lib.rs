//! # EV Charging Booking Service
//!
//! REST backend for locating EV charging stations and booking charging
//! slots.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, slot accounting, repository traits
//! - **application**: Booking and refund services (transactional core)
//! - **infrastructure**: Database entities, migrations, repositories
//! - **api**: REST API with Swagger documentation
//! - **auth**: JWT authentication and password hashing

pub mod api;
pub mod application;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

// Re-export API router
pub use api::create_api_router;
