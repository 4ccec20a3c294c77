//! Core business entities, types and traits

pub mod admin;
pub mod customer;
pub mod error;
pub mod payment;
pub mod repositories;
pub mod reservation;
pub mod station;

pub use error::{DomainError, DomainResult};
pub use repositories::RepositoryProvider;
