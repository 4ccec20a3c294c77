//! API data transfer objects

pub mod common;

pub use common::{ApiResponse, PaginatedResponse};
