//! Station aggregate
//!
//! Contains the Station entity, slot accounting, and repository interface.

pub mod model;
pub mod repository;

pub use model::{Station, StationStatus};
pub use repository::{StationFilter, StationRepository};
