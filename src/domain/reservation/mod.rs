//! Reservation aggregate
//!
//! Contains the Reservation entity, read models, and repository interface.

pub mod model;
pub mod repository;

pub use model::{Reservation, ReservationStatus};
pub use repository::{
    AdminReservationRow, AdminScope, BookingRow, DashboardStats, ReservationFilter,
    ReservationPage, ReservationRepository, Suggestion,
};
