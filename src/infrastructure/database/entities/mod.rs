//! SeaORM entity definitions

pub mod admin;
pub mod customer;
pub mod payment;
pub mod reservation;
pub mod station;
