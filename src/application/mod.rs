//! Business logic and use cases

pub mod services;

pub use services::{BookingConfig, BookingService, CancelActor, PaymentService};
