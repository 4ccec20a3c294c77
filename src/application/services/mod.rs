//! Application services

pub mod booking;
pub mod payments;
mod slots;

pub use booking::{
    BookingConfig, BookingConfirmation, BookingRequest, BookingService, CancelActor,
};
pub use payments::PaymentService;
