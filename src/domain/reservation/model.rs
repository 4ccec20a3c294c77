//! Reservation domain entity

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

/// Reservation status
///
/// Lifecycle: Pending → Confirmed → Cancelled. The booking flow creates
/// reservations directly Confirmed; Pending is reachable only through an
/// admin override. Cancelled is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Cancelled => "Cancelled",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "Pending" => Self::Pending,
            "Cancelled" => Self::Cancelled,
            _ => Self::Confirmed,
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A customer's claim on one charging slot for a bounded time window.
#[derive(Debug, Clone)]
pub struct Reservation {
    pub id: i32,
    pub customer_id: i32,
    pub station_id: i32,
    /// Slot number assigned at booking time (1..total_slots)
    pub slot_number: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub total_price: Decimal,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    /// Whether a customer may still cancel at `now`.
    ///
    /// Customers may cancel up to `grace` after the start time; the admin
    /// path has no such restriction.
    pub fn within_cancellation_window(&self, now: DateTime<Utc>, grace: Duration) -> bool {
        self.start_time + grace >= now
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == ReservationStatus::Cancelled
    }

    /// Whether this reservation currently holds a slot.
    pub fn holds_slot(&self) -> bool {
        !self.is_cancelled()
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_reservation(start: DateTime<Utc>) -> Reservation {
        Reservation {
            id: 1,
            customer_id: 7,
            station_id: 3,
            slot_number: 1,
            start_time: start,
            end_time: start + Duration::hours(2),
            total_price: Decimal::from(350),
            status: ReservationStatus::Confirmed,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn cancellable_before_start() {
        let r = sample_reservation(Utc::now() + Duration::hours(1));
        assert!(r.within_cancellation_window(Utc::now(), Duration::minutes(5)));
    }

    #[test]
    fn cancellable_within_grace_after_start() {
        let r = sample_reservation(Utc::now() - Duration::minutes(3));
        assert!(r.within_cancellation_window(Utc::now(), Duration::minutes(5)));
    }

    #[test]
    fn not_cancellable_past_grace() {
        let r = sample_reservation(Utc::now() - Duration::minutes(10));
        assert!(!r.within_cancellation_window(Utc::now(), Duration::minutes(5)));
    }

    #[test]
    fn cancelled_reservation_holds_no_slot() {
        let mut r = sample_reservation(Utc::now());
        assert!(r.holds_slot());
        r.status = ReservationStatus::Cancelled;
        assert!(!r.holds_slot());
    }

    #[test]
    fn status_string_round_trip() {
        for status in &[
            ReservationStatus::Pending,
            ReservationStatus::Confirmed,
            ReservationStatus::Cancelled,
        ] {
            assert_eq!(&ReservationStatus::from_str(status.as_str()), status);
        }
    }
}
