//! Charging station domain entity and slot accounting

use rust_decimal::Decimal;

use crate::domain::{DomainError, DomainResult};

/// Station availability status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationStatus {
    /// At least one slot is free
    Available,
    /// All slots are taken
    Busy,
    /// Manually taken out of service by the operator
    Maintenance,
}

impl StationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Busy => "Busy",
            Self::Maintenance => "Maintenance",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "Busy" => Self::Busy,
            "Maintenance" => Self::Maintenance,
            _ => Self::Available,
        }
    }
}

impl std::fmt::Display for StationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A physical charging location with a fixed number of concurrent slots.
///
/// `available_slots` is a denormalized counter kept consistent with the set
/// of non-cancelled reservations. Every mutation of the counter goes through
/// `occupy_slot` / `release_slot` / `clamp_capacity`, which maintain the
/// invariant `0 <= available_slots <= total_slots` and recompute `status`.
#[derive(Debug, Clone)]
pub struct Station {
    pub id: i32,
    /// Owning operator account
    pub admin_id: i32,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub connector_type: String,
    /// Charger power rating in watts
    pub charging_watt: i32,
    pub total_slots: i32,
    pub available_slots: i32,
    pub price_per_kwh: Decimal,
    pub status: StationStatus,
    pub description: Option<String>,
    pub operating_hours: Option<String>,
    pub average_wait_time: i32,
}

impl Station {
    /// Claim one slot for a new reservation.
    ///
    /// Returns the assigned slot number. Slot numbers are handed out as
    /// `total_slots - available_slots + 1`; they do not track the identity of
    /// a physical slot across overlapping time windows.
    pub fn occupy_slot(&mut self) -> DomainResult<i32> {
        if self.available_slots <= 0 {
            return Err(DomainError::Capacity(format!(
                "station {} has no free slots",
                self.id
            )));
        }
        let slot_number = self.total_slots - self.available_slots + 1;
        self.available_slots -= 1;
        self.recompute_status();
        Ok(slot_number)
    }

    /// Return one slot after a cancellation or refund. Capped at capacity.
    pub fn release_slot(&mut self) {
        self.available_slots = (self.available_slots + 1).min(self.total_slots);
        self.recompute_status();
    }

    /// Apply an operator capacity edit. The free-slot counter never exceeds
    /// the new capacity; it is not reconciled against open reservations.
    pub fn clamp_capacity(&mut self, new_total: i32) {
        self.total_slots = new_total;
        self.available_slots = self.available_slots.min(new_total);
        self.recompute_status();
    }

    /// Derive `status` from the slot counter. Maintenance is a manual
    /// override and is never touched here.
    pub fn recompute_status(&mut self) {
        if self.status == StationStatus::Maintenance {
            return;
        }
        self.status = if self.available_slots == 0 {
            StationStatus::Busy
        } else {
            StationStatus::Available
        };
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn sample_station(total: i32, available: i32) -> Station {
        Station {
            id: 1,
            admin_id: 1,
            name: "Central Plaza".to_string(),
            latitude: 13.7563,
            longitude: 100.5018,
            connector_type: "CCS2".to_string(),
            charging_watt: 50_000,
            total_slots: total,
            available_slots: available,
            price_per_kwh: Decimal::new(70, 1),
            status: StationStatus::Available,
            description: None,
            operating_hours: Some("24/7".to_string()),
            average_wait_time: 0,
        }
    }

    #[test]
    fn occupy_assigns_sequential_slot_numbers() {
        let mut s = sample_station(2, 2);

        assert_eq!(s.occupy_slot().unwrap(), 1);
        assert_eq!(s.available_slots, 1);
        assert_eq!(s.status, StationStatus::Available);

        assert_eq!(s.occupy_slot().unwrap(), 2);
        assert_eq!(s.available_slots, 0);
        assert_eq!(s.status, StationStatus::Busy);
    }

    #[test]
    fn occupy_on_full_station_fails() {
        let mut s = sample_station(2, 0);
        s.recompute_status();

        let err = s.occupy_slot().unwrap_err();
        assert!(matches!(err, DomainError::Capacity(_)));
        assert_eq!(s.available_slots, 0);
    }

    #[test]
    fn release_increments_and_recomputes() {
        let mut s = sample_station(2, 0);
        s.status = StationStatus::Busy;

        s.release_slot();
        assert_eq!(s.available_slots, 1);
        assert_eq!(s.status, StationStatus::Available);
    }

    #[test]
    fn release_is_capped_at_capacity() {
        let mut s = sample_station(2, 2);
        s.release_slot();
        assert_eq!(s.available_slots, 2);
    }

    #[test]
    fn occupy_then_release_round_trips() {
        let mut s = sample_station(3, 3);
        s.occupy_slot().unwrap();
        s.release_slot();
        assert_eq!(s.available_slots, 3);
        assert_eq!(s.status, StationStatus::Available);
    }

    #[test]
    fn clamp_shrinks_available_to_new_capacity() {
        let mut s = sample_station(4, 4);
        s.clamp_capacity(2);
        assert_eq!(s.total_slots, 2);
        assert_eq!(s.available_slots, 2);
    }

    #[test]
    fn clamp_keeps_smaller_available_untouched() {
        let mut s = sample_station(4, 1);
        s.clamp_capacity(3);
        assert_eq!(s.available_slots, 1);
        assert_eq!(s.status, StationStatus::Available);
    }

    #[test]
    fn maintenance_overrides_recompute() {
        let mut s = sample_station(2, 2);
        s.status = StationStatus::Maintenance;

        s.occupy_slot().unwrap();
        assert_eq!(s.status, StationStatus::Maintenance);

        s.release_slot();
        assert_eq!(s.status, StationStatus::Maintenance);
    }

    #[test]
    fn status_string_round_trip() {
        for status in &[
            StationStatus::Available,
            StationStatus::Busy,
            StationStatus::Maintenance,
        ] {
            assert_eq!(&StationStatus::from_str(status.as_str()), status);
        }
    }
}
