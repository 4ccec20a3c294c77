//! Payment domain entity

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PaymentStatus {
    Pending,
    Success,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Success => "Success",
            Self::Failed => "Failed",
            Self::Refunded => "Refunded",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "Success" => Self::Success,
            "Failed" => Self::Failed,
            "Refunded" => Self::Refunded,
            _ => Self::Pending,
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A payment backing exactly one reservation. Created together with the
/// reservation; refunding it cascades into cancellation and slot release.
#[derive(Debug, Clone)]
pub struct Payment {
    pub id: i32,
    pub reservation_id: i32,
    pub amount: Decimal,
    pub method: String,
    pub status: PaymentStatus,
    pub payment_date: DateTime<Utc>,
}

impl Payment {
    pub fn is_refunded(&self) -> bool {
        self.status == PaymentStatus::Refunded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_string_round_trip() {
        for status in &[
            PaymentStatus::Pending,
            PaymentStatus::Success,
            PaymentStatus::Failed,
            PaymentStatus::Refunded,
        ] {
            assert_eq!(&PaymentStatus::from_str(status.as_str()), status);
        }
    }

    #[test]
    fn unknown_status_defaults_to_pending() {
        assert_eq!(PaymentStatus::from_str("???"), PaymentStatus::Pending);
    }
}
