//! Reservation repository interface and read models

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::model::{Reservation, ReservationStatus};
use crate::domain::DomainResult;

/// Scope for admin-facing queries: the whole fleet or one admin's stations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminScope {
    All,
    Admin(i32),
}

/// Filters for the admin reservation listing.
#[derive(Debug, Default, Clone)]
pub struct ReservationFilter {
    pub status: Option<ReservationStatus>,
    pub station_id: Option<i32>,
    /// Substring match on customer name or station name
    pub search: Option<String>,
}

/// A customer's booking joined with its station, as shown in the user
/// dashboard.
#[derive(Debug, Clone)]
pub struct BookingRow {
    pub reservation: Reservation,
    pub station_name: String,
    pub station_latitude: f64,
    pub station_longitude: f64,
}

/// One row of the admin reservation table.
#[derive(Debug, Clone)]
pub struct AdminReservationRow {
    pub reservation: Reservation,
    pub customer_name: String,
    pub station_name: String,
}

/// Aggregate dashboard figures. "Daily" figures use a rolling 24-hour
/// window ending now.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    pub total_reservations: u64,
    pub pending_approvals: u64,
    pub total_revenue: Decimal,
    pub daily_revenue: Decimal,
    pub active_stations: u64,
}

/// A search suggestion for the admin reservation filter box.
#[derive(Debug, Clone)]
pub struct Suggestion {
    pub suggestion: String,
    /// "User" or "Station"
    pub kind: &'static str,
}

/// A page of admin reservation rows.
#[derive(Debug, Clone)]
pub struct ReservationPage {
    pub rows: Vec<AdminReservationRow>,
    pub total: u64,
}

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Find reservation by ID
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>>;

    /// List a customer's bookings with station details, newest first
    async fn list_for_customer(&self, customer_id: i32) -> DomainResult<Vec<BookingRow>>;

    /// List reservations visible to an admin scope, filtered and paginated
    /// (1-based page)
    async fn list_for_admin(
        &self,
        scope: AdminScope,
        filter: &ReservationFilter,
        page: u64,
        per_page: u64,
    ) -> DomainResult<ReservationPage>;

    /// Distinct customer/station name suggestions matching a search term
    async fn suggestions(&self, scope: AdminScope, search: &str) -> DomainResult<Vec<Suggestion>>;

    /// Dashboard aggregates for an admin scope
    async fn dashboard_stats(&self, scope: AdminScope, now: DateTime<Utc>)
        -> DomainResult<DashboardStats>;
}
