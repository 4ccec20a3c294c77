//! Station repository interface

use async_trait::async_trait;

use super::model::Station;
use crate::domain::DomainResult;

/// Read-side filters for the public station listing.
#[derive(Debug, Default, Clone)]
pub struct StationFilter {
    /// Substring match on the station name
    pub search: Option<String>,
    /// Exact connector type
    pub connector_type: Option<String>,
    /// Only stations with free slots
    pub only_available: bool,
}

#[async_trait]
pub trait StationRepository: Send + Sync {
    /// Insert a new station. `available_slots` starts at `total_slots`.
    async fn create(&self, station: Station) -> DomainResult<Station>;

    /// Find station by ID
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Station>>;

    /// List stations matching the filter, ordered by ID
    async fn list(&self, filter: &StationFilter) -> DomainResult<Vec<Station>>;

    /// List all stations owned by an admin
    async fn list_for_admin(&self, admin_id: i32) -> DomainResult<Vec<Station>>;

    /// Persist an operator edit. Capacity changes clamp `available_slots`
    /// under an exclusive row lock.
    async fn update(&self, station: Station) -> DomainResult<Station>;

    /// Delete a station and, by cascade, its reservations
    async fn delete(&self, id: i32) -> DomainResult<()>;
}
