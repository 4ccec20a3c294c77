//! Shared slot-accounting plumbing for the transactional services.
//!
//! Every mutation of `available_slots`/`status` goes through these helpers
//! inside a caller-owned transaction: lock the station row, apply the domain
//! operation, persist the counters. Status is always derived through
//! `Station::recompute_status`, never decided at the call site.

use sea_orm::{ActiveModelTrait, DatabaseTransaction, EntityTrait, QuerySelect, Set};

use crate::domain::station::Station;
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::station;
use crate::infrastructure::database::repositories::station_repository::model_to_domain;

/// Load a station under an exclusive row lock.
pub(crate) async fn lock_station(
    txn: &DatabaseTransaction,
    station_id: i32,
) -> DomainResult<Station> {
    let model = station::Entity::find_by_id(station_id)
        .lock_exclusive()
        .one(txn)
        .await?;
    model.map(model_to_domain).ok_or(DomainError::NotFound {
        entity: "Station",
        field: "id",
        value: station_id.to_string(),
    })
}

/// Persist the slot counter and derived status of a locked station.
pub(crate) async fn persist_station_slots(
    txn: &DatabaseTransaction,
    station: &Station,
) -> DomainResult<()> {
    let active = station::ActiveModel {
        id: Set(station.id),
        available_slots: Set(station.available_slots),
        status: Set(station.status.as_str().to_string()),
        ..Default::default()
    };
    active.update(txn).await?;
    Ok(())
}

/// Return one slot to a station: lock, release, persist.
pub(crate) async fn release_station_slot(
    txn: &DatabaseTransaction,
    station_id: i32,
) -> DomainResult<()> {
    let mut station = lock_station(txn, station_id).await?;
    station.release_slot();
    persist_station_slots(txn, &station).await
}
