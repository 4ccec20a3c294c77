//! SeaORM implementation of StationRepository
//!
//! Operator edits that change capacity run inside a transaction holding an
//! exclusive row lock, so the clamp of `available_slots` never races with a
//! concurrent booking.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

use crate::domain::station::{Station, StationFilter, StationRepository, StationStatus};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::station;

pub struct SeaOrmStationRepository {
    db: DatabaseConnection,
}

impl SeaOrmStationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

pub(crate) fn model_to_domain(m: station::Model) -> Station {
    Station {
        id: m.id,
        admin_id: m.admin_id,
        name: m.station_name,
        latitude: m.latitude,
        longitude: m.longitude,
        connector_type: m.connector_type,
        charging_watt: m.charging_watt,
        total_slots: m.total_slots,
        available_slots: m.available_slots,
        price_per_kwh: m.price_per_kwh,
        status: StationStatus::from_str(&m.status),
        description: m.description,
        operating_hours: m.operating_hours,
        average_wait_time: m.average_wait_time,
    }
}

fn domain_to_active(s: &Station) -> station::ActiveModel {
    station::ActiveModel {
        id: Set(s.id),
        admin_id: Set(s.admin_id),
        station_name: Set(s.name.clone()),
        latitude: Set(s.latitude),
        longitude: Set(s.longitude),
        connector_type: Set(s.connector_type.clone()),
        charging_watt: Set(s.charging_watt),
        total_slots: Set(s.total_slots),
        available_slots: Set(s.available_slots),
        price_per_kwh: Set(s.price_per_kwh),
        status: Set(s.status.as_str().to_string()),
        description: Set(s.description.clone()),
        operating_hours: Set(s.operating_hours.clone()),
        average_wait_time: Set(s.average_wait_time),
    }
}

// ── StationRepository impl ──────────────────────────────────────

#[async_trait]
impl StationRepository for SeaOrmStationRepository {
    async fn create(&self, s: Station) -> DomainResult<Station> {
        tracing::debug!("Creating station: {}", s.name);

        let model = station::ActiveModel {
            admin_id: Set(s.admin_id),
            station_name: Set(s.name.clone()),
            latitude: Set(s.latitude),
            longitude: Set(s.longitude),
            connector_type: Set(s.connector_type.clone()),
            charging_watt: Set(s.charging_watt),
            total_slots: Set(s.total_slots),
            available_slots: Set(s.total_slots),
            price_per_kwh: Set(s.price_per_kwh),
            status: Set(s.status.as_str().to_string()),
            description: Set(s.description.clone()),
            operating_hours: Set(s.operating_hours.clone()),
            average_wait_time: Set(s.average_wait_time),
            ..Default::default()
        };
        let inserted = model.insert(&self.db).await?;
        Ok(model_to_domain(inserted))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Station>> {
        let model = station::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn list(&self, filter: &StationFilter) -> DomainResult<Vec<Station>> {
        let mut query = station::Entity::find();

        if let Some(search) = &filter.search {
            query = query.filter(station::Column::StationName.contains(search));
        }
        if let Some(connector_type) = &filter.connector_type {
            query = query.filter(station::Column::ConnectorType.eq(connector_type));
        }
        if filter.only_available {
            query = query.filter(station::Column::AvailableSlots.gt(0));
        }

        let models = query
            .order_by_asc(station::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn list_for_admin(&self, admin_id: i32) -> DomainResult<Vec<Station>> {
        let models = station::Entity::find()
            .filter(station::Column::AdminId.eq(admin_id))
            .order_by_asc(station::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn update(&self, s: Station) -> DomainResult<Station> {
        let txn = self.db.begin().await?;

        let existing = station::Entity::find_by_id(s.id)
            .lock_exclusive()
            .one(&txn)
            .await?;
        let Some(existing) = existing else {
            return Err(DomainError::NotFound {
                entity: "Station",
                field: "id",
                value: s.id.to_string(),
            });
        };

        // Re-apply the capacity clamp against the locked counter, not the
        // caller's stale snapshot.
        let mut updated = s;
        updated.available_slots = existing.available_slots;
        updated.clamp_capacity(updated.total_slots);

        let saved = domain_to_active(&updated).update(&txn).await?;
        txn.commit().await?;
        Ok(model_to_domain(saved))
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let res = station::Entity::delete_by_id(id).exec(&self.db).await?;
        if res.rows_affected == 0 {
            return Err(DomainError::NotFound {
                entity: "Station",
                field: "id",
                value: id.to_string(),
            });
        }
        Ok(())
    }
}
