//! SeaORM implementation of ReservationRepository
//!
//! Read-side only: inserts and status transitions go through the booking
//! and payment services, which own the transaction/locking discipline.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};

use crate::domain::reservation::{
    AdminReservationRow, AdminScope, BookingRow, DashboardStats, Reservation, ReservationFilter,
    ReservationPage, ReservationRepository, ReservationStatus, Suggestion,
};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::{customer, reservation, station};

pub struct SeaOrmReservationRepository {
    db: DatabaseConnection,
}

impl SeaOrmReservationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

pub(crate) fn model_to_domain(m: reservation::Model) -> Reservation {
    Reservation {
        id: m.id,
        customer_id: m.customer_id,
        station_id: m.station_id,
        slot_number: m.slot_number,
        start_time: m.start_time,
        end_time: m.end_time,
        total_price: m.total_price,
        status: ReservationStatus::from_str(&m.status),
        created_at: m.created_at,
    }
}

/// Apply admin scoping plus the optional listing filters to a reservation
/// query that has customer and station joined.
fn apply_admin_filters(
    mut query: sea_orm::Select<reservation::Entity>,
    scope: AdminScope,
    filter: &ReservationFilter,
) -> sea_orm::Select<reservation::Entity> {
    if let AdminScope::Admin(admin_id) = scope {
        query = query.filter(station::Column::AdminId.eq(admin_id));
    }
    if let Some(status) = filter.status {
        query = query.filter(reservation::Column::Status.eq(status.as_str()));
    }
    if let Some(station_id) = filter.station_id {
        query = query.filter(reservation::Column::StationId.eq(station_id));
    }
    if let Some(search) = &filter.search {
        query = query.filter(
            Condition::any()
                .add(customer::Column::Name.contains(search))
                .add(station::Column::StationName.contains(search)),
        );
    }
    query
}

// ── ReservationRepository impl ──────────────────────────────────

#[async_trait]
impl ReservationRepository for SeaOrmReservationRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>> {
        let model = reservation::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn list_for_customer(&self, customer_id: i32) -> DomainResult<Vec<BookingRow>> {
        let rows = reservation::Entity::find()
            .find_also_related(station::Entity)
            .filter(reservation::Column::CustomerId.eq(customer_id))
            .order_by_desc(reservation::Column::StartTime)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(r, s)| {
                let s = s?;
                Some(BookingRow {
                    reservation: model_to_domain(r),
                    station_name: s.station_name,
                    station_latitude: s.latitude,
                    station_longitude: s.longitude,
                })
            })
            .collect())
    }

    async fn list_for_admin(
        &self,
        scope: AdminScope,
        filter: &ReservationFilter,
        page: u64,
        per_page: u64,
    ) -> DomainResult<ReservationPage> {
        let query = reservation::Entity::find()
            .join(JoinType::InnerJoin, reservation::Relation::Station.def())
            .join(JoinType::InnerJoin, reservation::Relation::Customer.def());
        let query = apply_admin_filters(query, scope, filter)
            .order_by_desc(reservation::Column::StartTime);

        let paginator = query.paginate(&self.db, per_page.max(1));
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.saturating_sub(1)).await?;

        // Resolve display names in one batch per table.
        let customer_ids: Vec<i32> = models.iter().map(|m| m.customer_id).collect();
        let station_ids: Vec<i32> = models.iter().map(|m| m.station_id).collect();

        let customers: HashMap<i32, String> = customer::Entity::find()
            .filter(customer::Column::Id.is_in(customer_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();
        let stations: HashMap<i32, String> = station::Entity::find()
            .filter(station::Column::Id.is_in(station_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|s| (s.id, s.station_name))
            .collect();

        let rows = models
            .into_iter()
            .map(|m| AdminReservationRow {
                customer_name: customers.get(&m.customer_id).cloned().unwrap_or_default(),
                station_name: stations.get(&m.station_id).cloned().unwrap_or_default(),
                reservation: model_to_domain(m),
            })
            .collect();

        Ok(ReservationPage { rows, total })
    }

    async fn suggestions(&self, scope: AdminScope, search: &str) -> DomainResult<Vec<Suggestion>> {
        let mut customer_query = customer::Entity::find()
            .select_only()
            .column(customer::Column::Name)
            .distinct()
            .join(JoinType::InnerJoin, customer::Relation::Reservations.def())
            .join(JoinType::InnerJoin, reservation::Relation::Station.def())
            .filter(customer::Column::Name.contains(search))
            .limit(10);
        let mut station_query = station::Entity::find()
            .select_only()
            .column(station::Column::StationName)
            .distinct()
            .join(JoinType::InnerJoin, station::Relation::Reservations.def())
            .filter(station::Column::StationName.contains(search))
            .limit(10);

        if let AdminScope::Admin(admin_id) = scope {
            customer_query = customer_query.filter(station::Column::AdminId.eq(admin_id));
            station_query = station_query.filter(station::Column::AdminId.eq(admin_id));
        }

        let customer_names: Vec<String> = customer_query.into_tuple().all(&self.db).await?;
        let station_names: Vec<String> = station_query.into_tuple().all(&self.db).await?;

        let mut suggestions: Vec<Suggestion> = customer_names
            .into_iter()
            .map(|name| Suggestion {
                suggestion: name,
                kind: "User",
            })
            .chain(station_names.into_iter().map(|name| Suggestion {
                suggestion: name,
                kind: "Station",
            }))
            .collect();
        suggestions.truncate(10);
        Ok(suggestions)
    }

    async fn dashboard_stats(
        &self,
        scope: AdminScope,
        now: DateTime<Utc>,
    ) -> DomainResult<DashboardStats> {
        let scoped = |query: sea_orm::Select<reservation::Entity>| {
            let query =
                query.join(JoinType::InnerJoin, reservation::Relation::Station.def());
            match scope {
                AdminScope::All => query,
                AdminScope::Admin(admin_id) => {
                    query.filter(station::Column::AdminId.eq(admin_id))
                }
            }
        };

        let total_reservations = scoped(reservation::Entity::find()).count(&self.db).await?;

        let pending_approvals = scoped(reservation::Entity::find())
            .filter(reservation::Column::Status.eq(ReservationStatus::Pending.as_str()))
            .count(&self.db)
            .await?;

        let total_revenue: Option<Option<Decimal>> = scoped(reservation::Entity::find())
            .select_only()
            .column_as(reservation::Column::TotalPrice.sum(), "revenue")
            .filter(reservation::Column::Status.ne(ReservationStatus::Cancelled.as_str()))
            .into_tuple()
            .one(&self.db)
            .await?;

        let daily_revenue: Option<Option<Decimal>> = scoped(reservation::Entity::find())
            .select_only()
            .column_as(reservation::Column::TotalPrice.sum(), "revenue")
            .filter(reservation::Column::Status.ne(ReservationStatus::Cancelled.as_str()))
            .filter(reservation::Column::StartTime.gte(now - Duration::hours(24)))
            .into_tuple()
            .one(&self.db)
            .await?;

        let mut station_query = station::Entity::find()
            .filter(station::Column::Status.ne("Maintenance"));
        if let AdminScope::Admin(admin_id) = scope {
            station_query = station_query.filter(station::Column::AdminId.eq(admin_id));
        }
        let active_stations = station_query.count(&self.db).await?;

        Ok(DashboardStats {
            total_reservations,
            pending_approvals,
            total_revenue: total_revenue.flatten().unwrap_or(Decimal::ZERO),
            daily_revenue: daily_revenue.flatten().unwrap_or(Decimal::ZERO),
            active_stations,
        })
    }
}
