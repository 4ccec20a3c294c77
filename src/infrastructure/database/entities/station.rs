//! Charging station entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "charging_stations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub admin_id: i32,
    pub station_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub connector_type: String,
    pub charging_watt: i32,
    pub total_slots: i32,

    /// Free-slot counter, 0..total_slots. Mutated only inside locking
    /// transactions.
    pub available_slots: i32,

    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price_per_kwh: Decimal,

    /// Station status: Available, Busy, Maintenance
    pub status: String,

    #[sea_orm(nullable)]
    pub description: Option<String>,

    #[sea_orm(nullable)]
    pub operating_hours: Option<String>,

    pub average_wait_time: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::admin::Entity",
        from = "Column::AdminId",
        to = "super::admin::Column::Id"
    )]
    Admin,

    #[sea_orm(has_many = "super::reservation::Entity")]
    Reservations,
}

impl Related<super::admin::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Admin.def()
    }
}

impl Related<super::reservation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reservations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
