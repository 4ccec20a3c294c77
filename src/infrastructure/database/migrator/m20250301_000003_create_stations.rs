//! Create charging_stations table
//!
//! `available_slots` is a denormalized free-slot counter; the application
//! keeps it within 0..total_slots under exclusive row locks.

use sea_orm_migration::prelude::*;

use super::m20250301_000002_create_admins::Admins;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ChargingStations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ChargingStations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ChargingStations::AdminId).integer().not_null())
                    .col(
                        ColumnDef::new(ChargingStations::StationName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ChargingStations::Latitude).double().not_null())
                    .col(ColumnDef::new(ChargingStations::Longitude).double().not_null())
                    .col(
                        ColumnDef::new(ChargingStations::ConnectorType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChargingStations::ChargingWatt)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChargingStations::TotalSlots)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChargingStations::AvailableSlots)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChargingStations::PricePerKwh)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChargingStations::Status)
                            .string()
                            .not_null()
                            .default("Available"),
                    )
                    .col(ColumnDef::new(ChargingStations::Description).string())
                    .col(ColumnDef::new(ChargingStations::OperatingHours).string())
                    .col(
                        ColumnDef::new(ChargingStations::AverageWaitTime)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stations_admin")
                            .from(ChargingStations::Table, ChargingStations::AdminId)
                            .to(Admins::Table, Admins::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_stations_admin")
                    .table(ChargingStations::Table)
                    .col(ChargingStations::AdminId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_stations_connector_type")
                    .table(ChargingStations::Table)
                    .col(ChargingStations::ConnectorType)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ChargingStations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ChargingStations {
    Table,
    Id,
    AdminId,
    StationName,
    Latitude,
    Longitude,
    ConnectorType,
    ChargingWatt,
    TotalSlots,
    AvailableSlots,
    PricePerKwh,
    Status,
    Description,
    OperatingHours,
    AverageWaitTime,
}
