//! Migration: Create boats and boat_images tables.

use sea_orm_migration::prelude::*;

use super::m20250601_000001_create_geography_tables::Districts;
use super::m20250601_000002_create_users_tables::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Boats::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Boats::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Boats::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Boats::Description).text().not_null())
                    .col(ColumnDef::new(Boats::PricePerHour).double().not_null())
                    .col(ColumnDef::new(Boats::Capacity).integer().not_null())
                    .col(
                        ColumnDef::new(Boats::IsAvailable)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Boats::AvailableFrom)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Boats::AvailableTo)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Boats::OwnerId).uuid().not_null())
                    .col(ColumnDef::new(Boats::DistrictId).uuid().not_null())
                    .col(
                        ColumnDef::new(Boats::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Boats::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_boats_owner_id")
                            .from(Boats::Table, Boats::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_boats_district_id")
                            .from(Boats::Table, Boats::DistrictId)
                            .to(Districts::Table, Districts::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BoatImages::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(BoatImages::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(BoatImages::BoatId).uuid().not_null())
                    .col(ColumnDef::new(BoatImages::ContentType).string().not_null())
                    .col(ColumnDef::new(BoatImages::Data).binary().not_null())
                    .col(
                        ColumnDef::new(BoatImages::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_boat_images_boat_id")
                            .from(BoatImages::Table, BoatImages::BoatId)
                            .to(Boats::Table, Boats::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_boats_owner_id")
                    .table(Boats::Table)
                    .col(Boats::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_boat_images_boat_id")
                    .table(BoatImages::Table)
                    .col(BoatImages::BoatId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BoatImages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Boats::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Boats {
    Table,
    Id,
    Name,
    Description,
    PricePerHour,
    Capacity,
    IsAvailable,
    AvailableFrom,
    AvailableTo,
    OwnerId,
    DistrictId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum BoatImages {
    Table,
    Id,
    BoatId,
    ContentType,
    Data,
    CreatedAt,
}
