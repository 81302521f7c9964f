//! Migration: Create countries, cities and districts tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Countries::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Countries::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Countries::Name).string().not_null().unique_key())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Cities::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Cities::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Cities::CountryId).uuid().not_null())
                    .col(ColumnDef::new(Cities::Name).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cities_country_id")
                            .from(Cities::Table, Cities::CountryId)
                            .to(Countries::Table, Countries::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Districts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Districts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Districts::CityId).uuid().not_null())
                    .col(ColumnDef::new(Districts::Name).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_districts_city_id")
                            .from(Districts::Table, Districts::CityId)
                            .to(Cities::Table, Cities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cities_country_id")
                    .table(Cities::Table)
                    .col(Cities::CountryId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_districts_city_id")
                    .table(Districts::Table)
                    .col(Districts::CityId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Districts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cities::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Countries::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Countries {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
pub(super) enum Cities {
    Table,
    Id,
    CountryId,
    Name,
}

#[derive(Iden)]
pub(super) enum Districts {
    Table,
    Id,
    CityId,
    Name,
}
