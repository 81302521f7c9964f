//! Boat listing entity.

use sea_orm::entity::prelude::*;

use crate::domain::{Boat, BoatFields};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "boats")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Double")]
    pub price_per_hour: f64,
    pub capacity: i32,
    pub is_available: bool,
    pub available_from: DateTimeUtc,
    pub available_to: DateTimeUtc,
    pub owner_id: Uuid,
    pub district_id: Uuid,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Owner,
    #[sea_orm(
        belongs_to = "super::district::Entity",
        from = "Column::DistrictId",
        to = "super::district::Column::Id"
    )]
    District,
    #[sea_orm(has_many = "super::boat_image::Entity")]
    Images,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::district::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::District.def()
    }
}

impl Related<super::boat_image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Images.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Boat {
    fn from(model: Model) -> Self {
        Boat {
            id: model.id,
            owner_id: model.owner_id,
            fields: BoatFields {
                name: model.name,
                description: model.description,
                price_per_hour: model.price_per_hour,
                capacity: model.capacity,
                is_available: model.is_available,
                available_from: model.available_from,
                available_to: model.available_to,
                district_id: model.district_id,
            },
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
