//! Boat photo, stored inline as bytes.

use sea_orm::entity::prelude::*;

use crate::domain::BoatImage;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "boat_images")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub boat_id: Uuid,
    pub content_type: String,
    pub data: Vec<u8>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::boat::Entity",
        from = "Column::BoatId",
        to = "super::boat::Column::Id",
        on_delete = "Cascade"
    )]
    Boat,
}

impl Related<super::boat::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Boat.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for BoatImage {
    fn from(model: Model) -> Self {
        BoatImage {
            id: model.id,
            boat_id: model.boat_id,
            content_type: model.content_type,
            data: model.data,
        }
    }
}
