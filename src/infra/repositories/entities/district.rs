use sea_orm::entity::prelude::*;

use crate::domain::District;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "districts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub city_id: Uuid,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::city::Entity",
        from = "Column::CityId",
        to = "super::city::Column::Id",
        on_delete = "Cascade"
    )]
    City,
    #[sea_orm(has_many = "super::boat::Entity")]
    Boats,
}

impl Related<super::city::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::City.def()
    }
}

impl Related<super::boat::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Boats.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for District {
    fn from(model: Model) -> Self {
        District {
            id: model.id,
            city_id: model.city_id,
            name: model.name,
        }
    }
}
