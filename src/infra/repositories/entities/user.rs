//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{User, UserType};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub name: String,
    #[sea_orm(unique)]
    pub phone_number: Option<String>,
    pub user_type: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::user_credential::Entity")]
    Credential,
    #[sea_orm(has_many = "super::boat::Entity")]
    Boats,
}

impl Related<super::user_credential::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Credential.def()
    }
}

impl Related<super::boat::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Boats.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for User {
    fn from(model: Model) -> Self {
        User {
            id: model.id,
            email: model.email,
            name: model.name,
            phone_number: model.phone_number,
            user_type: UserType::from(model.user_type.as_str()),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
