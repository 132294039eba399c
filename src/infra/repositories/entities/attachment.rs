//! SeaORM entity for request attachments.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "attachments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    /// Opaque blob locator; never serialized to clients
    pub storage_path: String,
    pub origin: String,
    pub request_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::service_request::Entity",
        from = "Column::RequestId",
        to = "super::service_request::Column::Id",
        on_delete = "Cascade"
    )]
    ServiceRequest,
}

impl Related<super::service_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceRequest.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
