//! SeaORM entity for service requests.

use chrono::Utc;
use sea_orm::entity::prelude::*;

use crate::domain::{self, Priority, RequestStatus};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "service_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Assigned by the `service_order_seq` sequence on insert
    #[sea_orm(unique)]
    pub order_number: i32,
    pub location_id: Uuid,
    pub subject: String,
    pub requester_name: String,
    pub requester_email: String,
    pub requester_phone: String,
    pub description: String,
    pub unit_name: String,
    pub priority: String,
    pub status: String,
    pub additional_info: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::location::Entity",
        from = "Column::LocationId",
        to = "super::location::Column::Id",
        on_delete = "Cascade"
    )]
    Location,
    #[sea_orm(has_many = "super::attachment::Entity")]
    Attachments,
}

impl Related<super::location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

impl Related<super::attachment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attachments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for domain::ServiceRequest {
    type Error = AppError;

    /// A stored priority or status outside the fixed wire sets means the
    /// row was corrupted out of band; fail loudly instead of misreporting
    /// the ticket.
    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let priority = Priority::parse(&model.priority).map_err(|_| {
            AppError::internal(format!(
                "Request {} has unknown stored priority '{}'",
                model.id, model.priority
            ))
        })?;
        let status = RequestStatus::parse(&model.status).map_err(|_| {
            AppError::internal(format!(
                "Request {} has unknown stored status '{}'",
                model.id, model.status
            ))
        })?;

        Ok(Self {
            id: model.id,
            order_number: model.order_number,
            location_id: model.location_id,
            subject: model.subject,
            requester_name: model.requester_name,
            requester_email: model.requester_email,
            requester_phone: model.requester_phone,
            description: model.description,
            unit_name: model.unit_name,
            priority,
            status,
            additional_info: model.additional_info,
            created_at: model.created_at.with_timezone(&Utc),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_with(priority: &str, status: &str) -> Model {
        Model {
            id: Uuid::new_v4(),
            order_number: 7,
            location_id: Uuid::new_v4(),
            subject: "Subject".to_string(),
            requester_name: "Name".to_string(),
            requester_email: "name@example.com".to_string(),
            requester_phone: "11999990000".to_string(),
            description: "Description".to_string(),
            unit_name: "Unit".to_string(),
            priority: priority.to_string(),
            status: status.to_string(),
            additional_info: None,
            created_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_stored_wire_values_convert() {
        let request = domain::ServiceRequest::try_from(model_with("media", "em_andamento")).unwrap();

        assert_eq!(request.priority, Priority::Medium);
        assert_eq!(request.status, RequestStatus::InProgress);
    }

    #[test]
    fn test_corrupt_stored_priority_is_surfaced() {
        let result = domain::ServiceRequest::try_from(model_with("urgent", "criado"));

        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[test]
    fn test_corrupt_stored_status_is_surfaced() {
        let result = domain::ServiceRequest::try_from(model_with("baixa", "done"));

        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
