//! Service request domain entities and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Ticket priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Priority {
    #[serde(rename = "baixa")]
    Low,
    #[serde(rename = "media")]
    Medium,
    #[serde(rename = "alta")]
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "baixa",
            Priority::Medium => "media",
            Priority::High => "alta",
        }
    }

    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "baixa" => Ok(Priority::Low),
            "media" => Ok(Priority::Medium),
            "alta" => Ok(Priority::High),
            other => Err(AppError::BadRequest(format!("Invalid priority: {}", other))),
        }
    }
}

/// Ticket lifecycle status.
///
/// Every status is a legal target from every other status; the wire only
/// validates membership in the fixed set. Updates are admin-gated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum RequestStatus {
    #[serde(rename = "criado")]
    Created,
    #[serde(rename = "em_andamento")]
    InProgress,
    #[serde(rename = "concluido")]
    Done,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Created => "criado",
            RequestStatus::InProgress => "em_andamento",
            RequestStatus::Done => "concluido",
        }
    }

    /// Parse a wire status string; anything outside the fixed set is rejected.
    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "criado" => Ok(RequestStatus::Created),
            "em_andamento" => Ok(RequestStatus::InProgress),
            "concluido" => Ok(RequestStatus::Done),
            other => Err(AppError::BadRequest(format!("Invalid status: {}", other))),
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who supplied an attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentOrigin {
    Client,
    Admin,
}

impl AttachmentOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttachmentOrigin::Client => "client",
            AttachmentOrigin::Admin => "admin",
        }
    }
}

/// Service request domain entity
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceRequest {
    pub id: Uuid,
    /// Human-facing ticket number, sequence-assigned exactly once at creation
    pub order_number: i32,
    pub location_id: Uuid,
    pub subject: String,
    pub requester_name: String,
    pub requester_email: String,
    pub requester_phone: String,
    pub description: String,
    /// Sub-unit within the owning location
    pub unit_name: String,
    pub priority: Priority,
    pub status: RequestStatus,
    pub additional_info: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields for a service request not yet persisted.
///
/// Status and order number are assigned by the persistence layer.
#[derive(Debug, Clone)]
pub struct NewServiceRequest {
    pub location_id: Uuid,
    pub subject: String,
    pub requester_name: String,
    pub requester_email: String,
    pub requester_phone: String,
    pub description: String,
    pub unit_name: String,
    pub priority: Priority,
    pub additional_info: Option<String>,
}

/// Attachment projection for display: signed URL instead of the opaque
/// storage path, which never leaves the server.
///
/// The URL is None when signing failed transiently; read paths never fail
/// over a missing URL.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AttachmentView {
    pub id: Uuid,
    pub title: String,
    pub url: Option<String>,
}

/// Request projection for display, with resolved attachment URLs
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RequestDetail {
    #[serde(flatten)]
    pub request: ServiceRequest,
    pub attachments: Vec<AttachmentView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_strings() {
        assert_eq!(
            RequestStatus::parse("criado").unwrap(),
            RequestStatus::Created
        );
        assert_eq!(
            RequestStatus::parse("em_andamento").unwrap(),
            RequestStatus::InProgress
        );
        assert_eq!(
            RequestStatus::parse("concluido").unwrap(),
            RequestStatus::Done
        );
    }

    #[test]
    fn test_status_rejects_unknown_values() {
        assert!(RequestStatus::parse("done").is_err());
        assert!(RequestStatus::parse("CRIADO").is_err());
        assert!(RequestStatus::parse("").is_err());
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            RequestStatus::Created,
            RequestStatus::InProgress,
            RequestStatus::Done,
        ] {
            assert_eq!(RequestStatus::parse(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn test_priority_round_trip() {
        for priority in [Priority::Low, Priority::Medium, Priority::High] {
            assert_eq!(Priority::parse(priority.as_str()).unwrap(), priority);
        }
        assert!(Priority::parse("urgent").is_err());
    }
}
