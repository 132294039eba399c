//! New-request notification job.
//!
//! Administrators are emailed whenever a service request is opened. The
//! send runs detached from the request handler: a mail outage slows down
//! nobody and the request itself is already committed.
//!
//! When Mailgun credentials are absent the rendered email is logged
//! instead of sent, which keeps development environments quiet.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::Config;
use crate::domain::{AdminContact, Location, ServiceRequest};
use crate::errors::{AppError, AppResult};

#[cfg(test)]
use mockall::automock;

/// Notification capability consumed by the request workflow.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Notify administrators that a request was opened.
    async fn request_created(
        &self,
        request: &ServiceRequest,
        location: &Location,
        admins: &[AdminContact],
    ) -> AppResult<()>;
}

/// Fire a notification without blocking the caller.
///
/// Failures are logged; the request is already durable by the time this
/// runs, so there is nothing to roll back.
pub fn dispatch_request_created(
    notifier: Arc<dyn Notifier>,
    request: ServiceRequest,
    location: Location,
    admins: Vec<AdminContact>,
) {
    tokio::spawn(async move {
        if let Err(e) = notifier.request_created(&request, &location, &admins).await {
            tracing::error!(
                request_id = %request.id,
                order_number = request.order_number,
                error = %e,
                "Failed to send new-request notification"
            );
        }
    });
}

/// Mailgun-backed notifier.
pub struct MailgunNotifier {
    client: reqwest::Client,
    api_key: Option<String>,
    domain: String,
    sender: String,
}

impl MailgunNotifier {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.mailgun_api_key.clone(),
            domain: config.mailgun_domain.clone(),
            sender: config.mail_sender.clone(),
        }
    }

    fn messages_url(&self) -> String {
        format!("https://api.mailgun.net/v3/{}/messages", self.domain)
    }
}

#[async_trait]
impl Notifier for MailgunNotifier {
    async fn request_created(
        &self,
        request: &ServiceRequest,
        location: &Location,
        admins: &[AdminContact],
    ) -> AppResult<()> {
        if admins.is_empty() {
            tracing::warn!(
                request_id = %request.id,
                "No administrators registered; skipping notification"
            );
            return Ok(());
        }

        let subject = format!(
            "Nova solicitação #{}: {}",
            request.order_number, request.subject
        );
        let body = render_request_created(request, location);

        let api_key = match &self.api_key {
            Some(key) => key,
            None => {
                // Development mode: log the email instead of sending
                tracing::info!(
                    to = %admins[0].email,
                    subject = %subject,
                    "Mailgun not configured - logging notification instead of sending\n{}",
                    body
                );
                return Ok(());
            }
        };

        // First admin in the To field, remaining ones in copy
        let to = admins[0].email.clone();
        let cc = admins[1..]
            .iter()
            .map(|a| a.email.as_str())
            .collect::<Vec<_>>()
            .join(",");

        let mut form = vec![
            ("from", self.sender.clone()),
            ("to", to),
            ("subject", subject),
            ("html", body),
        ];
        if !cc.is_empty() {
            form.push(("cc", cc));
        }

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth("api", Some(api_key))
            .form(&form)
            .send()
            .await
            .map_err(|e| AppError::internal(format!("Mailgun request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::internal(format!(
                "Mailgun rejected notification with status {}",
                response.status()
            )));
        }

        tracing::info!(
            request_id = %request.id,
            order_number = request.order_number,
            recipients = admins.len(),
            "New-request notification sent"
        );

        Ok(())
    }
}

/// Render the notification email body.
fn render_request_created(request: &ServiceRequest, location: &Location) -> String {
    let additional = request
        .additional_info
        .as_deref()
        .unwrap_or("-");

    format!(
        "<h2>Nova solicitação de serviço</h2>\
         <p><strong>Ordem de serviço:</strong> #{order}</p>\
         <p><strong>Assunto:</strong> {subject}</p>\
         <p><strong>Local:</strong> {location} - {city}/{state}</p>\
         <p><strong>Unidade:</strong> {unit}</p>\
         <p><strong>Prioridade:</strong> {priority}</p>\
         <p><strong>Solicitante:</strong> {name} ({email}, {phone})</p>\
         <p><strong>Descrição:</strong></p>\
         <p>{description}</p>\
         <p><strong>Informações adicionais:</strong> {additional}</p>",
        order = request.order_number,
        subject = request.subject,
        location = location.name,
        city = location.city,
        state = location.state,
        unit = request.unit_name,
        priority = request.priority.as_str(),
        name = request.requester_name,
        email = request.requester_email,
        phone = request.requester_phone,
        description = request.description,
        additional = additional,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Priority, RequestStatus};
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_request() -> ServiceRequest {
        ServiceRequest {
            id: Uuid::new_v4(),
            order_number: 42,
            location_id: Uuid::new_v4(),
            subject: "Lâmpada queimada".to_string(),
            requester_name: "Maria Silva".to_string(),
            requester_email: "maria@example.com".to_string(),
            requester_phone: "11999990000".to_string(),
            description: "Corredor do segundo andar sem iluminação".to_string(),
            unit_name: "Bloco B".to_string(),
            priority: Priority::High,
            status: RequestStatus::Created,
            additional_info: None,
            created_at: Utc::now(),
        }
    }

    fn sample_location() -> Location {
        Location {
            id: Uuid::new_v4(),
            name: "PREFEITURA CENTRAL".to_string(),
            city: "SAO PAULO".to_string(),
            state: "SP".to_string(),
        }
    }

    #[test]
    fn test_render_includes_order_number_and_subject() {
        let body = render_request_created(&sample_request(), &sample_location());
        assert!(body.contains("#42"));
        assert!(body.contains("Lâmpada queimada"));
        assert!(body.contains("PREFEITURA CENTRAL"));
        assert!(body.contains("alta"));
    }

    #[test]
    fn test_render_defaults_missing_additional_info() {
        let body = render_request_created(&sample_request(), &sample_location());
        assert!(body.contains("Informações adicionais:</strong> -"));
    }
}
