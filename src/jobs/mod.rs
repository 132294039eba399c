//! Background work dispatched outside the request/response cycle.

pub mod notification;

pub use notification::{dispatch_request_created, MailgunNotifier, Notifier};

#[cfg(test)]
pub use notification::MockNotifier;
