//! Gateway traits for SMS and email dispatch.

use async_trait::async_trait;

use crate::errors::GatewayError;

/// Trait for SMS gateway integration
#[async_trait]
pub trait SmsGateway: Send + Sync {
    /// Send a text message; SMS has no subject line
    async fn send_sms(&self, to: &str, body: &str) -> Result<(), GatewayError>;
}

/// Trait for email gateway integration
#[async_trait]
pub trait EmailGateway: Send + Sync {
    /// Send an email; `is_html` marks the body as rich content
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        is_html: bool,
    ) -> Result<(), GatewayError>;
}
