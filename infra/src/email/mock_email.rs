//! Mock email gateway for development and testing.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::{info, warn};

use otp_core::errors::GatewayError;
use otp_core::services::otp::EmailGateway;

/// A message accepted by the mock gateway
#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub is_html: bool,
}

/// Mock email gateway
#[derive(Clone)]
pub struct MockEmailGateway {
    sent: Arc<Mutex<Vec<SentEmail>>>,
    simulate_failure: bool,
}

impl MockEmailGateway {
    pub fn new() -> Self {
        Self::with_options(false)
    }

    pub fn with_options(simulate_failure: bool) -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            simulate_failure,
        }
    }

    /// Number of accepted messages
    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// Last accepted message
    pub fn last_email(&self) -> Option<SentEmail> {
        self.sent.lock().unwrap().last().cloned()
    }
}

impl Default for MockEmailGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmailGateway for MockEmailGateway {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        is_html: bool,
    ) -> Result<(), GatewayError> {
        if !to.contains('@') {
            return Err(GatewayError::new(format!("Invalid email address: {to}")));
        }

        if self.simulate_failure {
            warn!(to, "Mock email gateway simulating failure");
            return Err(GatewayError::new("Simulated email sending failure"));
        }

        self.sent.lock().unwrap().push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
            is_html,
        });
        info!(to, subject, is_html, "Mock email sent");
        Ok(())
    }
}
