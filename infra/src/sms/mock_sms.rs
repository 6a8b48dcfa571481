//! Mock SMS gateway for development and testing.
//!
//! Logs messages instead of sending them, validates phone numbers and
//! tracks a message counter so tests can assert on delivery.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::{info, warn};

use otp_core::errors::GatewayError;
use otp_core::services::otp::SmsGateway;

use super::{is_valid_phone_number, mask_phone_number};

/// Mock SMS gateway
#[derive(Clone)]
pub struct MockSmsGateway {
    /// Counter of accepted messages
    message_count: Arc<AtomicU64>,
    /// Recorded (phone, body) pairs for assertions
    messages: Arc<Mutex<Vec<(String, String)>>>,
    /// Whether to simulate provider failures
    simulate_failure: bool,
    /// Whether to print accepted messages to the log
    console_output: bool,
}

impl MockSmsGateway {
    pub fn new() -> Self {
        Self::with_options(true, false)
    }

    pub fn with_options(console_output: bool, simulate_failure: bool) -> Self {
        Self {
            message_count: Arc::new(AtomicU64::new(0)),
            messages: Arc::new(Mutex::new(Vec::new())),
            simulate_failure,
            console_output,
        }
    }

    /// Total number of accepted messages
    pub fn message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    /// Last accepted (phone, body) pair
    pub fn last_message(&self) -> Option<(String, String)> {
        self.messages.lock().unwrap().last().cloned()
    }
}

impl Default for MockSmsGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SmsGateway for MockSmsGateway {
    async fn send_sms(&self, to: &str, body: &str) -> Result<(), GatewayError> {
        if !is_valid_phone_number(to) {
            return Err(GatewayError::new(format!(
                "Invalid phone number format: {}",
                mask_phone_number(to)
            )));
        }

        if self.simulate_failure {
            warn!(
                phone = %mask_phone_number(to),
                "Mock SMS gateway simulating failure"
            );
            return Err(GatewayError::new("Simulated SMS sending failure"));
        }

        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;
        self.messages
            .lock()
            .unwrap()
            .push((to.to_string(), body.to_string()));

        if self.console_output {
            info!(
                phone = %mask_phone_number(to),
                message = body,
                total_sent = count,
                "Mock SMS sent"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_records_message() {
        let gateway = MockSmsGateway::with_options(false, false);
        gateway
            .send_sms("+27821234567", "Your one-time pin is 123456")
            .await
            .unwrap();

        assert_eq!(gateway.message_count(), 1);
        let (phone, body) = gateway.last_message().unwrap();
        assert_eq!(phone, "+27821234567");
        assert!(body.contains("123456"));
    }

    #[tokio::test]
    async fn test_invalid_phone_rejected() {
        let gateway = MockSmsGateway::with_options(false, false);
        let err = gateway.send_sms("12 monkeys", "hi").await.unwrap_err();
        assert!(err.to_string().contains("Invalid phone number"));
        assert_eq!(gateway.message_count(), 0);
    }

    #[tokio::test]
    async fn test_non_ascii_destination_is_an_error_not_a_panic() {
        let gateway = MockSmsGateway::with_options(false, false);
        let err = gateway.send_sms("零八二一二三四五", "hi").await.unwrap_err();
        assert!(err.to_string().contains("Invalid phone number"));
        assert_eq!(gateway.message_count(), 0);
    }

    #[tokio::test]
    async fn test_simulated_failure() {
        let gateway = MockSmsGateway::with_options(false, true);
        let err = gateway
            .send_sms("+27821234567", "hi")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Simulated"));
        assert_eq!(gateway.message_count(), 0);
    }
}
