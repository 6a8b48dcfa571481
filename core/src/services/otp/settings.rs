//! Process-wide OTP settings, read once per engine call.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::errors::OtpResult;

/// Default pin length
pub const DEFAULT_PIN_LENGTH: usize = 6;

/// Default pin alphabet (numeric pins)
pub const DEFAULT_ALPHABET: &str = "0123456789";

/// Default lifetime of an issued pin in seconds (5 minutes)
pub const DEFAULT_LIFETIME_SECS: i64 = 300;

/// Default SMS/email body template
pub const DEFAULT_BODY_TEMPLATE: &str = "Your one-time pin is {{password}}";

/// Default email subject template
pub const DEFAULT_SUBJECT_TEMPLATE: &str = "One Time Pin";

/// Default email-link body template (HTML)
pub const DEFAULT_EMAIL_BODY_TEMPLATE: &str =
    r#"<p>Follow <a href="{{token}}">this link</a> to continue, user {{userid}}.</p>"#;

/// Default email-link subject template
pub const DEFAULT_EMAIL_SUBJECT_TEMPLATE: &str = "Confirm your request";

/// Mutable, process-wide OTP settings
///
/// A snapshot is taken at the start of every send/resend/verify call and
/// never cached beyond call scope, so an update takes effect on the next
/// call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpSettings {
    /// Number of characters in a generated pin
    pub pin_length: usize,
    /// Alphabet pins are drawn from
    pub alphabet: String,
    /// Lifetime applied when neither the caller nor a config supplies one
    pub default_lifetime_secs: i64,
    /// Global bypass: skip dispatch on send and succeed every verify
    pub ignore_otp_validation: bool,
    /// Body template for SMS and plain email
    pub default_body_template: String,
    /// Subject template for plain email
    pub default_subject_template: String,
    /// Body template for email links (HTML)
    pub default_email_body_template: String,
    /// Subject template for email links
    pub default_email_subject_template: String,
}

impl Default for OtpSettings {
    fn default() -> Self {
        Self {
            pin_length: DEFAULT_PIN_LENGTH,
            alphabet: DEFAULT_ALPHABET.to_string(),
            default_lifetime_secs: DEFAULT_LIFETIME_SECS,
            ignore_otp_validation: false,
            default_body_template: DEFAULT_BODY_TEMPLATE.to_string(),
            default_subject_template: DEFAULT_SUBJECT_TEMPLATE.to_string(),
            default_email_body_template: DEFAULT_EMAIL_BODY_TEMPLATE.to_string(),
            default_email_subject_template: DEFAULT_EMAIL_SUBJECT_TEMPLATE.to_string(),
        }
    }
}

/// Access to the settings store
#[async_trait]
pub trait SettingsProvider: Send + Sync {
    /// Current settings snapshot
    async fn get(&self) -> OtpResult<OtpSettings>;
    /// Replace the settings, effective for subsequent calls
    async fn set(&self, settings: OtpSettings) -> OtpResult<()>;
}

/// In-memory reference implementation of [`SettingsProvider`]
#[derive(Clone)]
pub struct InMemorySettingsProvider {
    settings: Arc<RwLock<OtpSettings>>,
}

impl InMemorySettingsProvider {
    pub fn new(settings: OtpSettings) -> Self {
        Self {
            settings: Arc::new(RwLock::new(settings)),
        }
    }
}

impl Default for InMemorySettingsProvider {
    fn default() -> Self {
        Self::new(OtpSettings::default())
    }
}

#[async_trait]
impl SettingsProvider for InMemorySettingsProvider {
    async fn get(&self) -> OtpResult<OtpSettings> {
        Ok(self.settings.read().await.clone())
    }

    async fn set(&self, settings: OtpSettings) -> OtpResult<()> {
        *self.settings.write().await = settings;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = OtpSettings::default();
        assert_eq!(settings.pin_length, 6);
        assert_eq!(settings.alphabet, "0123456789");
        assert_eq!(settings.default_lifetime_secs, 300);
        assert!(!settings.ignore_otp_validation);
        assert!(settings.default_body_template.contains("{{password}}"));
        assert!(settings.default_email_body_template.contains("{{token}}"));
    }

    #[tokio::test]
    async fn test_update_visible_on_next_get() {
        let provider = InMemorySettingsProvider::default();

        let mut settings = provider.get().await.unwrap();
        settings.pin_length = 8;
        settings.ignore_otp_validation = true;
        provider.set(settings).await.unwrap();

        let reread = provider.get().await.unwrap();
        assert_eq!(reread.pin_length, 8);
        assert!(reread.ignore_otp_validation);
    }
}
