//! Named OTP configuration resolved by (module, name).

use serde::{Deserialize, Serialize};

use super::otp_record::SendChannel;

/// Subject/body template attached to an [`OtpConfig`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationTemplate {
    /// Subject line; ignored for SMS
    pub subject: Option<String>,
    /// Message body with `{{password}}` / `{{token}}` placeholders
    pub body: String,
    /// Disabled templates fail config-driven sends fast
    pub enabled: bool,
}

/// External, read-only OTP configuration
///
/// Describes how a named flow (e.g. `accounts/password-reset`) delivers
/// its pins: channel, recipient resolution, template and lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpConfig {
    /// Owning module name, first half of the lookup key
    pub module: String,
    /// Config name, second half of the lookup key
    pub name: String,
    /// Delivery channel for pins issued under this config
    pub channel: SendChannel,
    /// Action type stamped onto issued records (composite key part)
    pub action_type: Option<String>,
    /// Recipient type stamped onto issued records
    pub recipient_type: Option<String>,
    /// Lifetime in seconds; falls back to the settings default when absent
    pub lifetime_secs: Option<i64>,
    /// Template used for rendering; must be present and enabled for
    /// config-driven sends
    pub template: Option<NotificationTemplate>,
}

impl OtpConfig {
    /// Returns the template if it is present and enabled
    pub fn enabled_template(&self) -> Option<&NotificationTemplate> {
        self.template.as_ref().filter(|t| t.enabled)
    }
}
