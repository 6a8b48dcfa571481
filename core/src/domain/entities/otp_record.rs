//! OTP record entity - the persisted unit of one issuance.

use chrono::{DateTime, Utc};
use constant_time_eq::constant_time_eq;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Delivery channel for a one-time pin
///
/// The channel decides both the gateway used for dispatch and the
/// placeholder set of the rendered template: SMS/Email substitute
/// `{{password}}`, EmailLink substitutes `{{token}}`/`{{userid}}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SendChannel {
    /// Pin delivered as a text message
    Sms,
    /// Pin delivered in a plain-text email
    Email,
    /// Opaque token embedded in an emailed deep link (HTML body)
    EmailLink,
}

impl SendChannel {
    /// Whether this channel carries an opaque link token rather than a pin
    pub fn is_link(&self) -> bool {
        matches!(self, SendChannel::EmailLink)
    }
}

/// Delivery outcome recorded on the OTP record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SendStatus {
    /// Gateway accepted the message
    Sent,
    /// Gateway rejected or timed out; error text captured on the record
    Failed,
    /// Delivery skipped because the global bypass flag was set
    Ignored,
}

/// Secondary lookup key for callers that did not retain the operation id
/// (e.g. page-reload resend flows)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompositeKey {
    pub module_name: String,
    pub action_type: String,
    pub source_entity_id: String,
}

/// Persisted OTP record
///
/// Created exactly once by a send operation. Only a resend may mutate it,
/// and only the `sent_on`, `status`, `error_message` and `expires_on`
/// fields. The secret is never exposed through any response DTO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpRecord {
    /// Globally unique identifier of this issuance, primary key
    pub operation_id: Uuid,

    /// The pin or link token; set once at creation, never mutated
    pub secret: String,

    /// Destination address or number
    pub send_to: String,

    /// Delivery channel
    pub channel: SendChannel,

    /// Composite-key parts (set on config-driven sends)
    pub module_name: Option<String>,
    pub action_type: Option<String>,
    pub source_entity_id: Option<String>,

    /// Free-form linkage to a business entity
    pub recipient_id: Option<String>,
    pub recipient_type: Option<String>,

    /// When dispatch was last attempted
    pub sent_on: Option<DateTime<Utc>>,

    /// Hard validity deadline; always set before the record is saved
    pub expires_on: DateTime<Utc>,

    /// Delivery outcome
    pub status: SendStatus,

    /// Gateway error text when `status` is `Failed`
    pub error_message: Option<String>,
}

impl OtpRecord {
    /// Checks whether the record is past its validity deadline
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_on
    }

    /// Compares a presented secret in constant time
    pub fn matches(&self, presented: &str) -> bool {
        self.secret.len() == presented.len()
            && constant_time_eq(self.secret.as_bytes(), presented.as_bytes())
    }

    /// Returns the composite key if all three parts are present
    pub fn composite_key(&self) -> Option<CompositeKey> {
        match (&self.module_name, &self.action_type, &self.source_entity_id) {
            (Some(module), Some(action), Some(source)) => Some(CompositeKey {
                module_name: module.clone(),
                action_type: action.clone(),
                source_entity_id: source.clone(),
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(expires_on: DateTime<Utc>) -> OtpRecord {
        OtpRecord {
            operation_id: Uuid::new_v4(),
            secret: "123456".to_string(),
            send_to: "+27821234567".to_string(),
            channel: SendChannel::Sms,
            module_name: None,
            action_type: None,
            source_entity_id: None,
            recipient_id: None,
            recipient_type: None,
            sent_on: Some(Utc::now()),
            expires_on,
            status: SendStatus::Sent,
            error_message: None,
        }
    }

    #[test]
    fn test_is_expired() {
        assert!(!record(Utc::now() + Duration::seconds(60)).is_expired());
        assert!(record(Utc::now() - Duration::seconds(1)).is_expired());
    }

    #[test]
    fn test_matches_is_exact() {
        let rec = record(Utc::now() + Duration::seconds(60));
        assert!(rec.matches("123456"));
        assert!(!rec.matches("123457"));
        assert!(!rec.matches("12345"));
        assert!(!rec.matches("1234567"));
    }

    #[test]
    fn test_composite_key_requires_all_parts() {
        let mut rec = record(Utc::now() + Duration::seconds(60));
        assert!(rec.composite_key().is_none());

        rec.module_name = Some("accounts".to_string());
        rec.action_type = Some("password-reset".to_string());
        assert!(rec.composite_key().is_none());

        rec.source_entity_id = Some("42".to_string());
        let key = rec.composite_key().unwrap();
        assert_eq!(key.module_name, "accounts");
        assert_eq!(key.action_type, "password-reset");
        assert_eq!(key.source_entity_id, "42");
    }

    #[test]
    fn test_serialization_round_trip() {
        let rec = record(Utc::now() + Duration::seconds(60));
        let json = serde_json::to_string(&rec).unwrap();
        let back: OtpRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(rec, back);
    }
}
