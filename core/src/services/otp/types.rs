//! Input and response DTOs for the OTP engine.
//!
//! Responses never carry the secret; callers learn it only through the
//! delivery channel.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::otp_record::SendChannel;

/// Input for a plain (config-less) send
#[derive(Debug, Clone)]
pub struct SendPinInput {
    /// Destination address or number
    pub send_to: String,
    /// Delivery channel
    pub channel: SendChannel,
    /// Lifetime override in seconds; non-positive values are ignored
    pub lifetime_secs: Option<i64>,
    /// Free-form linkage to a business entity
    pub recipient_id: Option<String>,
    pub recipient_type: Option<String>,
    /// Action type stamped onto the record
    pub action_type: Option<String>,
}

impl SendPinInput {
    pub fn new(send_to: impl Into<String>, channel: SendChannel) -> Self {
        Self {
            send_to: send_to.into(),
            channel,
            lifetime_secs: None,
            recipient_id: None,
            recipient_type: None,
            action_type: None,
        }
    }
}

/// Input for a resend; the record is located by operation id first,
/// composite key second
#[derive(Debug, Clone, Default)]
pub struct ResendPinInput {
    pub operation_id: Option<Uuid>,
    pub module_name: Option<String>,
    pub action_type: Option<String>,
    pub source_entity_id: Option<String>,
    /// Lifetime override for the extension in seconds
    pub lifetime_secs: Option<i64>,
}

impl ResendPinInput {
    pub fn by_operation_id(operation_id: Uuid) -> Self {
        Self {
            operation_id: Some(operation_id),
            ..Self::default()
        }
    }
}

/// Input for a verification; keyed like [`ResendPinInput`]
#[derive(Debug, Clone, Default)]
pub struct VerifyPinInput {
    pub operation_id: Option<Uuid>,
    pub module_name: Option<String>,
    pub action_type: Option<String>,
    pub source_entity_id: Option<String>,
    /// The presented pin or link token
    pub pin: String,
}

impl VerifyPinInput {
    pub fn by_operation_id(operation_id: Uuid, pin: impl Into<String>) -> Self {
        Self {
            operation_id: Some(operation_id),
            pin: pin.into(),
            ..Self::default()
        }
    }
}

/// Response of send and resend operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendPinResponse {
    /// Opaque handle identifying this issuance
    pub operation_id: Uuid,
    /// Where the secret was sent
    pub sent_to: String,
    /// Composite-key echo for config-driven flows
    pub module_name: Option<String>,
    pub action_type: Option<String>,
    pub source_entity_id: Option<String>,
}

/// Response of verify operations
///
/// Wrong pin and expiry are modeled as a failed payload, not an error:
/// only programmer/config errors surface as `OtpError`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyPinResponse {
    pub success: bool,
    pub error_message: Option<String>,
}

impl VerifyPinResponse {
    pub fn success() -> Self {
        Self {
            success: true,
            error_message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_response_constructors() {
        let ok = VerifyPinResponse::success();
        assert!(ok.success);
        assert!(ok.error_message.is_none());

        let failed = VerifyPinResponse::failed("Wrong one time pin");
        assert!(!failed.success);
        assert_eq!(failed.error_message.as_deref(), Some("Wrong one time pin"));
    }

    #[test]
    fn test_send_response_has_no_secret_field() {
        // The serialized response must expose nothing but the handle and
        // destination (plus composite-key echo).
        let response = SendPinResponse {
            operation_id: Uuid::new_v4(),
            sent_to: "+27821234567".to_string(),
            module_name: None,
            action_type: None,
            source_entity_id: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        let mut keys: Vec<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "action_type",
                "module_name",
                "operation_id",
                "sent_to",
                "source_entity_id"
            ]
        );
    }
}
