//! Person contact record used to resolve a destination address.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{OtpError, OtpResult};

use super::otp_record::SendChannel;

/// Contact details of a person, looked up when a config-driven send is
/// addressed by person id rather than by a raw address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonContact {
    pub id: Uuid,
    pub mobile_number1: Option<String>,
    pub mobile_number2: Option<String>,
    pub email_address1: Option<String>,
    pub email_address2: Option<String>,
}

impl PersonContact {
    /// Resolves the destination address for the given channel
    ///
    /// SMS uses the primary mobile number, falling back to the secondary.
    /// Email channels do the same with the email fields. Fails with
    /// `InvalidArgument` when no usable address exists.
    pub fn send_to_address(&self, channel: SendChannel) -> OtpResult<String> {
        let (primary, secondary, what) = match channel {
            SendChannel::Sms => (&self.mobile_number1, &self.mobile_number2, "mobile number"),
            SendChannel::Email | SendChannel::EmailLink => {
                (&self.email_address1, &self.email_address2, "email address")
            }
        };

        primary
            .as_deref()
            .filter(|v| !v.is_empty())
            .or_else(|| secondary.as_deref().filter(|v| !v.is_empty()))
            .map(str::to_string)
            .ok_or_else(|| OtpError::invalid_argument(format!("No valid {} found", what)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person() -> PersonContact {
        PersonContact {
            id: Uuid::new_v4(),
            mobile_number1: None,
            mobile_number2: None,
            email_address1: None,
            email_address2: None,
        }
    }

    #[test]
    fn test_sms_prefers_primary_mobile() {
        let mut p = person();
        p.mobile_number1 = Some("+27821111111".to_string());
        p.mobile_number2 = Some("+27822222222".to_string());
        assert_eq!(
            p.send_to_address(SendChannel::Sms).unwrap(),
            "+27821111111"
        );
    }

    #[test]
    fn test_sms_falls_back_to_secondary_mobile() {
        let mut p = person();
        p.mobile_number1 = Some(String::new());
        p.mobile_number2 = Some("+27822222222".to_string());
        assert_eq!(
            p.send_to_address(SendChannel::Sms).unwrap(),
            "+27822222222"
        );
    }

    #[test]
    fn test_email_link_uses_email_fields() {
        let mut p = person();
        p.email_address2 = Some("someone@example.com".to_string());
        assert_eq!(
            p.send_to_address(SendChannel::EmailLink).unwrap(),
            "someone@example.com"
        );
    }

    #[test]
    fn test_missing_address_is_invalid_argument() {
        let p = person();
        let err = p.send_to_address(SendChannel::Email).unwrap_err();
        assert!(matches!(err, OtpError::InvalidArgument { .. }));
    }
}
