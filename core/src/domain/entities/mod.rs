//! Domain entities representing the OTP data model.

pub mod otp_config;
pub mod otp_record;
pub mod person;

// Re-export commonly used types
pub use otp_config::{NotificationTemplate, OtpConfig};
pub use otp_record::{CompositeKey, OtpRecord, SendChannel, SendStatus};
pub use person::PersonContact;
