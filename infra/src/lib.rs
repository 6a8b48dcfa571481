//! # Pinsmith Infrastructure
//!
//! Gateway implementations for the OTP engine. The engine core only
//! knows the `SmsGateway`/`EmailGateway` traits; this crate provides
//! development and test implementations that log instead of talking to a
//! real provider. Real transports (Twilio, SMTP, ...) plug in the same
//! way and live outside this workspace.

pub mod email;
pub mod sms;

pub use email::MockEmailGateway;
pub use sms::{is_valid_phone_number, mask_phone_number, MockSmsGateway};
