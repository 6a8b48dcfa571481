//! OTP engine module
//!
//! This module provides the complete one-time-pin workflow:
//! - Pin and link-token generation
//! - Template rendering and channel dispatch (SMS, email, email link)
//! - Persisted issuance state with resend and verification
//! - Process-wide settings with a global validation bypass

mod config;
mod generator;
mod service;
mod settings;
pub mod template;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use config::OtpServiceConfig;
pub use generator::PinGenerator;
pub use service::OtpService;
pub use settings::{InMemorySettingsProvider, OtpSettings, SettingsProvider};
pub use traits::{EmailGateway, SmsGateway};
pub use types::{ResendPinInput, SendPinInput, SendPinResponse, VerifyPinInput, VerifyPinResponse};
