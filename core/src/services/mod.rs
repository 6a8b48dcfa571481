//! Business services containing the OTP engine.

pub mod otp;

// Re-export commonly used types
pub use otp::{
    EmailGateway, InMemorySettingsProvider, OtpService, OtpServiceConfig, OtpSettings,
    PinGenerator, ResendPinInput, SendPinInput, SendPinResponse, SettingsProvider, SmsGateway,
    VerifyPinInput, VerifyPinResponse,
};
