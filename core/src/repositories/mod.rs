pub mod config;
pub mod otp;
pub mod person;

pub use config::{InMemoryOtpConfigProvider, OtpConfigProvider};
pub use otp::{InMemoryOtpStorage, OtpStorage};
pub use person::{InMemoryPersonDirectory, PersonDirectory};
