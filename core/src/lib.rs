//! # Pinsmith Core
//!
//! Core OTP issuance and verification engine.
//! This crate contains the domain entities, the engine service, repository
//! interfaces with in-memory reference implementations, and the error types
//! that form the foundation of the one-time-pin workflow.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
