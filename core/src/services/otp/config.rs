//! Configuration for the OTP engine service.

use std::time::Duration;

/// Default bound on a single gateway call
pub const DEFAULT_DISPATCH_TIMEOUT_SECS: u64 = 10;

/// Configuration for [`super::OtpService`]
///
/// Distinct from [`super::OtpSettings`]: this is fixed wiring chosen at
/// construction time, not the hot-reloadable process settings.
#[derive(Debug, Clone)]
pub struct OtpServiceConfig {
    /// Upper bound on one gateway call; an elapsed timeout is recorded
    /// on the record like any other dispatch failure
    pub dispatch_timeout: Duration,
}

impl Default for OtpServiceConfig {
    fn default() -> Self {
        Self {
            dispatch_timeout: Duration::from_secs(DEFAULT_DISPATCH_TIMEOUT_SECS),
        }
    }
}
