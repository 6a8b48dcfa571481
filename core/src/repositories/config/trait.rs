//! Lookup of named OTP configurations.

use async_trait::async_trait;

use crate::domain::entities::otp_config::OtpConfig;
use crate::errors::OtpResult;

/// Read-only lookup of [`OtpConfig`] by (module, name)
///
/// Pure lookup with no caching contract; implementations may cache as
/// long as they invalidate on config change.
#[async_trait]
pub trait OtpConfigProvider: Send + Sync {
    /// Exact-match resolution
    ///
    /// # Returns
    /// * `Ok(Some(config))` - Config found
    /// * `Ok(None)` - No config registered under this key
    async fn resolve(&self, module: &str, name: &str) -> OtpResult<Option<OtpConfig>>;
}
