//! In-memory reference implementation of [`OtpConfigProvider`].

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::entities::otp_config::OtpConfig;
use crate::errors::OtpResult;

use super::trait_::OtpConfigProvider;

/// In-memory config registry keyed by (module, name)
#[derive(Clone, Default)]
pub struct InMemoryOtpConfigProvider {
    configs: Arc<RwLock<HashMap<(String, String), OtpConfig>>>,
}

impl InMemoryOtpConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace a config
    pub async fn register(&self, config: OtpConfig) {
        let key = (config.module.clone(), config.name.clone());
        self.configs.write().await.insert(key, config);
    }
}

#[async_trait]
impl OtpConfigProvider for InMemoryOtpConfigProvider {
    async fn resolve(&self, module: &str, name: &str) -> OtpResult<Option<OtpConfig>> {
        let configs = self.configs.read().await;
        Ok(configs.get(&(module.to_string(), name.to_string())).cloned())
    }
}
