//! In-memory reference implementation of [`OtpStorage`].

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::otp_record::{CompositeKey, OtpRecord};
use crate::errors::{OtpError, OtpResult};

use super::trait_::{OtpMutation, OtpStorage};

#[derive(Default)]
struct Inner {
    /// Primary store keyed by operation id
    records: HashMap<Uuid, OtpRecord>,
    /// Secondary index, composite key -> newest operation id
    by_composite_key: HashMap<CompositeKey, Uuid>,
}

/// In-memory OTP storage
///
/// Both maps live behind one `RwLock`; `update` holds the write lock for
/// the whole read-modify-write, so concurrent updates of the same record
/// cannot produce a lost update. Expired records are not collected here,
/// expiry is a read-time check in the engine.
#[derive(Clone, Default)]
pub struct InMemoryOtpStorage {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryOtpStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records, used by tests
    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.records.is_empty()
    }
}

#[async_trait]
impl OtpStorage for InMemoryOtpStorage {
    async fn save(&self, record: OtpRecord) -> OtpResult<()> {
        let mut inner = self.inner.write().await;

        if inner.records.contains_key(&record.operation_id) {
            return Err(OtpError::DuplicateKey {
                operation_id: record.operation_id.to_string(),
            });
        }

        // Last write wins on the secondary index: a later send with the
        // same composite key shadows earlier records for key lookups.
        if let Some(key) = record.composite_key() {
            inner.by_composite_key.insert(key, record.operation_id);
        }
        inner.records.insert(record.operation_id, record);
        Ok(())
    }

    async fn get_by_operation_id(&self, operation_id: Uuid) -> OtpResult<Option<OtpRecord>> {
        let inner = self.inner.read().await;
        Ok(inner.records.get(&operation_id).cloned())
    }

    async fn get_by_composite_key(
        &self,
        module_name: &str,
        action_type: &str,
        source_entity_id: &str,
    ) -> OtpResult<Option<OtpRecord>> {
        let key = CompositeKey {
            module_name: module_name.to_string(),
            action_type: action_type.to_string(),
            source_entity_id: source_entity_id.to_string(),
        };
        let inner = self.inner.read().await;
        let record = inner
            .by_composite_key
            .get(&key)
            .and_then(|id| inner.records.get(id))
            .cloned();
        Ok(record)
    }

    async fn update(&self, operation_id: Uuid, mutation: OtpMutation) -> OtpResult<()> {
        let mut inner = self.inner.write().await;
        let record = inner
            .records
            .get_mut(&operation_id)
            .ok_or_else(|| OtpError::not_found("Otp"))?;
        mutation(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::otp_record::{SendChannel, SendStatus};
    use chrono::{Duration, Utc};

    fn record_with_key(source_entity_id: &str) -> OtpRecord {
        OtpRecord {
            operation_id: Uuid::new_v4(),
            secret: "111111".to_string(),
            send_to: "+27820000000".to_string(),
            channel: SendChannel::Sms,
            module_name: Some("accounts".to_string()),
            action_type: Some("login".to_string()),
            source_entity_id: Some(source_entity_id.to_string()),
            recipient_id: None,
            recipient_type: None,
            sent_on: Some(Utc::now()),
            expires_on: Utc::now() + Duration::seconds(300),
            status: SendStatus::Sent,
            error_message: None,
        }
    }

    #[tokio::test]
    async fn test_save_and_get_by_operation_id() {
        let storage = InMemoryOtpStorage::new();
        let record = record_with_key("1");
        let id = record.operation_id;

        storage.save(record.clone()).await.unwrap();
        let found = storage.get_by_operation_id(id).await.unwrap().unwrap();
        assert_eq!(found, record);

        assert!(storage
            .get_by_operation_id(Uuid::new_v4())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_operation_id_rejected() {
        let storage = InMemoryOtpStorage::new();
        let record = record_with_key("1");

        storage.save(record.clone()).await.unwrap();
        let err = storage.save(record).await.unwrap_err();
        assert!(matches!(err, OtpError::DuplicateKey { .. }));
        assert_eq!(storage.len().await, 1);
    }

    #[tokio::test]
    async fn test_composite_key_returns_newest_record() {
        let storage = InMemoryOtpStorage::new();
        let first = record_with_key("42");
        let second = record_with_key("42");

        storage.save(first).await.unwrap();
        storage.save(second.clone()).await.unwrap();

        let found = storage
            .get_by_composite_key("accounts", "login", "42")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.operation_id, second.operation_id);
    }

    #[tokio::test]
    async fn test_update_missing_record() {
        let storage = InMemoryOtpStorage::new();
        let err = storage
            .update(Uuid::new_v4(), Box::new(|r| r.status = SendStatus::Failed))
            .await
            .unwrap_err();
        assert!(matches!(err, OtpError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_concurrent_updates_do_not_lose_writes() {
        let storage = InMemoryOtpStorage::new();
        let record = record_with_key("7");
        let id = record.operation_id;
        storage.save(record).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..16i64 {
            let storage = storage.clone();
            handles.push(tokio::spawn(async move {
                storage
                    .update(
                        id,
                        Box::new(move |r| {
                            r.expires_on = r.expires_on + Duration::seconds(0);
                            r.error_message = Some(format!("attempt {}", i));
                        }),
                    )
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        // One coherent record with the last applied update, no torn state
        let found = storage.get_by_operation_id(id).await.unwrap().unwrap();
        let message = found.error_message.unwrap();
        assert!(message.starts_with("attempt "));
        assert_eq!(storage.len().await, 1);
    }
}
