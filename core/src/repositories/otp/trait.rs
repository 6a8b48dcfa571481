//! OTP storage trait defining the interface for OTP record persistence.
//!
//! Records are addressable by two independent keys: the operation id
//! (primary) and the (module, action, source entity) composite key
//! (secondary, newest record wins). Implementations must keep both
//! consistent on every write.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::otp_record::OtpRecord;
use crate::errors::OtpResult;

/// Mutation applied by [`OtpStorage::update`]
///
/// Restricted by convention to the mutable fields of a record:
/// `sent_on`, `status`, `error_message` and `expires_on`.
pub type OtpMutation = Box<dyn FnOnce(&mut OtpRecord) + Send>;

/// Repository trait for OTP record persistence operations
///
/// A durable implementation backs `update` with a transactional
/// read-modify-write or an optimistic concurrency token; the in-memory
/// reference implementation serializes updates behind a single lock.
#[async_trait]
pub trait OtpStorage: Send + Sync {
    /// Insert a new record
    ///
    /// # Returns
    /// * `Ok(())` - Record persisted
    /// * `Err(OtpError::DuplicateKey)` - A record with this operation id
    ///   already exists
    async fn save(&self, record: OtpRecord) -> OtpResult<()>;

    /// Fetch a record by its operation id
    async fn get_by_operation_id(&self, operation_id: Uuid) -> OtpResult<Option<OtpRecord>>;

    /// Fetch the newest record matching the composite key
    async fn get_by_composite_key(
        &self,
        module_name: &str,
        action_type: &str,
        source_entity_id: &str,
    ) -> OtpResult<Option<OtpRecord>>;

    /// Atomically apply a field-level mutation to an existing record
    ///
    /// The read-modify-write must not interleave with a concurrent update
    /// of the same id.
    ///
    /// # Returns
    /// * `Ok(())` - Mutation applied and persisted
    /// * `Err(OtpError::NotFound)` - No record with this operation id
    async fn update(&self, operation_id: Uuid, mutation: OtpMutation) -> OtpResult<()>;
}
