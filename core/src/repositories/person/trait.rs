//! Lookup of person contact records.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::person::PersonContact;
use crate::errors::OtpResult;

/// Read-only directory of person contact details
#[async_trait]
pub trait PersonDirectory: Send + Sync {
    /// Fetch a person's contact record by id
    async fn find(&self, id: Uuid) -> OtpResult<Option<PersonContact>>;
}
