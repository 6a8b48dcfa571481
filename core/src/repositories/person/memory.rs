//! In-memory reference implementation of [`PersonDirectory`].

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::person::PersonContact;
use crate::errors::OtpResult;

use super::trait_::PersonDirectory;

/// In-memory person directory keyed by id
#[derive(Clone, Default)]
pub struct InMemoryPersonDirectory {
    people: Arc<RwLock<HashMap<Uuid, PersonContact>>>,
}

impl InMemoryPersonDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, person: PersonContact) {
        self.people.write().await.insert(person.id, person);
    }
}

#[async_trait]
impl PersonDirectory for InMemoryPersonDirectory {
    async fn find(&self, id: Uuid) -> OtpResult<Option<PersonContact>> {
        Ok(self.people.read().await.get(&id).cloned())
    }
}
