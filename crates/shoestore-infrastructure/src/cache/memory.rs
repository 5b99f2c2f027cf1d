use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use shoestore_core::domain::ResetCode;
use shoestore_core::error::DomainError;
use shoestore_core::repositories::ResetCodeStore;

/// Codes keyed by email. A newer code replaces the older one.
#[derive(Debug, Default)]
pub struct InMemoryResetCodeStore {
    codes: RwLock<HashMap<String, ResetCode>>,
}

impl InMemoryResetCodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.codes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.read().is_empty()
    }
}

#[async_trait]
impl ResetCodeStore for InMemoryResetCodeStore {
    async fn get(&self, email: &str) -> Result<Option<ResetCode>, DomainError> {
        Ok(self.codes.read().get(email).cloned())
    }

    async fn set(&self, code: ResetCode) -> Result<(), DomainError> {
        self.codes.write().insert(code.email.clone(), code);
        Ok(())
    }

    async fn mark_used(&self, email: &str, code: &str) -> Result<bool, DomainError> {
        let mut codes = self.codes.write();
        match codes.get_mut(email) {
            Some(stored) if stored.code == code && !stored.used => {
                stored.used = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, email: &str) -> Result<(), DomainError> {
        self.codes.write().remove(email);
        Ok(())
    }
}
