use crate::domain::value_objects::UserId;
use crate::ports::identity_provider::{IdentityProvider as IdentityProviderTrait, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Mock implementation of IdentityProvider
///
/// Maps opaque bearer tokens to user IDs. Unknown tokens resolve to `None`.
pub struct IdentityProvider {
    tokens: Mutex<HashMap<String, UserId>>,
}

impl IdentityProvider {
    pub fn new() -> Self {
        Self {
            tokens: Mutex::new(HashMap::new()),
        }
    }

    /// Register a token for a user
    pub fn issue_token(&self, token: impl Into<String>, user_id: UserId) {
        self.tokens.lock().unwrap().insert(token.into(), user_id);
    }
}

impl Default for IdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProviderTrait for IdentityProvider {
    async fn resolve(&self, token: &str) -> Result<Option<UserId>> {
        Ok(self.tokens.lock().unwrap().get(token).copied())
    }
}
