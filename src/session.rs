use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};
use uuid::Uuid;

/// Server-side set of granted admin session tokens. Tokens live until they
/// are revoked or the process exits.
#[derive(Debug, Clone, Default)]
pub struct AdminSessions {
    tokens: Arc<Mutex<HashSet<Uuid>>>,
}

impl AdminSessions {
    pub fn grant(&self) -> Uuid {
        let token = Uuid::new_v4();
        self.tokens.lock().unwrap().insert(token);
        token
    }

    pub fn is_valid(&self, token: Uuid) -> bool {
        self.tokens.lock().unwrap().contains(&token)
    }

    /// Idempotent; revoking an unknown token is a no-op.
    pub fn revoke(&self, token: Uuid) {
        self.tokens.lock().unwrap().remove(&token);
    }
}
