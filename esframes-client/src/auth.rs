//! Bearer token shared by every request handler

use parking_lot::RwLock;

/// Holder for the current access token, shared between handlers via `Arc`
#[derive(Debug, Default)]
pub struct AuthState {
    token: RwLock<Option<String>>,
}

impl AuthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write() = Some(token.into());
    }

    /// Current token; empty tokens count as unset
    pub fn token(&self) -> Option<String> {
        self.token.read().clone().filter(|t| !t.is_empty())
    }

    pub fn clear(&self) {
        *self.token.write() = None;
    }
}
