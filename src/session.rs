//! Session context and token persistence
//!
//! The token is the only state that survives between page loads. It lives in
//! a key/value store (browser `localStorage`, or a file for the terminal) and
//! is carried through the controller as an explicit [`Session`] value.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::ClientResult;

/// Key the token is stored under
pub const TOKEN_KEY: &str = "token";

/// An authenticated session
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Read the persisted session, if any
    ///
    /// An empty stored value counts as no session.
    pub fn restore<S: TokenStore + ?Sized>(store: &S) -> ClientResult<Option<Session>> {
        Ok(store
            .get(TOKEN_KEY)?
            .filter(|token| !token.is_empty())
            .map(Session::new))
    }

    /// Persist this session, replacing whatever was stored
    pub fn persist<S: TokenStore + ?Sized>(&self, store: &S) -> ClientResult<()> {
        store.set(TOKEN_KEY, &self.token)
    }

    /// Remove the persisted session
    pub fn clear<S: TokenStore + ?Sized>(store: &S) -> ClientResult<()> {
        store.remove(TOKEN_KEY)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").field("token", &"<redacted>").finish()
    }
}

/// Client-local persistent key/value storage
pub trait TokenStore {
    fn get(&self, key: &str) -> ClientResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> ClientResult<()>;

    fn remove(&self, key: &str) -> ClientResult<()>;
}

/// In-memory store, lost when dropped
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a token
    pub fn with_token(token: &str) -> Self {
        let store = Self::new();
        store
            .entries
            .borrow_mut()
            .insert(TOKEN_KEY.to_string(), token.to_string());
        store
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> ClientResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}
