//! Session collaborator.
//!
//! The router stores the active language code under [`LANGUAGE_SESSION_KEY`]
//! and, with `remember_language` enabled, reads it back for requests that
//! carry no language prefix. The store itself belongs to the host.

use std::collections::HashMap;

/// Session key holding the remembered language code.
pub const LANGUAGE_SESSION_KEY: &str = "language";

/// String key-value session store.
pub trait Session {
    /// Value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`.
    fn set(&mut self, key: &str, value: &str);
}

/// In-memory session, for hosts without a session store and for tests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemorySession {
    values: HashMap<String, String>,
}

impl MemorySession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Session with a remembered language.
    #[must_use]
    pub fn with_language(code: &str) -> Self {
        let mut session = Self::new();
        session.set(LANGUAGE_SESSION_KEY, code);
        session
    }
}

impl Session for MemorySession {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_owned(), value.to_owned());
    }
}
