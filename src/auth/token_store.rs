// Session credential store: in-process shadow mirrored to durable storage

use std::sync::{Arc, Mutex, RwLock};
use tracing::{debug, warn};

use super::keychain::CredentialStorage;
use crate::client::CredentialProvider;

/// In-process view of the credential
#[derive(Debug, Clone, PartialEq)]
enum Shadow {
    /// Nothing set in this process yet, durable storage decides
    Unset,
    /// Explicitly cleared, durable storage is no longer consulted
    Cleared,
    Token(String),
}

/// Holds the current bearer credential.
///
/// The in-process value is authoritative so a token received from login is
/// usable immediately. Only while nothing has been set in this process do
/// reads fall back to the durable medium (previous run). A cleared credential
/// stays cleared even if the durable medium failed to forget it.
///
/// Writers are serialized by `write_lock` and do the durable I/O before
/// swapping the shadow, so readers only ever wait for the swap itself.
pub struct TokenStore {
    current: RwLock<Shadow>,
    write_lock: Mutex<()>,
    durable: Option<Arc<dyn CredentialStorage>>,
}

impl TokenStore {
    pub fn new(durable: Option<Arc<dyn CredentialStorage>>) -> Self {
        Self {
            current: RwLock::new(Shadow::Unset),
            write_lock: Mutex::new(()),
            durable,
        }
    }

    /// Process-local only, nothing survives a restart.
    pub fn in_memory() -> Self {
        Self::new(None)
    }

    pub fn has_durable_storage(&self) -> bool {
        self.durable.is_some()
    }

    /// Current credential, or `None` when anonymous.
    pub fn get(&self) -> Option<String> {
        let shadow = self.current.read().unwrap_or_else(|e| e.into_inner()).clone();
        match shadow {
            Shadow::Token(token) => Some(token),
            Shadow::Cleared => None,
            Shadow::Unset => self.load_durable(),
        }
    }

    fn load_durable(&self) -> Option<String> {
        let durable = self.durable.as_ref()?;
        match durable.load() {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %e, "failed to read stored credential");
                None
            }
        }
    }

    /// Replace the credential. `None` clears it everywhere.
    ///
    /// Durable-medium failures are logged; the in-process value is always
    /// updated so requests issued after this call use `token`. Blocks on the
    /// durable medium (keychain or file); readers never wait on that I/O.
    pub fn set(&self, token: Option<String>) {
        let token = token.filter(|t| !t.is_empty());
        let _writer = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(durable) = self.durable.as_ref() {
            let result = match token.as_deref() {
                Some(t) => durable.store(t),
                None => durable.remove(),
            };
            if let Err(e) = result {
                warn!(error = %e, "failed to persist credential change");
            }
        }

        debug!(token = %mask(token.as_deref()), "credential updated");
        let next = match token {
            Some(t) => Shadow::Token(t),
            None => Shadow::Cleared,
        };
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = next;
    }

    pub fn clear(&self) {
        self.set(None);
    }
}

impl CredentialProvider for TokenStore {
    fn resolve(&self) -> Option<String> {
        self.get()
    }
}

/// Masked form for logs: first few characters only.
pub(crate) fn mask(token: Option<&str>) -> String {
    match token {
        Some(t) => format!("{}...", t.chars().take(6).collect::<String>()),
        None => "<none>".to_string(),
    }
}
