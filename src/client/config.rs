// Client configuration shared by every typed API client

use std::fmt;
use std::sync::Arc;

/// Supplies the bearer credential for one outgoing request.
///
/// Called once per request, at send time. Implementations must not cache.
pub trait CredentialProvider: Send + Sync {
    fn resolve(&self) -> Option<String>;
}

/// A fixed credential, for API tokens created in the console or tests.
pub struct StaticCredential(pub Option<String>);

impl CredentialProvider for StaticCredential {
    fn resolve(&self) -> Option<String> {
        self.0.clone()
    }
}

impl<F> CredentialProvider for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn resolve(&self) -> Option<String> {
        self()
    }
}

/// Immutable snapshot of {base URL, credential provider}.
///
/// Never mutated; a new one is built on every base-URL or credential change
/// and clients built from the old one are replaced.
pub struct Configuration {
    base_path: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl Configuration {
    /// Build a new snapshot. Does no I/O and does not touch the credential.
    pub fn build(base_path: impl Into<String>, credentials: Arc<dyn CredentialProvider>) -> Arc<Self> {
        Arc::new(Self {
            base_path: base_path.into().trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Current credential, resolved now. Empty strings count as absent.
    pub fn access_token(&self) -> Option<String> {
        self.credentials.resolve().filter(|token| !token.is_empty())
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("base_path", &self.base_path)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_credential_resolved_per_call() {
        let current = Arc::new(Mutex::new(None::<String>));
        let source = current.clone();
        let config = Configuration::build(
            "http://localhost:8999/api/v1/",
            Arc::new(move || source.lock().unwrap().clone()),
        );

        assert_eq!(config.base_path(), "http://localhost:8999/api/v1");
        assert_eq!(config.access_token(), None);

        *current.lock().unwrap() = Some("fresh".to_string());
        assert_eq!(config.access_token().as_deref(), Some("fresh"));
    }

    #[test]
    fn test_empty_credential_is_absent() {
        let config = Configuration::build("", Arc::new(StaticCredential(Some(String::new()))));
        assert_eq!(config.access_token(), None);
    }
}
