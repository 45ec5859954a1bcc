// Session context: login / logout / startup verification

use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::token_store::{mask, TokenStore};
use crate::api_types::User;
use crate::client::ApiRegistry;
use crate::config::ConsoleConfig;
use crate::error::{ApiError, InitError, SessionError};

/// Authentication state of the console
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Loading,
    Anonymous,
    Authenticated(User),
}

impl SessionState {
    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }
}

/// Owns the token store and API registry and drives the session state.
///
/// Every credential change is followed by `ApiRegistry::reconfigure` before
/// any further request is issued. State changes are published on a watch
/// channel for the view layer.
pub struct SessionContext {
    tokens: Arc<TokenStore>,
    registry: Arc<ApiRegistry>,
    state: watch::Sender<SessionState>,
}

impl SessionContext {
    /// Starts in `Loading`; call [`start`](Self::start) to resolve it.
    pub fn new(tokens: Arc<TokenStore>, registry: Arc<ApiRegistry>) -> Self {
        let (state, _) = watch::channel(SessionState::Loading);
        Self {
            tokens,
            registry,
            state,
        }
    }

    /// Wire token store, durable medium and registry from settings.
    pub fn from_config(config: &ConsoleConfig) -> Result<Self, InitError> {
        let durable = config.token_storage.open()?;
        let tokens = Arc::new(TokenStore::new(durable));
        let registry = Arc::new(ApiRegistry::from_config(config, tokens.clone())?);
        Ok(Self::new(tokens, registry))
    }

    pub fn registry(&self) -> &Arc<ApiRegistry> {
        &self.registry
    }

    pub fn token_store(&self) -> &Arc<TokenStore> {
        &self.tokens
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    /// Receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    fn publish(&self, next: SessionState) {
        self.state.send_replace(next);
    }

    /// Resolve the initial state from a stored credential, if any.
    pub async fn start(&self) -> SessionState {
        self.publish(SessionState::Loading);

        if self.tokens.get().is_none() {
            debug!("no stored credential, starting anonymous");
            self.publish(SessionState::Anonymous);
            return self.state();
        }

        // Failure lands in Anonymous unless a newer login or logout took over
        if let Err(e) = self.verify_token().await {
            info!(error = %e, "stored credential rejected");
        }
        self.state()
    }

    /// Re-check the current credential against `/auth/me`.
    ///
    /// On failure the credential is cleared and the state becomes `Anonymous`.
    /// If a login or logout lands while the check is in flight, the result is
    /// discarded and the newer session is left alone.
    pub async fn verify_token(&self) -> Result<User, SessionError> {
        let generation = self.registry.reconfigure(None);

        match self.registry.authentication().current_user().await {
            Ok(user) => {
                if !self.publish_if_current(generation, SessionState::Authenticated(user.clone())) {
                    debug!("credential changed during verification, result discarded");
                    return Err(superseded());
                }
                info!(username = %user.username, "session restored");
                Ok(user)
            }
            Err(e) => {
                self.drop_credential_if_current(generation);
                Err(SessionError::Api(e))
            }
        }
    }

    /// Log in and load the user profile.
    ///
    /// Rejected credentials, a response without a session token, or a
    /// profile lookup failure with the new token all yield
    /// `SessionError::Authentication`; other failures pass through as
    /// `SessionError::Api`. No partial session is ever published.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, SessionError> {
        info!(%username, "attempting login");

        let response = self
            .registry
            .authentication()
            .login(username, password)
            .await
            .map_err(|e| {
                warn!(%username, error = %e, "login rejected");
                normalize_login_error(e)
            })?;

        let token = response
            .session_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                SessionError::Authentication(
                    "Invalid login response - no session token received".to_string(),
                )
            })?;

        self.tokens.set(Some(token));
        let generation = self.registry.reconfigure(None);
        debug!(token = %mask(self.tokens.get().as_deref()), "token applied to API clients");

        match self.registry.authentication().current_user().await {
            Ok(user) => {
                if !self.publish_if_current(generation, SessionState::Authenticated(user.clone())) {
                    warn!(%username, "credential changed during login, session not published");
                    return Err(superseded());
                }
                info!(%username, "login successful");
                Ok(user)
            }
            Err(e) => {
                warn!(%username, error = %e, "failed to load user after login");
                self.drop_credential_if_current(generation);
                Err(SessionError::Authentication(format!(
                    "Failed to get user information: {e}"
                )))
            }
        }
    }

    /// Clear the credential everywhere and become `Anonymous`. Idempotent.
    pub fn logout(&self) {
        info!("logging out");
        self.drop_credential();
    }

    fn drop_credential(&self) {
        self.tokens.set(None);
        self.registry.reconfigure(None);
        self.publish(SessionState::Anonymous);
    }

    /// Clear only if no other credential change happened since `generation`.
    fn drop_credential_if_current(&self, generation: u64) {
        if self.registry.generation() == generation {
            self.drop_credential();
        }
    }

    /// Publish `next` only while the registry is still at `generation`.
    ///
    /// The check runs under the watch lock. A concurrent `drop_credential`
    /// reconfigures before it publishes, so either it bumps the generation
    /// first and this is refused, or its `Anonymous` lands after this.
    fn publish_if_current(&self, generation: u64, next: SessionState) -> bool {
        self.state.send_if_modified(|state| {
            if self.registry.generation() != generation {
                return false;
            }
            *state = next;
            true
        })
    }
}

fn superseded() -> SessionError {
    SessionError::Authentication("Session changed while the request was in flight".to_string())
}

/// Credential rejections become `Authentication`; everything else passes through.
fn normalize_login_error(error: ApiError) -> SessionError {
    let rejected = matches!(error.status().map(|s| s.as_u16()), Some(401 | 403 | 422));
    match error {
        ApiError::Status { detail, .. } if rejected => SessionError::Authentication(
            detail.unwrap_or_else(|| "Incorrect username or password".to_string()),
        ),
        other => SessionError::Api(other),
    }
}
