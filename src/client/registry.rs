// Registry owning the live set of typed API clients

use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::info;

use super::config::{Configuration, CredentialProvider};
use super::transport::Transport;
use super::{
    ActivationFormsApi, ActivationsApi, ApplicationsApi, AuthenticationApi, CustomersApi,
    DefaultApi, LicensesApi, ValidationApi,
};
use crate::config::ConsoleConfig;
use crate::error::ApiError;

/// One client per resource group, all built from the same Configuration.
pub struct ApiClients {
    pub configuration: Arc<Configuration>,
    pub authentication: AuthenticationApi,
    pub customers: CustomersApi,
    pub applications: ApplicationsApi,
    pub licenses: LicensesApi,
    pub activations: ActivationsApi,
    pub activation_forms: ActivationFormsApi,
    pub validation: ValidationApi,
    pub default: DefaultApi,
}

impl ApiClients {
    fn build(http: &reqwest::Client, configuration: Arc<Configuration>, api_prefix: &str) -> Self {
        let api = Transport::new(http.clone(), configuration.clone(), api_prefix);

        Self {
            authentication: AuthenticationApi::new(api.clone()),
            customers: CustomersApi::new(api.clone()),
            applications: ApplicationsApi::new(api.clone()),
            licenses: LicensesApi::new(api.clone()),
            activations: ActivationsApi::new(api.clone()),
            activation_forms: ActivationFormsApi::new(api.clone()),
            validation: ValidationApi::new(api.clone()),
            default: DefaultApi::new(api.at_root()),
            configuration,
        }
    }
}

struct RegistryState {
    base_url: String,
    clients: Arc<ApiClients>,
    generation: u64,
}

/// Owns the shared Configuration and every client built from it.
///
/// `reconfigure` swaps the whole client set under one write lock, so a
/// reader gets either all old or all new instances. Handles returned by the
/// accessors are cheap clones; fetch them again after a reconfiguration.
pub struct ApiRegistry {
    http: reqwest::Client,
    credentials: Arc<dyn CredentialProvider>,
    api_prefix: String,
    state: RwLock<RegistryState>,
}

impl ApiRegistry {
    /// Build the initial Configuration and client set.
    ///
    /// `base_url` is not validated; a malformed value fails at request time.
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        api_prefix: impl Into<String>,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        let base_url = base_url.into();
        let api_prefix = api_prefix.into();
        let configuration = Configuration::build(base_url.clone(), credentials.clone());
        let clients = Arc::new(ApiClients::build(&http, configuration, &api_prefix));

        Self {
            http,
            credentials,
            api_prefix,
            state: RwLock::new(RegistryState {
                base_url,
                clients,
                generation: 0,
            }),
        }
    }

    /// Registry with an HTTP client configured from `config` (timeout).
    pub fn from_config(config: &ConsoleConfig, credentials: Arc<dyn CredentialProvider>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self::new(http, config.api_url.clone(), config.api_prefix.clone(), credentials))
    }

    /// Rebuild the Configuration and replace every client.
    /// `None` keeps the current base URL. Returns the new generation.
    pub fn reconfigure(&self, base_url: Option<&str>) -> u64 {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        if let Some(url) = base_url {
            state.base_url = url.to_string();
        }

        let configuration = Configuration::build(state.base_url.clone(), self.credentials.clone());
        state.clients = Arc::new(ApiClients::build(&self.http, configuration, &self.api_prefix));
        state.generation += 1;

        info!(base_url = %state.base_url, generation = state.generation, "API clients reconfigured");
        state.generation
    }

    /// Point every client at a new backend.
    pub fn set_base_url(&self, base_url: &str) {
        self.reconfigure(Some(base_url));
    }

    pub fn base_url(&self) -> String {
        self.read(|state| state.base_url.clone())
    }

    /// Number of reconfigurations since construction.
    pub fn generation(&self) -> u64 {
        self.read(|state| state.generation)
    }

    /// The current client set, consistent as a whole.
    pub fn clients(&self) -> Arc<ApiClients> {
        self.read(|state| state.clients.clone())
    }

    pub fn configuration(&self) -> Arc<Configuration> {
        self.clients().configuration.clone()
    }

    pub fn authentication(&self) -> AuthenticationApi {
        self.clients().authentication.clone()
    }

    pub fn customers(&self) -> CustomersApi {
        self.clients().customers.clone()
    }

    pub fn applications(&self) -> ApplicationsApi {
        self.clients().applications.clone()
    }

    pub fn licenses(&self) -> LicensesApi {
        self.clients().licenses.clone()
    }

    pub fn activations(&self) -> ActivationsApi {
        self.clients().activations.clone()
    }

    pub fn activation_forms(&self) -> ActivationFormsApi {
        self.clients().activation_forms.clone()
    }

    pub fn validation(&self) -> ValidationApi {
        self.clients().validation.clone()
    }

    pub fn default_api(&self) -> DefaultApi {
        self.clients().default.clone()
    }

    fn read<T>(&self, f: impl FnOnce(&RegistryState) -> T) -> T {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        f(&state)
    }
}
