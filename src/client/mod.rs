// Typed API clients for the license backend

pub mod activation_forms;
pub mod activations;
pub mod applications;
pub mod authentication;
pub mod config;
pub mod customers;
pub mod default;
pub mod licenses;
pub mod registry;
pub mod transport;
pub mod validation;

pub use activation_forms::ActivationFormsApi;
pub use activations::ActivationsApi;
pub use applications::ApplicationsApi;
pub use authentication::AuthenticationApi;
pub use config::{Configuration, CredentialProvider, StaticCredential};
pub use customers::CustomersApi;
pub use default::DefaultApi;
pub use licenses::LicensesApi;
pub use registry::{ApiClients, ApiRegistry};
pub use transport::Transport;
pub use validation::ValidationApi;
