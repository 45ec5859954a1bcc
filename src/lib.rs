// License Console - client core for the license administration backend
// Token storage, shared API client configuration, typed resource clients
// Session management (login / logout / startup verification)

pub mod api_types;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod utils;

pub use auth::{SessionContext, SessionState, TokenStore};
pub use client::{ApiRegistry, Configuration, CredentialProvider};
pub use config::ConsoleConfig;
pub use error::{ApiError, ConfigError, InitError, SessionError, StorageError};
