// Authentication: credential storage and session management

pub mod keychain;
pub mod session;
pub mod token_store;

// Re-export common types
pub use keychain::{CredentialStorage, FileStorage, KeychainStorage, MemoryStorage, TOKEN_KEY};
pub use session::{SessionContext, SessionState};
pub use token_store::TokenStore;
