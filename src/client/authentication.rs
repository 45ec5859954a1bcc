// Authentication, API token and user administration endpoints (/auth)

use super::transport::Transport;
use crate::api_types::{
    ApiToken, ApiTokenCreate, ApiTokenCreated, ApiTokenUpdate, BusinessRoleUpdate,
    ChangePasswordRequest, LoginRequest, MessageResponse, Pagination, SystemRoleUpdate,
    TokenResponse, User, UserCreate, UserUpdate,
};
use crate::error::ApiError;

#[derive(Clone)]
pub struct AuthenticationApi {
    transport: Transport,
}

impl AuthenticationApi {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    // ------------------------------------------------------------------
    // Session
    // ------------------------------------------------------------------

    /// Exchange username/password for a session token
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, ApiError> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.transport.post("/auth/login", &request).await
    }

    /// Profile of the user the current credential belongs to
    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.transport.get("/auth/me").await
    }

    pub async fn register(&self, user: &UserCreate) -> Result<User, ApiError> {
        self.transport.post("/auth/register", user).await
    }

    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<MessageResponse, ApiError> {
        let request = ChangePasswordRequest {
            current_password: current_password.to_string(),
            new_password: new_password.to_string(),
        };
        self.transport.post("/auth/change-password", &request).await
    }

    // ------------------------------------------------------------------
    // API tokens
    // ------------------------------------------------------------------

    /// Create an API token. The returned `token` value is only ever shown here.
    pub async fn create_api_token(&self, request: &ApiTokenCreate) -> Result<ApiTokenCreated, ApiError> {
        self.transport.post("/auth/tokens", request).await
    }

    pub async fn list_api_tokens(&self) -> Result<Vec<ApiToken>, ApiError> {
        self.transport.get("/auth/tokens").await
    }

    /// Full update (PUT)
    pub async fn update_api_token(&self, token_id: i64, update: &ApiTokenUpdate) -> Result<ApiToken, ApiError> {
        self.transport.put(&format!("/auth/tokens/{token_id}"), update).await
    }

    /// Partial update (PATCH), e.g. toggling `is_active`
    pub async fn patch_api_token(&self, token_id: i64, update: &ApiTokenUpdate) -> Result<ApiToken, ApiError> {
        self.transport.patch(&format!("/auth/tokens/{token_id}"), update).await
    }

    pub async fn delete_api_token(&self, token_id: i64) -> Result<MessageResponse, ApiError> {
        self.transport.delete_with(&format!("/auth/tokens/{token_id}")).await
    }

    // ------------------------------------------------------------------
    // User administration (system admins only)
    // ------------------------------------------------------------------

    pub async fn create_user(&self, user: &UserCreate) -> Result<User, ApiError> {
        self.transport.post("/auth/users", user).await
    }

    pub async fn list_users(&self, page: Pagination) -> Result<Vec<User>, ApiError> {
        self.transport.get_query("/auth/users", &page).await
    }

    pub async fn get_user(&self, user_id: i64) -> Result<User, ApiError> {
        self.transport.get(&format!("/auth/users/{user_id}")).await
    }

    pub async fn update_user(&self, user_id: i64, update: &UserUpdate) -> Result<User, ApiError> {
        self.transport.put(&format!("/auth/users/{user_id}"), update).await
    }

    pub async fn update_user_business_role(
        &self,
        user_id: i64,
        update: &BusinessRoleUpdate,
    ) -> Result<User, ApiError> {
        self.transport
            .put(&format!("/auth/users/{user_id}/business-role"), update)
            .await
    }

    pub async fn update_user_system_role(
        &self,
        user_id: i64,
        update: &SystemRoleUpdate,
    ) -> Result<User, ApiError> {
        self.transport
            .put(&format!("/auth/users/{user_id}/system-role"), update)
            .await
    }
}
