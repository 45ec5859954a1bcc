// Offline activation form endpoints (/activation-forms)

use super::transport::Transport;
use crate::api_types::{
    ActivationForm, ActivationFormComplete, ActivationFormCreate, OfflineActivationCode,
    OfflineCodeRequest, Pagination,
};
use crate::error::ApiError;

/// Offline activation: a machine produces a request code, the console
/// completes the form with an activation code.
#[derive(Clone)]
pub struct ActivationFormsApi {
    transport: Transport,
}

impl ActivationFormsApi {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub async fn create(&self, form: &ActivationFormCreate) -> Result<ActivationForm, ApiError> {
        self.transport.post("/activation-forms/", form).await
    }

    pub async fn complete(&self, request_code: &str, activation_code: &str) -> Result<ActivationForm, ApiError> {
        let request = ActivationFormComplete {
            request_code: request_code.to_string(),
            activation_code: activation_code.to_string(),
        };
        self.transport.post("/activation-forms/complete", &request).await
    }

    pub async fn generate_offline_codes(
        &self,
        request: &OfflineCodeRequest,
    ) -> Result<Vec<OfflineActivationCode>, ApiError> {
        self.transport.post("/activation-forms/offline-codes", request).await
    }

    pub async fn list(&self, page: Pagination) -> Result<Vec<ActivationForm>, ApiError> {
        self.transport.get_query("/activation-forms/", &page).await
    }

    pub async fn get(&self, form_id: i64) -> Result<ActivationForm, ApiError> {
        self.transport.get(&format!("/activation-forms/{form_id}")).await
    }
}
