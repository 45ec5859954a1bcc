// Machine activation endpoints (/activations)

use super::transport::Transport;
use crate::api_types::{Activation, MessageResponse, Pagination};
use crate::error::ApiError;

#[derive(Clone)]
pub struct ActivationsApi {
    transport: Transport,
}

impl ActivationsApi {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub async fn list(&self, page: Pagination) -> Result<Vec<Activation>, ApiError> {
        self.transport.get_query("/activations/", &page).await
    }

    pub async fn list_for_license(&self, license_id: i64) -> Result<Vec<Activation>, ApiError> {
        self.transport
            .get(&format!("/activations/license/{license_id}"))
            .await
    }

    /// Deactivate a machine, freeing one activation slot on its license
    pub async fn deactivate(&self, activation_id: i64) -> Result<MessageResponse, ApiError> {
        self.transport
            .delete_with(&format!("/activations/{activation_id}"))
            .await
    }
}
