// Application endpoints (/applications)

use super::transport::Transport;
use crate::api_types::{Application, ApplicationCreate, ApplicationUpdate, Pagination};
use crate::error::ApiError;

#[derive(Clone)]
pub struct ApplicationsApi {
    transport: Transport,
}

impl ApplicationsApi {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub async fn create(&self, application: &ApplicationCreate) -> Result<Application, ApiError> {
        self.transport.post("/applications/", application).await
    }

    pub async fn list(&self, page: Pagination) -> Result<Vec<Application>, ApiError> {
        self.transport.get_query("/applications/", &page).await
    }

    pub async fn get(&self, application_id: i64) -> Result<Application, ApiError> {
        self.transport.get(&format!("/applications/{application_id}")).await
    }

    pub async fn update(
        &self,
        application_id: i64,
        update: &ApplicationUpdate,
    ) -> Result<Application, ApiError> {
        self.transport
            .put(&format!("/applications/{application_id}"), update)
            .await
    }

    pub async fn delete(&self, application_id: i64) -> Result<(), ApiError> {
        self.transport.delete(&format!("/applications/{application_id}")).await
    }
}
