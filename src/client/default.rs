// Service info endpoints at the server root (/health, /)

use super::transport::Transport;
use crate::api_types::{HealthResponse, ServiceInfo};
use crate::error::ApiError;

#[derive(Clone)]
pub struct DefaultApi {
    transport: Transport,
}

impl DefaultApi {
    /// `transport` should address the server root, not the API prefix.
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub async fn health(&self) -> Result<HealthResponse, ApiError> {
        self.transport.get("/health").await
    }

    pub async fn root(&self) -> Result<ServiceInfo, ApiError> {
        self.transport.get("/").await
    }
}
