// License key endpoints (/licenses)

use super::transport::Transport;
use crate::api_types::{License, LicenseCreate, LicenseUpdate, Pagination};
use crate::error::ApiError;

#[derive(Clone)]
pub struct LicensesApi {
    transport: Transport,
}

impl LicensesApi {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Issue a new license key. The backend generates `license_key`.
    pub async fn create(&self, license: &LicenseCreate) -> Result<License, ApiError> {
        self.transport.post("/licenses/", license).await
    }

    pub async fn list(&self, page: Pagination) -> Result<Vec<License>, ApiError> {
        self.transport.get_query("/licenses/", &page).await
    }

    pub async fn get(&self, license_id: i64) -> Result<License, ApiError> {
        self.transport.get(&format!("/licenses/{license_id}")).await
    }

    pub async fn update(&self, license_id: i64, update: &LicenseUpdate) -> Result<License, ApiError> {
        self.transport.put(&format!("/licenses/{license_id}"), update).await
    }

    pub async fn delete(&self, license_id: i64) -> Result<(), ApiError> {
        self.transport.delete(&format!("/licenses/{license_id}")).await
    }

    /// Block a license; validation rejects it until unblocked
    pub async fn block(&self, license_id: i64) -> Result<License, ApiError> {
        self.transport.post_empty(&format!("/licenses/{license_id}/block")).await
    }

    pub async fn unblock(&self, license_id: i64) -> Result<License, ApiError> {
        self.transport.post_empty(&format!("/licenses/{license_id}/unblock")).await
    }
}
