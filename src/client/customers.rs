// Customer endpoints (/customers)

use super::transport::Transport;
use crate::api_types::{Customer, CustomerCreate, CustomerUpdate, Pagination};
use crate::error::ApiError;

#[derive(Clone)]
pub struct CustomersApi {
    transport: Transport,
}

impl CustomersApi {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub async fn create(&self, customer: &CustomerCreate) -> Result<Customer, ApiError> {
        self.transport.post("/customers/", customer).await
    }

    /// Customers owned by the authenticated user
    pub async fn list(&self, page: Pagination) -> Result<Vec<Customer>, ApiError> {
        self.transport.get_query("/customers/", &page).await
    }

    pub async fn get(&self, customer_id: i64) -> Result<Customer, ApiError> {
        self.transport.get(&format!("/customers/{customer_id}")).await
    }

    pub async fn update(&self, customer_id: i64, update: &CustomerUpdate) -> Result<Customer, ApiError> {
        self.transport.put(&format!("/customers/{customer_id}"), update).await
    }

    pub async fn delete(&self, customer_id: i64) -> Result<(), ApiError> {
        self.transport.delete(&format!("/customers/{customer_id}")).await
    }
}
