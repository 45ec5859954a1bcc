// License validation endpoints (/validation)

use super::transport::Transport;
use crate::api_types::{ValidationRequest, ValidationResponse};
use crate::error::ApiError;
use crate::utils::{machine_fingerprint, normalize_license_key};

#[derive(Clone)]
pub struct ValidationApi {
    transport: Transport,
}

impl ValidationApi {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Validate a license key for a machine.
    /// A rejected key is `Ok` with `valid == false`, not an error.
    pub async fn validate(&self, license_key: &str, machine_id: &str) -> Result<ValidationResponse, ApiError> {
        let request = ValidationRequest {
            license_key: normalize_license_key(license_key),
            machine_id: machine_id.to_string(),
        };
        self.transport.post("/validation/", &request).await
    }

    /// Keep an activation alive (same response shape as `validate`)
    pub async fn heartbeat(&self, license_key: &str, machine_id: &str) -> Result<ValidationResponse, ApiError> {
        let request = ValidationRequest {
            license_key: normalize_license_key(license_key),
            machine_id: machine_id.to_string(),
        };
        self.transport.post("/validation/heartbeat", &request).await
    }

    /// Validate against this machine's fingerprint, for checking a key from the console host
    pub async fn validate_this_machine(&self, license_key: &str) -> Result<ValidationResponse, ApiError> {
        let machine_id = machine_fingerprint();
        self.validate(license_key, &machine_id).await
    }
}
