/**
 * API Types - Manually maintained to match the backend OpenAPI schema
 * Source: the backend's /openapi.json (FastAPI, snake_case JSON)
 *
 * IMPORTANT: When adding new endpoints, update these types to match the schema
 * Optional backend fields are `Option<T>`; `None` means the backend sent null
 * or omitted the field. Enums carry an `Unknown` variant so newer backend values
 * still decode.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Free-form feature flags attached to applications and licenses.
/// Absent (`None` on the owning struct) means "no feature restrictions configured".
pub type FeatureMap = serde_json::Map<String, serde_json::Value>;

// ============================================================================
// Timestamps
// ============================================================================

/// Backend timestamps are UTC but often serialized without an offset
/// (`2024-05-01T10:00:00.123456`). Accept both forms.
pub(crate) mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw}")))
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{de, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) => super::parse(&raw)
                    .map(Some)
                    .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw}"))),
                None => Ok(None),
            }
        }
    }
}

// ============================================================================
// Enums
// ============================================================================

/// Lifecycle status of a license key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseStatus {
    Active,
    Expired,
    Suspended,
    Revoked,
    Blocked,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationStatus {
    Active,
    Inactive,
    #[serde(other)]
    Unknown,
}

/// Business role of a console user (license management permissions)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessRole {
    User,
    #[serde(other)]
    Unknown,
}

/// System administration role of a console user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemRole {
    SystemAdmin,
    User,
    #[serde(other)]
    Unknown,
}

/// Permission scope granted to an API token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenScope {
    #[serde(rename = "license:read")]
    LicenseRead,
    #[serde(rename = "license:write")]
    LicenseWrite,
    #[serde(rename = "license:delete")]
    LicenseDelete,
    #[serde(rename = "customer:read")]
    CustomerRead,
    #[serde(rename = "customer:write")]
    CustomerWrite,
    #[serde(rename = "customer:delete")]
    CustomerDelete,
    #[serde(rename = "application:read")]
    ApplicationRead,
    #[serde(rename = "application:write")]
    ApplicationWrite,
    #[serde(rename = "application:delete")]
    ApplicationDelete,
    #[serde(rename = "activation:read")]
    ActivationRead,
    #[serde(rename = "activation:write")]
    ActivationWrite,
    #[serde(rename = "activation:delete")]
    ActivationDelete,
    #[serde(rename = "validation")]
    Validation,
    #[serde(rename = "user:management")]
    UserManagement,
    #[serde(rename = "token:management")]
    TokenManagement,
    #[serde(other)]
    Unknown,
}

// ============================================================================
// Pagination
// ============================================================================

/// `skip` / `limit` query parameters accepted by every list endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub skip: u32,
    pub limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { skip: 0, limit: 100 }
    }
}

impl Pagination {
    pub fn page(page: u32, per_page: u32) -> Self {
        Self {
            skip: page.saturating_mul(per_page),
            limit: per_page,
        }
    }
}

// ============================================================================
// Authentication API Types
// ============================================================================

/// Request for POST /auth/login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response from POST /auth/login
///
/// `session_token` is optional on the wire side so that a malformed response
/// can be rejected by the session layer instead of failing to decode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub session_token: Option<String>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub user: Option<User>,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Console user profile (GET /auth/me and user administration)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub business_role: BusinessRole,
    pub system_role: SystemRole,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, with = "timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_system_admin(&self) -> bool {
        self.system_role == SystemRole::SystemAdmin
    }
}

fn default_true() -> bool {
    true
}

/// Request for POST /auth/register and POST /auth/users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password: String,
}

/// Request for PUT /auth/users/{id}
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<BusinessRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Request for PUT /auth/users/{id}/business-role
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessRoleUpdate {
    pub business_role: BusinessRole,
}

/// Request for PUT /auth/users/{id}/system-role
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemRoleUpdate {
    pub system_role: SystemRole,
}

/// Request for POST /auth/change-password
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Plain `{"message": ...}` acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

// ============================================================================
// API Token Types
// ============================================================================

/// Request for POST /auth/tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiTokenCreate {
    pub name: String,
    pub scopes: Vec<TokenScope>,
    #[serde(default, with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// API token as listed (the secret value is never returned after creation)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiToken {
    pub id: i64,
    pub name: String,
    pub scopes: Vec<TokenScope>,
    pub is_active: bool,
    #[serde(default, with = "timestamp::option")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp::option")]
    pub last_used_at: Option<DateTime<Utc>>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl ApiToken {
    /// Tokens without an expiry never expire.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }
}

/// Response from POST /auth/tokens - includes the token value, shown only once
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiTokenCreated {
    pub id: i64,
    pub name: String,
    pub scopes: Vec<TokenScope>,
    pub is_active: bool,
    #[serde(default, with = "timestamp::option")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    pub token: String,
}

/// Request for PUT/PATCH /auth/tokens/{id}
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiTokenUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Vec<TokenScope>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Customer Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Request for POST /customers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerCreate {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

/// Request for PUT /customers/{id}
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

// ============================================================================
// Application Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: i64,
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub features: Option<FeatureMap>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Request for POST /applications
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationCreate {
    pub name: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<FeatureMap>,
}

/// Request for PUT /applications/{id}
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<FeatureMap>,
}

// ============================================================================
// License Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct License {
    pub id: i64,
    pub license_key: String,
    pub customer_id: i64,
    pub application_id: i64,
    pub status: LicenseStatus,
    /// `None` means the license never expires.
    #[serde(default, with = "timestamp::option")]
    pub expires_at: Option<DateTime<Utc>>,
    pub max_activations: i64,
    pub current_activations: i64,
    #[serde(default)]
    pub features: Option<FeatureMap>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl License {
    pub fn remaining_activations(&self) -> i64 {
        (self.max_activations - self.current_activations).max(0)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.status == LicenseStatus::Expired || self.expires_at.is_some_and(|exp| exp <= now)
    }

    /// Look up a feature flag. Missing map or missing key both read as `None`.
    pub fn feature(&self, name: &str) -> Option<&serde_json::Value> {
        self.features.as_ref().and_then(|f| f.get(name))
    }
}

/// Request for POST /licenses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseCreate {
    pub customer_id: i64,
    pub application_id: i64,
    #[serde(default, with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub max_activations: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<FeatureMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Request for PUT /licenses/{id}
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LicenseUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LicenseStatus>,
    #[serde(default, with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_activations: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<FeatureMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

// ============================================================================
// Activation Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activation {
    pub id: i64,
    pub license_key_id: i64,
    pub machine_id: String,
    #[serde(default)]
    pub machine_name: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    pub status: ActivationStatus,
    #[serde(with = "timestamp")]
    pub activated_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub last_heartbeat: DateTime<Utc>,
}

// ============================================================================
// Activation Form Types
// ============================================================================

/// Request for POST /activation-forms
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivationFormCreate {
    pub license_key: String,
    pub machine_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub machine_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivationForm {
    pub id: i64,
    pub license_key_id: i64,
    pub machine_id: String,
    #[serde(default)]
    pub machine_name: Option<String>,
    pub request_code: String,
    /// Filled in once the form has been completed.
    #[serde(default)]
    pub activation_code: Option<String>,
    pub status: String,
    #[serde(with = "timestamp")]
    pub expires_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "timestamp::option")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl ActivationForm {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some() || self.status == "completed"
    }
}

/// Request for POST /activation-forms/complete
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivationFormComplete {
    pub request_code: String,
    pub activation_code: String,
}

/// Request for POST /activation-forms/offline-codes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfflineCodeRequest {
    pub license_key_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub machine_id: Option<String>,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfflineActivationCode {
    pub id: i64,
    pub license_key_id: i64,
    pub activation_code: String,
    #[serde(default)]
    pub machine_id: Option<String>,
    pub is_used: bool,
    #[serde(with = "timestamp")]
    pub expires_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "timestamp::option")]
    pub used_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Validation Types
// ============================================================================

/// Request for POST /validation and POST /validation/heartbeat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationRequest {
    pub license_key: String,
    pub machine_id: String,
}

/// Validation outcome. Every field except `valid` is absent on rejection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub valid: bool,
    #[serde(default)]
    pub license_id: Option<i64>,
    #[serde(default)]
    pub customer_id: Option<i64>,
    #[serde(default)]
    pub application_id: Option<i64>,
    #[serde(default)]
    pub status: Option<LicenseStatus>,
    #[serde(default, with = "timestamp::option")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub features: Option<FeatureMap>,
    #[serde(default)]
    pub remaining_activations: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

// ============================================================================
// Service Info Types
// ============================================================================

/// Response from GET /health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub app_name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub database: Option<String>,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy" && self.database.as_deref().map_or(true, |db| db == "healthy")
    }
}

/// Response from GET /
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub message: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub docs_url: Option<String>,
    #[serde(default)]
    pub health_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_naive_and_offset_timestamps() {
        let naive = timestamp::parse("2024-05-01T10:00:00.123456").unwrap();
        let offset = timestamp::parse("2024-05-01T10:00:00.123456+00:00").unwrap();
        assert_eq!(naive, offset);
        assert!(timestamp::parse("yesterday").is_none());
    }

    #[test]
    fn test_license_decodes_optional_fields() {
        let license: License = serde_json::from_value(json!({
            "id": 7,
            "license_key": "ABCDE-FGHIJ-KLMNO-PQRST-UVWXY",
            "customer_id": 1,
            "application_id": 2,
            "status": "active",
            "expires_at": null,
            "max_activations": 3,
            "current_activations": 1,
            "features": {"export": true},
            "notes": null,
            "created_at": "2024-01-01T00:00:00",
            "updated_at": "2024-01-02T00:00:00"
        }))
        .unwrap();

        assert_eq!(license.status, LicenseStatus::Active);
        assert_eq!(license.remaining_activations(), 2);
        assert_eq!(license.feature("export"), Some(&json!(true)));
        assert_eq!(license.feature("missing"), None);
        assert!(!license.is_expired_at(Utc::now()));
    }

    #[test]
    fn test_license_expiry() {
        let mut license: License = serde_json::from_value(json!({
            "id": 1, "license_key": "K", "customer_id": 1, "application_id": 1,
            "status": "active", "expires_at": "2024-01-01T00:00:00Z",
            "max_activations": 1, "current_activations": 3,
            "created_at": "2023-01-01T00:00:00", "updated_at": "2023-01-01T00:00:00"
        }))
        .unwrap();

        assert_eq!(license.remaining_activations(), 0);
        let before = Utc.with_ymd_and_hms(2023, 12, 31, 0, 0, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        assert!(!license.is_expired_at(before));
        assert!(license.is_expired_at(after));

        license.expires_at = None;
        license.status = LicenseStatus::Expired;
        assert!(license.is_expired_at(before));
    }

    #[test]
    fn test_unknown_enum_values_decode() {
        let status: LicenseStatus = serde_json::from_value(json!("archived")).unwrap();
        assert_eq!(status, LicenseStatus::Unknown);
        let scope: TokenScope = serde_json::from_value(json!("billing:read")).unwrap();
        assert_eq!(scope, TokenScope::Unknown);
        let scope: TokenScope = serde_json::from_value(json!("token:management")).unwrap();
        assert_eq!(scope, TokenScope::TokenManagement);
    }

    #[test]
    fn test_update_skips_unset_fields() {
        let update = LicenseUpdate {
            status: Some(LicenseStatus::Suspended),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({"status": "suspended"}));
    }

    #[test]
    fn test_token_response_without_session_token() {
        let response: TokenResponse = serde_json::from_value(json!({"token_type": "bearer"})).unwrap();
        assert!(response.session_token.is_none());
        assert!(response.user.is_none());
    }

    #[test]
    fn test_pagination_page() {
        assert_eq!(Pagination::default(), Pagination { skip: 0, limit: 100 });
        assert_eq!(Pagination::page(2, 25), Pagination { skip: 50, limit: 25 });
    }
}
