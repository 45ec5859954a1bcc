use std::sync::Arc;

use license_console::api_types::{
    ApiTokenCreate, CustomerCreate, LicenseCreate, LicenseStatus, LicenseUpdate, OfflineCodeRequest,
    Pagination, TokenScope,
};
use license_console::auth::TokenStore;
use license_console::client::ApiRegistry;
use license_console::ApiError;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn registry_for(server: &MockServer, tokens: Arc<TokenStore>) -> ApiRegistry {
    ApiRegistry::new(reqwest::Client::new(), server.uri(), "/api/v1", tokens)
}

fn license_json(id: i64, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "license_key": "ABCDE-FGHIJ-KLMNO-PQRST-UVWXY",
        "customer_id": 1,
        "application_id": 2,
        "status": status,
        "expires_at": null,
        "max_activations": 5,
        "current_activations": 2,
        "features": null,
        "notes": "pilot",
        "created_at": "2024-03-01T09:30:00.000001",
        "updated_at": "2024-03-01T09:30:00.000001"
    })
}

#[tokio::test]
async fn test_failed_request_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/customers/"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let registry = registry_for(&server, Arc::new(TokenStore::in_memory()));
    let err = registry.customers().list(Pagination::default()).await.unwrap_err();

    assert_eq!(err.status().map(|s| s.as_u16()), Some(503));
    server.verify().await;
}

#[tokio::test]
async fn test_network_error_is_reported_once() {
    // Nothing listens on port 1
    let registry = ApiRegistry::new(
        reqwest::Client::new(),
        "http://127.0.0.1:1",
        "/api/v1",
        Arc::new(TokenStore::in_memory()),
    );

    let err = registry.licenses().get(1).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

#[tokio::test]
async fn test_client_built_before_login_sees_new_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/licenses/7"))
        .and(header("authorization", "Bearer later-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(license_json(7, "active")))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = Arc::new(TokenStore::in_memory());
    let registry = registry_for(&server, tokens.clone());
    let licenses = registry.licenses();

    tokens.set(Some("later-token".to_string()));
    let license = licenses.get(7).await.unwrap();

    assert_eq!(license.id, 7);
    assert_eq!(license.remaining_activations(), 3);
    assert_eq!(license.notes.as_deref(), Some("pilot"));
}

#[tokio::test]
async fn test_anonymous_requests_have_no_authorization_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "healthy",
            "app_name": "License Management API",
            "version": "1.0.0",
            "database": "healthy"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let registry = registry_for(&server, Arc::new(TokenStore::in_memory()));
    let health = registry.default_api().health().await.unwrap();
    assert!(health.is_healthy());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_customer_create_and_list() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/customers/"))
        .and(body_json(json!({"name": "Acme", "email": "ops@acme.test"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 3, "name": "Acme", "email": "ops@acme.test", "company": null,
            "created_at": "2024-02-02T10:00:00"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/customers/"))
        .and(query_param("skip", "20"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let registry = registry_for(&server, Arc::new(TokenStore::in_memory()));
    let customers = registry.customers();

    let created = customers
        .create(&CustomerCreate {
            name: "Acme".to_string(),
            email: "ops@acme.test".to_string(),
            company: None,
        })
        .await
        .unwrap();
    assert_eq!(created.id, 3);
    assert!(created.company.is_none());

    let page = customers.list(Pagination::page(2, 10)).await.unwrap();
    assert!(page.is_empty());
}

#[tokio::test]
async fn test_license_lifecycle_calls() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/licenses/"))
        .and(body_json(json!({"customer_id": 1, "application_id": 2, "max_activations": 5})))
        .respond_with(ResponseTemplate::new(201).set_body_json(license_json(9, "active")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/licenses/9"))
        .and(body_json(json!({"status": "suspended"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(license_json(9, "suspended")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/licenses/9/block"))
        .respond_with(ResponseTemplate::new(200).set_body_json(license_json(9, "blocked")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/licenses/9"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let registry = registry_for(&server, Arc::new(TokenStore::in_memory()));
    let licenses = registry.licenses();

    let created = licenses
        .create(&LicenseCreate {
            customer_id: 1,
            application_id: 2,
            expires_at: None,
            max_activations: 5,
            features: None,
            notes: None,
        })
        .await
        .unwrap();
    assert_eq!(created.status, LicenseStatus::Active);

    let updated = licenses
        .update(
            9,
            &LicenseUpdate {
                status: Some(LicenseStatus::Suspended),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.status, LicenseStatus::Suspended);

    let blocked = licenses.block(9).await.unwrap();
    assert_eq!(blocked.status, LicenseStatus::Blocked);

    licenses.delete(9).await.unwrap();
}

#[tokio::test]
async fn test_not_found_detail_is_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/applications/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Application not found"})))
        .mount(&server)
        .await;

    let registry = registry_for(&server, Arc::new(TokenStore::in_memory()));
    let err = registry.applications().get(99).await.unwrap_err();

    assert!(err.is_not_found());
    assert!(err.to_string().ends_with("Application not found"));
}

#[tokio::test]
async fn test_api_token_creation_returns_secret_once() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/tokens"))
        .and(body_json(json!({"name": "ci", "scopes": ["license:read", "validation"]})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 5, "name": "ci", "scopes": ["license:read", "validation"],
            "is_active": true, "expires_at": null,
            "created_at": "2024-04-04T04:04:04", "token": "lm_secret"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/auth/tokens"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 5, "name": "ci", "scopes": ["license:read", "validation"],
            "is_active": true, "expires_at": null, "last_used_at": null,
            "created_at": "2024-04-04T04:04:04"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let registry = registry_for(&server, Arc::new(TokenStore::in_memory()));
    let auth = registry.authentication();

    let created = auth
        .create_api_token(&ApiTokenCreate {
            name: "ci".to_string(),
            scopes: vec![TokenScope::LicenseRead, TokenScope::Validation],
            expires_at: None,
        })
        .await
        .unwrap();
    assert_eq!(created.token, "lm_secret");

    let tokens = auth.list_api_tokens().await.unwrap();
    assert_eq!(tokens.len(), 1);
    assert!(!tokens[0].is_expired_at(chrono::Utc::now()));
}

#[tokio::test]
async fn test_offline_codes_and_form_completion() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/activation-forms/offline-codes"))
        .and(body_json(json!({"license_key_id": 9, "quantity": 2})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "license_key_id": 9, "activation_code": "AC-1", "machine_id": null,
             "is_used": false, "expires_at": "2024-06-01T00:00:00", "created_at": "2024-05-01T00:00:00", "used_at": null},
            {"id": 2, "license_key_id": 9, "activation_code": "AC-2", "machine_id": null,
             "is_used": false, "expires_at": "2024-06-01T00:00:00", "created_at": "2024-05-01T00:00:00", "used_at": null}
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/activation-forms/complete"))
        .and(body_json(json!({"request_code": "RQ-1", "activation_code": "AC-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 4, "license_key_id": 9, "machine_id": "hw-1", "machine_name": null,
            "request_code": "RQ-1", "activation_code": "AC-1", "status": "completed",
            "expires_at": "2024-06-01T00:00:00", "created_at": "2024-05-01T00:00:00",
            "completed_at": "2024-05-02T00:00:00"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let registry = registry_for(&server, Arc::new(TokenStore::in_memory()));
    let forms = registry.activation_forms();

    let codes = forms
        .generate_offline_codes(&OfflineCodeRequest {
            license_key_id: 9,
            machine_id: None,
            quantity: 2,
        })
        .await
        .unwrap();
    assert_eq!(codes.len(), 2);

    let form = forms.complete("RQ-1", "AC-1").await.unwrap();
    assert!(form.is_completed());
}

#[tokio::test]
async fn test_validation_normalizes_key() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/validation/"))
        .and(body_json(json!({"license_key": "ABCDE-FGHIJ-KLMNO-PQRST-UVWXY", "machine_id": "hw-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "valid": false, "message": "License has been blocked"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let registry = registry_for(&server, Arc::new(TokenStore::in_memory()));
    let result = registry
        .validation()
        .validate("abcdefghijklmnopqrstuvwxy", "hw-1")
        .await
        .unwrap();

    assert!(!result.valid);
    assert_eq!(result.message.as_deref(), Some("License has been blocked"));
    assert!(result.license_id.is_none());
}

#[tokio::test]
async fn test_set_base_url_moves_every_client() {
    let old_server = MockServer::start().await;
    let new_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/activations/license/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&new_server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&old_server)
        .await;

    let registry = registry_for(&old_server, Arc::new(TokenStore::in_memory()));
    registry.set_base_url(&new_server.uri());

    let activations = registry.activations().list_for_license(3).await.unwrap();
    assert!(activations.is_empty());
}
