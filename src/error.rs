// Error types for the API client, session and storage layers

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Failure of a single API call. Never retried by this crate.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network failure, malformed base URL, or timeout.
    #[error("API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("API returned status {status}{}", fmt_detail(.detail))]
    Status {
        status: StatusCode,
        detail: Option<String>,
    },

    /// Backend answered 2xx but the body did not match the expected schema.
    #[error("Failed to parse API response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// HTTP status of the failure, if the backend answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
            ApiError::Decode(_) => None,
        }
    }

    /// The credential was missing, expired or rejected.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// Build a status error from a raw response body.
    pub(crate) fn from_body(status: StatusCode, body: &str) -> Self {
        ApiError::Status {
            status,
            detail: parse_detail(body),
        }
    }
}

fn fmt_detail(detail: &Option<String>) -> String {
    detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default()
}

/// FastAPI error bodies: `{"detail": "..."}` or `{"detail": [{"msg": ...}, ...]}`
#[derive(Deserialize)]
struct ErrorBody {
    detail: ErrorDetail,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Message(String),
    Validation(Vec<ValidationIssue>),
}

#[derive(Deserialize)]
struct ValidationIssue {
    #[serde(default)]
    loc: Vec<serde_json::Value>,
    msg: String,
}

fn parse_detail(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<ErrorBody>(trimmed) {
        Ok(ErrorBody {
            detail: ErrorDetail::Message(msg),
        }) => Some(msg),
        Ok(ErrorBody {
            detail: ErrorDetail::Validation(issues),
        }) => {
            let joined = issues
                .iter()
                .map(|issue| {
                    let field = issue
                        .loc
                        .iter()
                        .filter_map(|part| match part {
                            serde_json::Value::String(s) if s != "body" => Some(s.clone()),
                            serde_json::Value::Number(n) => Some(n.to_string()),
                            _ => None,
                        })
                        .collect::<Vec<_>>()
                        .join(".");
                    if field.is_empty() {
                        issue.msg.clone()
                    } else {
                        format!("{}: {}", field, issue.msg)
                    }
                })
                .collect::<Vec<_>>()
                .join("; ");
            Some(joined)
        }
        // Not JSON (proxy error pages etc.), keep a bounded excerpt
        Err(_) => Some(trimmed.chars().take(200).collect()),
    }
}

/// Failure of a session operation (login / verify).
#[derive(Debug, Error)]
pub enum SessionError {
    /// Bad credentials, missing session token, or the user profile could
    /// not be loaded with the new token.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Any other API failure, passed through unchanged.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Failure of a durable credential medium.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Keychain error: {0}")]
    Keychain(#[from] keyring::Error),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialize error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No config directory available")]
    NoConfigDir,
}

/// Failure to assemble a session from settings.
#[derive(Debug, Error)]
pub enum InitError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Failed to create HTTP client: {0}")]
    Http(#[from] ApiError),
}

/// Failure to load or save console settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidEnv { key: &'static str, value: String },

    #[error("No config directory available")]
    NoConfigDir,
}
