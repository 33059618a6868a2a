//! UIS Probe Record Types
//!
//! Serializable records describing every HTTP exchange the probe performs.
//! They are written verbatim into the run report, so field names follow the
//! report's snake_case JSON layout.
//!
//! - [`AttemptRecord`] - one physical HTTP call ([`RequestInfo`] + [`ResponseInfo`])
//! - [`FallbackResult`] - the attempts of one fallback chain and the selected one
//! - [`AuthResult`] - the login attempt plus its [`AuthVerdict`]

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Query parameters of a request, in insertion order
pub type Params = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestInfo {
    pub method: String,
    pub url: String,
    pub path: String,
    pub params: Params,
}

/// Why an attempt produced no HTTP response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportFailure {
    Timeout,
    Connect,
    Request,
}

impl TransportFailure {
    pub fn classify(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_connect() {
            Self::Connect
        } else {
            Self::Request
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseInfo {
    /// `None` when the call never produced an HTTP status
    pub status_code: Option<u16>,
    pub elapsed_ms: u64,
    pub ok: bool,
    /// Decoded JSON, or the raw text when decoding failed
    pub body: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<TransportFailure>,
}

impl ResponseInfo {
    /// True when the status is 2xx and the body decoded to an object or array
    pub fn is_structured_success(&self) -> bool {
        self.ok && matches!(self.body, Value::Object(_) | Value::Array(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub request: RequestInfo,
    pub response: ResponseInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FallbackResult {
    pub selected: Option<AttemptRecord>,
    pub attempts: Vec<AttemptRecord>,
}

impl FallbackResult {
    /// Body of the selected attempt, if any
    pub fn selected_body(&self) -> Option<&Value> {
        self.selected.as_ref().map(|a| &a.response.body)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthVerdict {
    pub login_success: bool,
    pub login_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResult {
    #[serde(flatten)]
    pub attempt: AttemptRecord,
    pub auth: AuthVerdict,
}

impl AuthResult {
    pub fn succeeded(&self) -> bool {
        self.auth.login_success
    }
}
