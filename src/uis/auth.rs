//! UIS Login
//!
//! A single POST to `/uis/spring_check` with credentials in the query string.
//! The session cookie it sets authenticates every later call. The endpoint is
//! canonical, so no path fallback is applied here.

use crate::uis::session::Session;
use crate::uis::types::{AuthResult, AuthVerdict, Params};
use reqwest::Method;
use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::{info, warn};

pub const LOGIN_PATH: &str = "/uis/spring_check";
pub const LOGIN_TYPE: &str = "authorCenter";
pub const ERROR_CODE_FIELD: &str = "loginFailErrorCode";
pub const MESSAGE_FIELD: &str = "loginFailMessage";

/// Error code value meaning the login was accepted
pub const NO_ERROR: i64 = 0;

const MASKED: &str = "******";

/// Derives the login verdict from a decoded response body
///
/// An object body succeeds when the error code is absent, null, or [`NO_ERROR`].
/// Anything that is not an object is a malformed response and fails without a message.
pub fn evaluate_login(body: &Value) -> AuthVerdict {
    let Value::Object(map) = body else {
        return AuthVerdict {
            login_success: false,
            login_message: None,
        };
    };

    let login_success = match map.get(ERROR_CODE_FIELD) {
        None | Some(Value::Null) => true,
        Some(Value::Number(code)) => {
            code.as_i64() == Some(NO_ERROR) || code.as_f64() == Some(NO_ERROR as f64)
        }
        Some(_) => false,
    };

    let login_message = match map.get(MESSAGE_FIELD) {
        None | Some(Value::Null) => None,
        Some(Value::String(message)) => Some(message.clone()),
        Some(other) => Some(other.to_string()),
    };

    AuthVerdict {
        login_success,
        login_message,
    }
}

impl Session {
    fn login_params(&self, password: &str) -> Params {
        let mut params = Params::new();
        params.insert("encrypt".to_string(), Value::from("false"));
        params.insert("loginType".to_string(), Value::from(LOGIN_TYPE));
        params.insert("name".to_string(), Value::from(self.username()));
        params.insert("password".to_string(), Value::from(password));
        params
    }

    /// Logs in and reports whether UIS accepted the credentials
    ///
    /// The recorded request masks the password.
    pub async fn login(&self) -> AuthResult {
        let params = self.login_params(self.password().expose_secret());
        let mut attempt = self.invoke(Method::POST, LOGIN_PATH, Some(&params)).await;

        if let Some(password) = attempt.request.params.get_mut("password") {
            *password = Value::from(MASKED);
        }

        let auth = evaluate_login(&attempt.response.body);
        if auth.login_success {
            info!("Logged in to UIS as {}", self.username());
        } else {
            warn!(
                "UIS login failed (status {:?}): {}",
                attempt.response.status_code,
                auth.login_message.as_deref().unwrap_or("no message")
            );
        }

        AuthResult { attempt, auth }
    }
}
