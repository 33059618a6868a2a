//! HTTP Session
//!
//! Owns the single `reqwest::Client` shared by every call of a probe run. The
//! client keeps the cookie jar filled by the login call, so later inventory and
//! report requests are authenticated without carrying tokens explicitly.

use crate::config::UisConfig;
use crate::error::{ProbeError, Result};
use crate::uis::types::Params;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::Method;
use secrecy::SecretString;
use std::time::Duration;
use tracing::debug;

/// Connection settings and transport handle, immutable after construction
pub struct Session {
    base_url: String,
    username: String,
    password: SecretString,
    verify_ssl: bool,
    timeout: Duration,
    client: reqwest::Client,
}

/// Status and undecoded body of a completed exchange
#[derive(Debug)]
pub struct RawResponse {
    pub status: u16,
    pub text: String,
}

/// A call that failed before its body could be read
#[derive(Debug)]
pub struct SendError {
    /// Set when headers arrived but reading the body failed
    pub status: Option<u16>,
    pub source: reqwest::Error,
}

impl Session {
    /// Builds a session against `https://{normalized host}`
    pub fn new(config: &UisConfig) -> Result<Self> {
        Self::with_base_url(config.base_url(), config)
    }

    /// Builds a session against an explicit base address
    pub fn with_base_url(base_url: impl Into<String>, config: &UisConfig) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url)
            .map_err(|e| ProbeError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("uis-probe/", env!("CARGO_PKG_VERSION"))),
        );

        let mut builder = reqwest::Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .timeout(config.timeout());

        if !config.verify_ssl {
            // UIS appliances usually ship self-signed certificates
            builder = builder
                .danger_accept_invalid_certs(true)
                .danger_accept_invalid_hostnames(true);
        }

        let client = builder.build()?;
        debug!("HTTP session created for {}", base_url);

        Ok(Self {
            base_url,
            username: config.username.clone(),
            password: config.password.clone(),
            verify_ssl: config.verify_ssl,
            timeout: config.timeout(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &SecretString {
        &self.password
    }

    pub fn verify_ssl(&self) -> bool {
        self.verify_ssl
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Performs exactly one HTTP round trip
    pub async fn send(
        &self,
        method: Method,
        url: &str,
        params: &Params,
    ) -> std::result::Result<RawResponse, SendError> {
        let response = self
            .client
            .request(method, url)
            .query(params)
            .send()
            .await
            .map_err(|source| SendError {
                status: None,
                source,
            })?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(|source| SendError {
            status: Some(status),
            source,
        })?;

        Ok(RawResponse { status, text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_base_and_path() {
        let session = Session::with_base_url("https://uis.local/", &UisConfig::default()).unwrap();
        assert_eq!(session.base_url(), "https://uis.local");
        assert_eq!(
            session.url("/uis/spring_check"),
            "https://uis.local/uis/spring_check"
        );
    }

    #[test]
    fn test_session_carries_config() {
        let config = UisConfig {
            host: "uis.local:8443".to_string(),
            verify_ssl: true,
            timeout_seconds: 5,
            ..UisConfig::default()
        };
        let session = Session::new(&config).unwrap();
        assert_eq!(session.base_url(), "https://uis.local:8443");
        assert!(session.verify_ssl());
        assert_eq!(session.timeout(), Duration::from_secs(5));
        assert_eq!(session.username(), "admin");
    }

    #[test]
    fn test_unparseable_base_url_is_rejected() {
        let result = Session::with_base_url("not a url", &UisConfig::default());
        assert!(matches!(result, Err(ProbeError::InvalidUrl(_))));
    }
}
