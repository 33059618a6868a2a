//! Request Invocation
//!
//! Two layers sit on top of [`Session::send`]:
//!
//! - [`Session::invoke`] performs one call and always returns an [`AttemptRecord`].
//!   Transport errors, error statuses and non-JSON bodies become data.
//! - [`Session::invoke_with_fallback`] walks an ordered list of candidate paths
//!   and stops at the first attempt that is a 2xx with an object or array body.
//!
//! Some UIS deployments expose the same resource under `/uis/...` and
//! `/uis/uis/...`; the fallback chain hides that drift from callers.

use crate::uis::session::Session;
use crate::uis::types::{
    AttemptRecord, FallbackResult, Params, RequestInfo, ResponseInfo, TransportFailure,
};
use reqwest::Method;
use serde_json::Value;
use std::future::Future;
use std::time::Instant;
use tracing::debug;

/// `ok` is a pure function of the status code
pub fn is_success_status(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Strict JSON decoding, falling back to the verbatim text
pub fn decode_body(text: String) -> Value {
    match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(_) => Value::String(text),
    }
}

/// Runs a fallback chain over `paths` using `attempt` for each physical call
///
/// Every attempt is appended in call order. The first structured success is
/// selected and ends the chain; otherwise the last attempt is selected, or
/// nothing when `paths` is empty.
pub async fn fallback_chain<P, F, Fut>(paths: &[P], mut attempt: F) -> FallbackResult
where
    P: AsRef<str>,
    F: FnMut(String) -> Fut,
    Fut: Future<Output = AttemptRecord>,
{
    let mut attempts: Vec<AttemptRecord> = Vec::with_capacity(paths.len());

    for path in paths {
        let record = attempt(path.as_ref().to_string()).await;
        let accepted = record.response.is_structured_success();
        attempts.push(record);

        if accepted {
            let selected = attempts.last().cloned();
            return FallbackResult { selected, attempts };
        }
    }

    FallbackResult {
        selected: attempts.last().cloned(),
        attempts,
    }
}

impl Session {
    /// Performs one call against `path` and normalizes the outcome
    pub async fn invoke(
        &self,
        method: Method,
        path: &str,
        params: Option<&Params>,
    ) -> AttemptRecord {
        let url = self.url(path);
        let params = params.cloned().unwrap_or_default();

        let started = Instant::now();
        let outcome = self.send(method.clone(), &url, &params).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let response = match outcome {
            Ok(raw) => ResponseInfo {
                status_code: Some(raw.status),
                elapsed_ms,
                ok: is_success_status(raw.status),
                body: decode_body(raw.text),
                error: None,
            },
            Err(e) => ResponseInfo {
                status_code: e.status,
                elapsed_ms,
                ok: e.status.is_some_and(is_success_status),
                body: Value::String(e.source.to_string()),
                error: Some(TransportFailure::classify(&e.source)),
            },
        };

        debug!(
            "{} {} -> {:?} in {} ms",
            method, url, response.status_code, response.elapsed_ms
        );

        AttemptRecord {
            request: RequestInfo {
                method: method.to_string(),
                url,
                path: path.to_string(),
                params,
            },
            response,
        }
    }

    /// Tries each candidate path in order until one yields a structured success
    pub async fn invoke_with_fallback<P: AsRef<str>>(
        &self,
        method: Method,
        paths: &[P],
        params: Option<&Params>,
    ) -> FallbackResult {
        fallback_chain(paths, |path| {
            let method = method.clone();
            async move { self.invoke(method, &path, params).await }
        })
        .await
    }
}
