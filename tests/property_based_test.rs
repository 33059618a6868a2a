//! Property-based tests using proptest
//!
//! Tests that verify properties hold for arbitrary inputs.

use proptest::prelude::*;
use serde_json::{json, Value};
use uis_probe::config::normalize_host;
use uis_probe::uis::auth::evaluate_login;
use uis_probe::uis::invoke::{fallback_chain, is_success_status};
use uis_probe::uis::resolve::resolve_identifier;
use uis_probe::uis::types::{Params, RequestInfo, ResponseInfo};
use uis_probe::uis::{AttemptRecord, FallbackResult};

/// Simulated outcome of one physical call
#[derive(Debug, Clone)]
struct Outcome {
    status: Option<u16>,
    body: Value,
}

impl Outcome {
    fn record(&self, path: &str) -> AttemptRecord {
        AttemptRecord {
            request: RequestInfo {
                method: "GET".to_string(),
                url: format!("https://uis.test{}", path),
                path: path.to_string(),
                params: Params::new(),
            },
            response: ResponseInfo {
                status_code: self.status,
                elapsed_ms: 0,
                ok: self.status.is_some_and(is_success_status),
                body: self.body.clone(),
                error: None,
            },
        }
    }
}

fn body_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(json!({"data": []})),
        Just(json!([1, 2])),
        "\\PC{0,16}".prop_map(Value::String),
        any::<i64>().prop_map(Value::from),
        Just(Value::Null),
    ]
}

fn outcome_strategy() -> impl Strategy<Value = Outcome> {
    (prop::option::of(100u16..600), body_strategy())
        .prop_map(|(status, body)| Outcome { status, body })
}

/// Runs a fallback chain where the n-th candidate path yields the n-th outcome
fn run_chain(outcomes: &[Outcome]) -> FallbackResult {
    let paths: Vec<String> = (0..outcomes.len()).map(|i| format!("/p{}", i)).collect();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("Failed to build runtime");

    runtime.block_on(fallback_chain(paths.as_slice(), |path: String| {
        let index: usize = path[2..].parse().expect("index path");
        std::future::ready(outcomes[index].record(&path))
    }))
}

fn selectable(outcome: &Outcome) -> bool {
    outcome.status.is_some_and(is_success_status)
        && matches!(outcome.body, Value::Object(_) | Value::Array(_))
}

fn source_with_id(id: i64) -> FallbackResult {
    let outcome = Outcome {
        status: Some(200),
        body: json!({"data": [{"id": id}]}),
    };
    let record = outcome.record("/uis/vm/list/summary");
    FallbackResult {
        selected: Some(record.clone()),
        attempts: vec![record],
    }
}

proptest! {
    #[test]
    fn test_chain_stops_at_first_structured_success(
        outcomes in prop::collection::vec(outcome_strategy(), 0..6)
    ) {
        // Given: Candidate paths with arbitrary outcomes
        let first_hit = outcomes.iter().position(selectable);

        // When: Running the fallback chain
        let result = run_chain(&outcomes);

        // Then: Attempts stop right after the first structured success
        let expected_len = first_hit.map_or(outcomes.len(), |i| i + 1);
        prop_assert_eq!(result.attempts.len(), expected_len);
        for (i, attempt) in result.attempts.iter().enumerate() {
            let expected_path = format!("/p{}", i);
            prop_assert_eq!(&attempt.request.path, &expected_path);
        }
    }

    #[test]
    fn test_chain_selection_is_first_success_or_last_attempt(
        outcomes in prop::collection::vec(outcome_strategy(), 0..6)
    ) {
        // Given: Candidate paths with arbitrary outcomes
        // When: Running the fallback chain
        let result = run_chain(&outcomes);

        // Then: The selected attempt is one of the recorded attempts
        match outcomes.iter().position(selectable) {
            Some(i) => {
                prop_assert_eq!(result.selected.as_ref(), result.attempts.get(i));
            }
            None => {
                prop_assert_eq!(result.selected.as_ref(), result.attempts.last());
            }
        }
        prop_assert_eq!(result.selected.is_none(), outcomes.is_empty());
    }

    #[test]
    fn test_ok_follows_status_only(status in 100u16..600) {
        // Given: Any HTTP status code
        // When: Checking success
        // Then: Only the 2xx range is ok
        prop_assert_eq!(is_success_status(status), (200..=299).contains(&status));
    }

    #[test]
    fn test_explicit_id_always_wins(explicit in any::<i64>(), found in any::<i64>()) {
        // Given: An explicit id and an inventory listing another id
        let source = source_with_id(found);

        // When: Resolving the target id
        let resolved = resolve_identifier(Some(explicit), &[&source]);

        // Then: The explicit id is used unchanged
        prop_assert_eq!(resolved, Some(explicit));
    }

    #[test]
    fn test_first_listed_id_is_resolved(first in any::<i64>(), second in any::<i64>()) {
        // Given: Two sources with records and no explicit id
        let a = source_with_id(first);
        let b = source_with_id(second);

        // When: Resolving
        // Then: The first source wins
        prop_assert_eq!(resolve_identifier(None, &[&a, &b]), Some(first));
    }

    #[test]
    fn test_nonzero_error_code_never_logs_in(
        code in any::<i64>().prop_filter("non-zero", |c| *c != 0),
        message in "\\PC{0,32}"
    ) {
        // Given: A login response carrying a failure code
        let body = json!({"loginFailErrorCode": code, "loginFailMessage": message.clone()});

        // When: Evaluating it
        let verdict = evaluate_login(&body);

        // Then: Login fails and the message is surfaced
        prop_assert!(!verdict.login_success);
        prop_assert_eq!(verdict.login_message, Some(message));
    }

    #[test]
    fn test_non_object_login_body_fails(text in "\\PC*") {
        // Given: A login response that is not a JSON object
        let verdict = evaluate_login(&Value::String(text));

        // Then: Login fails without a message
        prop_assert!(!verdict.login_success);
        prop_assert!(verdict.login_message.is_none());
    }

    #[test]
    fn test_login_url_reduces_to_authority(
        host in "[a-z][a-z0-9-]{0,20}(\\.[a-z0-9]{1,10}){0,3}",
        port in 1u16..=u16::MAX,
        path in "(/[a-zA-Z0-9_]{0,8}){0,3}"
    ) {
        // Given: A full login URL
        let url = format!("https://{}:{}{}", host, port, path);

        // When: Normalizing it
        // Then: Only host[:port] remains
        prop_assert_eq!(normalize_host(&url), format!("{}:{}", host, port));
    }

    #[test]
    fn test_normalize_host_never_panics(raw in "\\PC*") {
        let _ = normalize_host(&raw);
    }
}
