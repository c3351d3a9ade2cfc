// Unit tests for the routing gateway: schema validation, dispatch gating,
// skip handling, and dry-run behavior. Destinations are in-memory
// recorders, so nothing here touches the network.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use magpie::routing::destinations::{Destination, SendResult};
use magpie::routing::{validate, Gateway, RouteError};
use serde_json::json;

/// Destination that counts sends instead of performing them.
struct RecordingDestination {
    name: &'static str,
    configured: bool,
    sends: Arc<AtomicUsize>,
}

impl RecordingDestination {
    fn new(name: &'static str, configured: bool) -> (Self, Arc<AtomicUsize>) {
        let sends = Arc::new(AtomicUsize::new(0));
        (
            Self {
                name,
                configured,
                sends: sends.clone(),
            },
            sends,
        )
    }
}

#[async_trait]
impl Destination for RecordingDestination {
    fn name(&self) -> &str {
        self.name
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn send(&self, _payload: &serde_json::Value) -> Result<SendResult> {
        self.sends.fetch_add(1, Ordering::SeqCst);
        Ok(SendResult::ok(format!("sent to {}", self.name)))
    }
}

// ============================================================
// validate — schema checks
// ============================================================

#[test]
fn valid_create_task_passes() {
    let input = json!({"title": "Read the paper", "tags": ["ml", "later"]});
    assert!(validate("create_task", &input).is_ok());
}

#[test]
fn missing_required_field_rejected() {
    let err = validate("create_task", &json!({"notes": "no title"})).unwrap_err();
    match err {
        RouteError::Validation(errors) => {
            assert_eq!(errors.len(), 1);
            assert!(errors[0].contains("title"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn mistyped_required_field_rejected() {
    let err = validate("create_task", &json!({"title": 5})).unwrap_err();
    match err {
        RouteError::Validation(errors) => assert!(errors[0].contains("string")),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn mistyped_optional_field_rejected() {
    let input = json!({"title": "ok", "tags": [1, 2]});
    let err = validate("create_task", &input).unwrap_err();
    match err {
        RouteError::Validation(errors) => assert!(errors[0].contains("tags")),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn multiple_errors_collected_field_by_field() {
    let input = json!({"url": 7, "tags": "not-an-array"});
    let err = validate("save_reference", &input).unwrap_err();
    match err {
        RouteError::Validation(errors) => assert_eq!(errors.len(), 2),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn null_required_field_counts_as_missing() {
    let err = validate("skip", &json!({"reason": null})).unwrap_err();
    assert!(matches!(err, RouteError::Validation(_)));
}

#[test]
fn non_object_input_rejected() {
    let err = validate("skip", &json!("just a string")).unwrap_err();
    assert!(matches!(err, RouteError::Validation(_)));
}

#[test]
fn unknown_action_is_a_distinct_error_kind() {
    let err = validate("launch_missiles", &json!({})).unwrap_err();
    assert_eq!(err, RouteError::UnknownAction("launch_missiles".to_string()));
}

#[test]
fn extra_fields_are_tolerated() {
    // Agents pad their payloads; unknown fields aren't worth rejecting.
    let input = json!({"reason": "meme", "confidence": 0.9});
    assert!(validate("skip", &input).is_ok());
}

// ============================================================
// gateway — dispatch behavior
// ============================================================

#[tokio::test]
async fn successful_dispatch_calls_destination() {
    let (dest, sends) = RecordingDestination::new("tasks", true);
    let gateway = Gateway::new(false).register("create_task", Box::new(dest));

    let result = gateway
        .route("create_task", &json!({"title": "Do the thing"}))
        .await;
    assert!(result.success);
    assert_eq!(sends.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unknown_action_never_calls_send() {
    let (dest, sends) = RecordingDestination::new("tasks", true);
    let gateway = Gateway::new(false).register("create_task", Box::new(dest));

    let result = gateway.route("frobnicate", &json!({})).await;
    assert!(!result.success);
    assert!(result.error.unwrap().contains("unknown action"));
    assert_eq!(sends.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn validation_failure_never_calls_send() {
    let (dest, sends) = RecordingDestination::new("tasks", true);
    let gateway = Gateway::new(false).register("create_task", Box::new(dest));

    let result = gateway.route("create_task", &json!({})).await;
    assert!(!result.success);
    assert_eq!(sends.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unconfigured_destination_fails_without_send() {
    let (dest, sends) = RecordingDestination::new("tasks", false);
    let gateway = Gateway::new(false).register("create_task", Box::new(dest));

    let result = gateway
        .route("create_task", &json!({"title": "Do the thing"}))
        .await;
    assert!(!result.success);
    assert!(result.error.unwrap().contains("not configured"));
    assert_eq!(sends.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn skip_reports_success_without_dispatch() {
    let (dest, sends) = RecordingDestination::new("tasks", true);
    let gateway = Gateway::new(false).register("create_task", Box::new(dest));

    let result = gateway
        .route("skip", &json!({"reason": "just a meme"}))
        .await;
    assert!(result.success);
    assert!(result.message.contains("just a meme"));
    assert_eq!(sends.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn skip_still_requires_a_reason() {
    let gateway = Gateway::new(false);
    let result = gateway.route("skip", &json!({})).await;
    assert!(!result.success);
}

#[tokio::test]
async fn dry_run_validates_but_does_not_send() {
    let (dest, sends) = RecordingDestination::new("tasks", true);
    let gateway = Gateway::new(true).register("create_task", Box::new(dest));

    // Valid input succeeds without a send.
    let result = gateway
        .route("create_task", &json!({"title": "Do the thing"}))
        .await;
    assert!(result.success);
    assert_eq!(sends.load(Ordering::SeqCst), 0);

    // Invalid input still fails: validation runs identically in dry-run.
    let result = gateway.route("create_task", &json!({})).await;
    assert!(!result.success);
}

#[tokio::test]
async fn destination_name_resolves_registrations() {
    let (dest, _) = RecordingDestination::new("tasks", true);
    let gateway = Gateway::new(false).register("create_task", Box::new(dest));

    assert_eq!(gateway.destination_name("create_task"), Some("tasks"));
    assert_eq!(gateway.destination_name("skip"), None);
}
