//! Tests for provider error classification.

mod common;

use common::failed_turn;
use pretty_assertions::assert_eq;
use turnguard::error::ErrorCategory;
use turnguard::types::{AssistantTurn, StopReason};
use turnguard::{classify_error, format_assistant_error, format_error_text};

fn assistant_error(raw: &str) -> String {
    format_assistant_error(&failed_turn(raw)).expect("failed turns always produce text")
}

#[test]
fn role_ordering_errors_get_ordering_message() {
    let inputs = [
        r#"messages: roles must alternate between "user" and "assistant""#,
        "incorrect role information",
        r#"{"error":{"message":"messages.1.role: incorrect role information"}}"#,
        "messages.3.role: incorrect role for this position",
    ];
    for raw in inputs {
        let result = assistant_error(raw);
        assert!(result.contains("Message ordering conflict"), "{raw}: {result}");
        assert!(result.contains("/new"), "{raw}: {result}");
        assert!(!result.contains("does not support"), "{raw}: {result}");
        assert!(!result.contains("Role-related API error"), "{raw}: {result}");
    }
}

#[test]
fn unsupported_role_errors_get_role_type_message() {
    let inputs = [
        r#"400 Bad Request: Unexpected role "developer""#,
        "invalid role: system",
        "unsupported role type: developer",
        "role 'system' not supported by this model",
        r#"{"type":"error","error":{"message":"Unexpected role \"developer\""}}"#,
    ];
    for raw in inputs {
        let result = assistant_error(raw);
        assert!(
            result.contains("does not support the message role type"),
            "{raw}: {result}"
        );
        assert!(!result.contains("ordering conflict"), "{raw}: {result}");
    }
    assert!(assistant_error("400 Bad Request: Unexpected role \"developer\"").contains("/new"));
}

#[test]
fn generic_400_role_errors_fall_back_to_role_related_message() {
    for raw in [
        "400 Bad Request: role field is required",
        "400 Bad Request: invalid message role",
    ] {
        let result = assistant_error(raw);
        assert!(result.contains("Role-related API error"), "{raw}: {result}");
        assert!(result.contains("/new"), "{raw}: {result}");
    }
}

#[test]
fn unrelated_400_errors_do_not_mention_roles() {
    let result = assistant_error("400 Bad Request: invalid parameter");
    assert!(!result.contains("role"));
    assert!(!result.contains("ordering conflict"));
    assert_eq!(result, "HTTP 400: Bad Request: invalid parameter");
}

#[test]
fn role_word_without_client_error_is_left_alone() {
    let raw = "The model's role in this conversation is unclear";
    let classification = classify_error(raw);
    assert_eq!(classification.category, ErrorCategory::Uncategorized);
    assert_eq!(classification.message, raw);
    assert!(!classification.message.contains("ordering conflict"));
    assert!(!classification.message.contains("does not support"));
}

#[test]
fn context_overflow_is_not_a_role_error() {
    for raw in [
        "request_too_large",
        "413 Request Entity Too Large",
        concat!(
            r#"{"error":{"type":"invalid_request_error","#,
            r#""message":"prompt is too long: 210000 tokens > 200000 maximum"}}"#
        ),
    ] {
        let classification = classify_error(raw);
        assert_eq!(classification.category, ErrorCategory::ContextOverflow, "{raw}");
        assert!(classification.message.contains("Context overflow"));
        assert!(!classification.message.contains("role"));
    }
}

#[test]
fn specific_role_patterns_take_precedence() {
    let unsupported = classify_error("400 Bad Request: Unexpected role 'developer'");
    assert_eq!(unsupported.category, ErrorCategory::UnsupportedRoleType);
    assert!(!unsupported.message.contains("ordering conflict"));
    assert!(!unsupported.message.contains("Role-related API error"));

    let ordering = classify_error("400 Bad Request: roles must alternate");
    assert_eq!(ordering.category, ErrorCategory::RoleOrderingConflict);
    assert!(!ordering.message.contains("does not support"));
    assert!(!ordering.message.contains("Role-related API error"));
}

#[test]
fn http_status_lines_are_reformatted() {
    assert_eq!(
        format_error_text("500 Internal Server Error"),
        "HTTP 500: Internal Server Error"
    );
    assert_eq!(
        classify_error("HTTP 502: upstream closed connection").category,
        ErrorCategory::HttpStatusError
    );
}

#[test]
fn numeric_prefixes_in_prose_are_not_status_codes() {
    for raw in ["400 days left", "202 results found"] {
        let classification = classify_error(raw);
        assert_eq!(classification.category, ErrorCategory::Uncategorized);
        assert_eq!(classification.message, raw);
    }
}

#[test]
fn raw_payloads_use_type_and_message() {
    let raw = r#"{"type":"error","error":{"message":"Something exploded","type":"server_error"}}"#;
    let classification = classify_error(raw);
    assert_eq!(classification.category, ErrorCategory::RawProviderError);
    assert_eq!(classification.message, "LLM error server_error: Something exploded");
}

#[test]
fn raw_payloads_carry_status_and_request_id() {
    let raw = concat!(
        r#"HTTP 529: {"type":"error","error":{"type":"overloaded_error","message":"Overloaded"},"#,
        r#""request_id":"req_abc"}"#
    );
    assert_eq!(
        format_error_text(raw),
        "HTTP 529 overloaded_error: Overloaded (request_id: req_abc)"
    );
}

#[test]
fn malformed_json_falls_through_to_plain_text() {
    let raw = r#"{"error": {"message": "roles must alternate""#;
    // Still matched on the raw text, just without unwrapping.
    assert_eq!(
        classify_error(raw).category,
        ErrorCategory::RoleOrderingConflict
    );
    assert_eq!(classify_error("{oops").message, "{oops");
}

#[test]
fn non_error_turns_pass_through_unchanged() {
    let turn = AssistantTurn {
        stop_reason: StopReason::Stop,
        error_message: Some("roles must alternate".to_string()),
    };
    assert_eq!(
        format_assistant_error(&turn).as_deref(),
        Some("roles must alternate")
    );
    assert_eq!(format_assistant_error(&AssistantTurn::default()), None);
}

#[test]
fn failed_turn_without_text_gets_generic_message() {
    let turn = AssistantTurn {
        stop_reason: StopReason::Error,
        error_message: None,
    };
    assert_eq!(
        format_assistant_error(&turn).as_deref(),
        Some("LLM request failed with an unknown error.")
    );
}

#[test]
fn assistant_turns_deserialize_from_client_shape() {
    let turn: AssistantTurn = serde_json::from_value(serde_json::json!({
        "stopReason": "error",
        "errorMessage": "incorrect role information",
    }))
    .unwrap();
    assert!(turn.is_error());
    assert!(assistant_error("incorrect role information")
        .contains("Message ordering conflict"));
    assert_eq!(format_assistant_error(&turn), Some(assistant_error("incorrect role information")));
}

#[test]
fn error_categories_have_stable_names() {
    assert_eq!(ErrorCategory::RoleOrderingConflict.to_string(), "role_ordering_conflict");
    assert_eq!(
        "unsupported_role_type".parse::<ErrorCategory>().unwrap(),
        ErrorCategory::UnsupportedRoleType
    );
    assert!(ErrorCategory::GenericRoleError.suggests_reset());
    assert!(!ErrorCategory::ContextOverflow.is_role_error());
}
