//! Tests for user-facing text sanitization.

use pretty_assertions::assert_eq;
use turnguard::config::GuardConfig;
use turnguard::{sanitize_user_facing_text, TurnGuard};

#[test]
fn strips_final_tags() {
    assert_eq!(sanitize_user_facing_text("<final>Hello</final>"), "Hello");
    assert_eq!(sanitize_user_facing_text("Hi <final>there</final>!"), "Hi there!");
}

#[test]
fn does_not_clobber_numeric_prefixes() {
    assert_eq!(sanitize_user_facing_text("202 results found"), "202 results found");
    assert_eq!(sanitize_user_facing_text("400 days left"), "400 days left");
}

#[test]
fn rewrites_role_errors() {
    assert!(sanitize_user_facing_text("400 Incorrect role information")
        .contains("Message ordering conflict"));
    assert!(sanitize_user_facing_text(
        r#"messages: roles must alternate between "user" and "assistant""#
    )
    .contains("Message ordering conflict"));

    let unsupported = sanitize_user_facing_text(r#"400 Bad Request: Unexpected role "developer""#);
    assert!(unsupported.contains("does not support the message role type"));
    assert!(!unsupported.contains("ordering conflict"));

    assert!(sanitize_user_facing_text("invalid role: system")
        .contains("does not support the message role type"));
    assert!(sanitize_user_facing_text("400 Bad Request: role field is required")
        .contains("Role-related API error"));
}

#[test]
fn ordinary_prose_mentioning_size_is_left_alone() {
    let text = "That image is too large to display here, so I summarized it instead.";
    assert_eq!(sanitize_user_facing_text(text), text);
    let text = "The file was too large.\n\nI split it into three parts.";
    assert_eq!(sanitize_user_facing_text(text), text);
}

#[test]
fn ordinary_prose_about_bad_requests_is_left_alone() {
    let text = "A bad request usually means the role field in your payload is wrong.";
    assert_eq!(sanitize_user_facing_text(text), text);
    let text = "If the API answers with HTTP 400, check each message role.";
    assert_eq!(sanitize_user_facing_text(text), text);
}

#[test]
fn size_errors_with_a_413_status_still_rewrite() {
    assert!(sanitize_user_facing_text("HTTP 413: body too large").starts_with("Context overflow"));
    assert!(sanitize_user_facing_text("request_too_large").starts_with("Context overflow"));
}

#[test]
fn unrelated_400_errors_are_not_role_errors() {
    let result = sanitize_user_facing_text("400 Bad Request: invalid parameter");
    assert!(!result.contains("role"));
    assert!(!result.contains("ordering"));
}

#[test]
fn rewrites_http_status_lines_and_payloads() {
    assert_eq!(
        sanitize_user_facing_text("500 Internal Server Error"),
        "HTTP 500: Internal Server Error"
    );
    let raw = r#"{"type":"error","error":{"message":"Something exploded","type":"server_error"}}"#;
    assert_eq!(
        sanitize_user_facing_text(raw),
        "LLM error server_error: Something exploded"
    );
}

#[test]
fn collapses_consecutive_duplicate_paragraphs() {
    assert_eq!(sanitize_user_facing_text("Hello there!\n\nHello there!"), "Hello there!");
    let distinct = "Hello there!\n\nDifferent line.";
    assert_eq!(sanitize_user_facing_text(distinct), distinct);
}

#[test]
fn ordinary_prose_mentioning_roles_is_untouched() {
    let text = "The model's role in this conversation is unclear";
    assert_eq!(sanitize_user_facing_text(text), text);
}

#[test]
fn sanitizing_is_idempotent() {
    let inputs = [
        "<final>Hello</final>",
        "Hi <final>there</final>!",
        "Hello there!\n\nHello there!\n\nHello there!",
        "a\n\nb\n\nb\n\n\na",
        "400 days left",
        "400 Incorrect role information",
        r#"400 Bad Request: Unexpected role "developer""#,
        "400 Bad Request: role field is required",
        "400 Bad Request: invalid parameter",
        "request_too_large",
        "500 Internal Server Error",
        r#"{"type":"error","error":{"message":"Something exploded","type":"server_error"}}"#,
        "  padded text \n",
    ];
    for input in inputs {
        let once = sanitize_user_facing_text(input);
        let twice = sanitize_user_facing_text(&once);
        assert_eq!(twice, once, "input: {input:?}");
    }
}

#[test]
fn configured_guard_uses_its_reset_command() {
    let guard = TurnGuard::new(&GuardConfig::builder().reset_command("/reset").build());
    let result = guard.sanitize_user_facing_text("roles must alternate");
    assert!(result.contains("/reset"));
    assert_eq!(guard.sanitize_user_facing_text("plain words"), "plain words");
}
