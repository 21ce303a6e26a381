//! Failover hints derived from provider error text.
//!
//! Checks patterns in priority order: billing > rate limit > overloaded >
//! auth > timeout > format. Independent of the friendly-message taxonomy.

use crate::error::FailoverReason;

use super::payload::parse_api_error_payload;
use super::status::parse_status_line;

const BILLING_PATTERNS: &[&str] = &[
    "payment required",
    "insufficient credits",
    "insufficient balance",
    "credit balance",
    "plans & billing",
    "billing",
];

const RATE_LIMIT_PATTERNS: &[&str] = &[
    "rate limit",
    "rate_limit",
    "too many requests",
    "exceeded your current quota",
    "quota exceeded",
    "resource has been exhausted",
    "resource_exhausted",
    "usage limit",
];

const OVERLOADED_PATTERNS: &[&str] = &["overloaded", "service unavailable", "high demand"];

const AUTH_PATTERNS: &[&str] = &[
    "invalid api key",
    "invalid_api_key",
    "incorrect api key",
    "invalid x-api-key",
    "authentication",
    "unauthorized",
    "forbidden",
    "permission denied",
    "permission_error",
    "access denied",
    "token has expired",
];

const TIMEOUT_PATTERNS: &[&str] = &["timeout", "timed out", "deadline exceeded"];

const FORMAT_PATTERNS: &[&str] = &[
    "string should match pattern",
    "tool_use.id",
    "tool_use_id",
    "invalid request format",
];

/// Detect why a provider call failed, when the text says so.
pub fn classify_failover_reason(raw: &str) -> Option<FailoverReason> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_lowercase();
    let code = parse_status_line(trimmed)
        .map(|line| line.code)
        .or_else(|| parse_api_error_payload(trimmed).and_then(|p| p.http_code));
    let has_code = |codes: &[u16]| code.is_some_and(|c| codes.contains(&c));

    if has_code(&[402]) || contains_any(&lower, BILLING_PATTERNS) {
        return Some(FailoverReason::Billing);
    }
    if has_code(&[429]) || contains_any(&lower, RATE_LIMIT_PATTERNS) {
        return Some(FailoverReason::RateLimit);
    }
    if has_code(&[503, 529]) || contains_any(&lower, OVERLOADED_PATTERNS) {
        return Some(FailoverReason::Overloaded);
    }
    if has_code(&[401, 403]) || contains_any(&lower, AUTH_PATTERNS) {
        return Some(FailoverReason::Auth);
    }
    if has_code(&[408, 504]) || contains_any(&lower, TIMEOUT_PATTERNS) {
        return Some(FailoverReason::Timeout);
    }
    if contains_any(&lower, FORMAT_PATTERNS) {
        return Some(FailoverReason::Format);
    }
    None
}

fn contains_any(haystack: &str, patterns: &[&str]) -> bool {
    patterns.iter().any(|p| haystack.contains(p))
}
