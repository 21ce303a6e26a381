//! HTTP status-line detection.
//!
//! A leading three-digit number only counts as a status code when it is an
//! error code (400-599) followed by a known reason phrase, a colon, or a
//! JSON body. "400 days left" and "202 results found" are plain prose.

use std::sync::LazyLock;

use regex::Regex;

static STATUS_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^(?:http(?:/\d(?:\.\d)?)?\s*)?(\d{3})(\s*:\s*|\s+)(.+)$")
        .expect("status line regex must compile")
});

/// Canonical reason phrases for 4xx and 5xx responses.
const REASON_PHRASES: &[&str] = &[
    "bad request",
    "unauthorized",
    "payment required",
    "forbidden",
    "not found",
    "method not allowed",
    "not acceptable",
    "proxy authentication required",
    "request timeout",
    "conflict",
    "gone",
    "length required",
    "precondition failed",
    "payload too large",
    "request entity too large",
    "content too large",
    "uri too long",
    "unsupported media type",
    "range not satisfiable",
    "expectation failed",
    "misdirected request",
    "unprocessable entity",
    "unprocessable content",
    "locked",
    "failed dependency",
    "too early",
    "upgrade required",
    "precondition required",
    "too many requests",
    "request header fields too large",
    "unavailable for legal reasons",
    "internal server error",
    "not implemented",
    "bad gateway",
    "service unavailable",
    "gateway timeout",
    "http version not supported",
    "variant also negotiates",
    "insufficient storage",
    "loop detected",
    "not extended",
    "network authentication required",
    "overloaded",
];

/// A recognized HTTP error status prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusLine<'a> {
    pub code: u16,
    /// Text after the code and its separator, trimmed.
    pub rest: &'a str,
}

impl StatusLine<'_> {
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.code)
    }

    /// Whether the remainder is a JSON body rather than prose.
    pub fn has_json_body(&self) -> bool {
        self.rest.starts_with('{')
    }
}

/// Parse a leading HTTP error status from `text`.
pub fn parse_status_line(text: &str) -> Option<StatusLine<'_>> {
    let caps = STATUS_LINE_RE.captures(text.trim())?;
    let code: u16 = caps.get(1)?.as_str().parse().ok()?;
    if !(400..=599).contains(&code) {
        return None;
    }
    let colon_delimited = caps.get(2)?.as_str().contains(':');
    let rest = caps.get(3)?.as_str().trim();
    if rest.is_empty() {
        return None;
    }
    if colon_delimited || rest.starts_with('{') || starts_with_reason_phrase(rest) {
        Some(StatusLine { code, rest })
    } else {
        None
    }
}

fn starts_with_reason_phrase(rest: &str) -> bool {
    let lower = rest.to_ascii_lowercase();
    REASON_PHRASES.iter().any(|phrase| {
        lower.strip_prefix(phrase).is_some_and(|tail| {
            tail.chars()
                .next()
                .map_or(true, |c| !c.is_alphanumeric() && c != '_')
        })
    })
}
