//! Provider error classification.
//!
//! Raw error text is unwrapped (JSON payloads, HTTP status prefixes) and then
//! run through an ordered rule table. The first rule whose predicate holds
//! decides the [`ErrorCategory`] and renders the friendly message.

pub mod failover;
pub mod payload;
pub mod status;

pub use failover::classify_failover_reason;
pub use payload::{parse_api_error_payload, ApiErrorPayload};
pub use status::{parse_status_line, StatusLine};

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::config::GuardConfig;
use crate::error::ErrorCategory;
use crate::types::{AssistantTurn, StopReason};

pub(crate) const DEFAULT_RESET_COMMAND: &str = "/new";
pub(crate) const DEFAULT_MAX_ERROR_CHARS: usize = 600;

const UNKNOWN_FAILURE_TEXT: &str = "LLM request failed with an unknown error.";
const CONTEXT_OVERFLOW_TEXT: &str =
    "Context overflow: prompt too large for the model. Try again with less input or a larger-context model.";

static ROLE_ORDERING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\broles\s+must\s+alternate\b|\bincorrect\s+role\s+information\b|\bmessages\.\d+\.role\b.*\bincorrect\s+role\b",
    )
    .expect("role ordering regex must compile")
});

static UNSUPPORTED_ROLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:unexpected|invalid|unsupported|unknown)\s+role\b|\brole\b[^.\n]{0,60}?\bnot\s+(?:supported|allowed)\b",
    )
    .expect("unsupported role regex must compile")
});

static ROLE_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\brole(?:\s+type)?(?:\s*[:=]\s*["'`]?|\s+["'`])([a-z][\w-]*)"#)
        .expect("role name regex must compile")
});

static ROLE_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\broles?\b").expect("role word regex must compile"));

/// Client-error wording at the very start of the text.
static LEADING_CLIENT_ERROR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:(?:http(?:/\d(?:\.\d)?)?|status(?:\s+code)?|error\s+code)\s*:?\s*4\d{2}\b|bad\s+request\s*:|invalid_request_error\b)",
    )
    .expect("client error regex must compile")
});

static CONTEXT_OVERFLOW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\brequest[_\s]+too[_\s]+large\b|\b(?:payload|entity)\s+too\s+large\b|request\s+exceeds\s+the\s+maximum\s+size|context[_\s]length[_\s]exceeded|maximum\s+context\s+length|prompt\s+is\s+too\s+long|exceeds\s+(?:the\s+)?model(?:'s)?\s+context\s+window|\bcontext\s+overflow\b",
    )
    .expect("context overflow regex must compile")
});

/// Counts as overflow only next to a 413 status.
static TOO_LARGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\btoo[_\s]+large\b").expect("too large regex must compile"));

/// The outcome of classifying one raw error string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub category: ErrorCategory,
    pub message: String,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Raw error text after preprocessing.
pub(crate) struct ErrorContext<'a> {
    raw: &'a str,
    /// Unwrapped payload message, or `raw` when there is none.
    effective: &'a str,
    payload: Option<&'a ApiErrorPayload>,
    status: Option<StatusLine<'a>>,
    /// HTTP code from a status line or the payload.
    status_code: Option<u16>,
    client_error: bool,
}

impl<'a> ErrorContext<'a> {
    pub(crate) fn new(raw: &'a str, payload: Option<&'a ApiErrorPayload>) -> Self {
        let effective = payload.map_or(raw, |p| p.message.as_str());
        let status = parse_status_line(raw);
        let effective_status = parse_status_line(effective);
        let client_error = status.is_some_and(|s| s.is_client_error())
            || effective_status.is_some_and(|s| s.is_client_error())
            || payload.is_some_and(ApiErrorPayload::is_client_error)
            || LEADING_CLIENT_ERROR_RE.is_match(raw)
            || LEADING_CLIENT_ERROR_RE.is_match(effective);
        let status_code = status
            .or(effective_status)
            .map(|s| s.code)
            .or_else(|| payload.and_then(|p| p.http_code));
        Self {
            raw,
            effective,
            payload,
            status,
            status_code,
            client_error,
        }
    }

    fn error_status(&self) -> Option<StatusLine<'a>> {
        self.status.filter(|s| !s.has_json_body())
    }

    /// Whether the text has a shape the classifier rewrites.
    pub(crate) fn is_recognized_error(&self) -> bool {
        RULES
            .iter()
            .filter(|rule| rule.category != ErrorCategory::Uncategorized)
            .any(|rule| (rule.matches)(self))
    }
}

struct Rule {
    category: ErrorCategory,
    matches: fn(&ErrorContext<'_>) -> bool,
    render: fn(&ErrorContext<'_>, &ErrorClassifier) -> String,
}

/// Priority order; first match wins.
const RULES: &[Rule] = &[
    Rule {
        category: ErrorCategory::RoleOrderingConflict,
        matches: is_role_ordering,
        render: render_role_ordering,
    },
    Rule {
        category: ErrorCategory::UnsupportedRoleType,
        matches: is_unsupported_role,
        render: render_unsupported_role,
    },
    Rule {
        category: ErrorCategory::GenericRoleError,
        matches: is_generic_role_error,
        render: render_generic_role,
    },
    Rule {
        category: ErrorCategory::ContextOverflow,
        matches: is_context_overflow_error,
        render: render_context_overflow,
    },
    Rule {
        category: ErrorCategory::HttpStatusError,
        matches: is_http_status_error,
        render: render_http_status,
    },
    Rule {
        category: ErrorCategory::RawProviderError,
        matches: is_raw_provider_error,
        render: render_raw_provider,
    },
    Rule {
        category: ErrorCategory::Uncategorized,
        matches: always,
        render: render_uncategorized,
    },
];

fn is_role_ordering(ctx: &ErrorContext<'_>) -> bool {
    ROLE_ORDERING_RE.is_match(ctx.effective)
}

fn is_unsupported_role(ctx: &ErrorContext<'_>) -> bool {
    UNSUPPORTED_ROLE_RE.is_match(ctx.effective)
}

fn is_generic_role_error(ctx: &ErrorContext<'_>) -> bool {
    ctx.client_error && ROLE_WORD_RE.is_match(ctx.effective) && !is_context_overflow_error(ctx)
}

fn is_context_overflow_error(ctx: &ErrorContext<'_>) -> bool {
    CONTEXT_OVERFLOW_RE.is_match(ctx.effective)
        || (ctx.status_code == Some(413) && TOO_LARGE_RE.is_match(ctx.effective))
}

fn is_http_status_error(ctx: &ErrorContext<'_>) -> bool {
    ctx.error_status().is_some()
}

fn is_raw_provider_error(ctx: &ErrorContext<'_>) -> bool {
    ctx.payload.is_some()
}

fn always(_ctx: &ErrorContext<'_>) -> bool {
    true
}

fn render_role_ordering(_ctx: &ErrorContext<'_>, classifier: &ErrorClassifier) -> String {
    format!(
        "Message ordering conflict - please try again. If this persists, use {} to start a new conversation.",
        classifier.reset_command
    )
}

fn render_unsupported_role(ctx: &ErrorContext<'_>, classifier: &ErrorClassifier) -> String {
    let named = ROLE_NAME_RE
        .captures(ctx.effective)
        .and_then(|caps| caps.get(1))
        .map(|m| format!(" \"{}\"", m.as_str()))
        .unwrap_or_default();
    format!(
        "This model does not support the message role type{named} used in this conversation. Use {} to start a new conversation.",
        classifier.reset_command
    )
}

fn render_generic_role(_ctx: &ErrorContext<'_>, classifier: &ErrorClassifier) -> String {
    format!(
        "Role-related API error: the provider rejected a message in this conversation. Use {} to start a new conversation.",
        classifier.reset_command
    )
}

fn render_context_overflow(_ctx: &ErrorContext<'_>, _classifier: &ErrorClassifier) -> String {
    CONTEXT_OVERFLOW_TEXT.to_string()
}

fn render_http_status(ctx: &ErrorContext<'_>, classifier: &ErrorClassifier) -> String {
    match ctx.error_status() {
        Some(status) => format!(
            "HTTP {}: {}",
            status.code,
            classifier.truncate(status.rest)
        ),
        None => render_uncategorized(ctx, classifier),
    }
}

fn render_raw_provider(ctx: &ErrorContext<'_>, classifier: &ErrorClassifier) -> String {
    let Some(payload) = ctx.payload else {
        return render_uncategorized(ctx, classifier);
    };
    let prefix = match payload.http_code {
        Some(code) => format!("HTTP {code}"),
        None => "LLM error".to_string(),
    };
    let error_type = payload
        .error_type
        .as_deref()
        .map(|t| format!(" {t}"))
        .unwrap_or_default();
    let request_id = payload
        .request_id
        .as_deref()
        .map(|id| format!(" (request_id: {id})"))
        .unwrap_or_default();
    format!(
        "{prefix}{error_type}: {}{request_id}",
        classifier.truncate(&payload.message)
    )
}

fn render_uncategorized(ctx: &ErrorContext<'_>, classifier: &ErrorClassifier) -> String {
    if ctx.effective.is_empty() {
        return ctx.raw.to_string();
    }
    classifier.truncate(ctx.effective)
}

/// Rewrites raw provider errors into friendly, stable messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorClassifier {
    reset_command: String,
    max_error_chars: usize,
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self {
            reset_command: DEFAULT_RESET_COMMAND.to_string(),
            max_error_chars: DEFAULT_MAX_ERROR_CHARS,
        }
    }
}

impl ErrorClassifier {
    pub fn new(reset_command: impl Into<String>, max_error_chars: usize) -> Self {
        Self {
            reset_command: reset_command.into(),
            max_error_chars,
        }
    }

    pub fn from_config(config: &GuardConfig) -> Self {
        Self::new(config.reset_command.clone(), config.max_error_chars)
    }

    /// The command suggested for starting a fresh conversation.
    pub fn reset_command(&self) -> &str {
        &self.reset_command
    }

    /// Classify `raw` and render its friendly message.
    pub fn classify(&self, raw: &str) -> Classification {
        let raw = raw.trim();
        let payload = parse_api_error_payload(raw);
        let ctx = ErrorContext::new(raw, payload.as_ref());
        self.classify_context(&ctx)
    }

    pub(crate) fn classify_context(&self, ctx: &ErrorContext<'_>) -> Classification {
        let rule = RULES
            .iter()
            .find(|rule| (rule.matches)(ctx))
            .unwrap_or(&RULES[RULES.len() - 1]);
        debug!(category = %rule.category, "classified provider error");
        Classification {
            category: rule.category,
            message: (rule.render)(ctx, self),
        }
    }

    /// Classify `raw` and return only the friendly message.
    pub fn format_error_text(&self, raw: &str) -> String {
        self.classify(raw).message
    }

    /// Friendly text for a finished assistant turn.
    ///
    /// Turns that did not fail return their error text unchanged (usually
    /// `None`). Failed turns without any error text get a generic message.
    pub fn format_assistant_error(&self, turn: &AssistantTurn) -> Option<String> {
        if turn.stop_reason != StopReason::Error {
            return turn.error_message.clone();
        }
        let raw = turn.error_message.as_deref().unwrap_or_default().trim();
        if raw.is_empty() {
            return Some(UNKNOWN_FAILURE_TEXT.to_string());
        }
        Some(self.format_error_text(raw))
    }

    fn truncate(&self, text: &str) -> String {
        match text.char_indices().nth(self.max_error_chars) {
            Some((idx, _)) => format!("{}…", &text[..idx]),
            None => text.to_string(),
        }
    }
}

/// Whether `text` reports that the request exceeded the model's context.
pub fn is_context_overflow(text: &str) -> bool {
    let text = text.trim();
    let payload = parse_api_error_payload(text);
    is_context_overflow_error(&ErrorContext::new(text, payload.as_ref()))
}
