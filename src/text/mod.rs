//! User-facing text cleanup.

use std::sync::LazyLock;

use regex::Regex;

use crate::classify::{parse_api_error_payload, ErrorClassifier, ErrorContext};

static FINAL_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<\s*/?\s*final\s*>").expect("final tag regex must compile")
});

static PARAGRAPH_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n[ \t]*\n(?:[ \t]*\n)*").expect("paragraph break regex must compile")
});

/// Remove `<final>` / `</final>` markers, leaving everything else intact.
pub fn strip_final_tags(text: &str) -> String {
    FINAL_TAG_RE.replace_all(text, "").into_owned()
}

/// Drop paragraphs that exactly repeat the paragraph right before them.
///
/// The duplicate goes together with the blank-line separator preceding it.
/// Distinct paragraphs and their separators are left as they are.
pub fn collapse_duplicate_paragraphs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous: Option<&str> = None;
    let mut separator = "";
    let mut start = 0;

    let breaks = PARAGRAPH_BREAK_RE
        .find_iter(text)
        .map(|brk| (brk.start(), brk.end()))
        .chain(std::iter::once((text.len(), text.len())));
    for (end, next) in breaks {
        let paragraph = &text[start..end];
        let duplicate = previous == Some(paragraph) && !paragraph.trim().is_empty();
        if !duplicate {
            out.push_str(separator);
            out.push_str(paragraph);
        }
        previous = Some(paragraph);
        separator = &text[end..next];
        start = next;
    }
    out
}

/// Sanitize text before showing it to a user, using default settings.
pub fn sanitize_user_facing_text(text: &str) -> String {
    sanitize_with(&ErrorClassifier::default(), text)
}

/// Sanitize text with a specific classifier.
///
/// Recognized provider errors are replaced by their friendly message;
/// anything else only loses `<final>` markers and repeated paragraphs.
pub fn sanitize_with(classifier: &ErrorClassifier, text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let stripped = strip_final_tags(text);
    let trimmed = stripped.trim();
    if trimmed.is_empty() {
        return stripped;
    }

    let payload = parse_api_error_payload(trimmed);
    let ctx = ErrorContext::new(trimmed, payload.as_ref());
    if ctx.is_recognized_error() {
        return classifier.classify_context(&ctx).message;
    }
    collapse_duplicate_paragraphs(&stripped)
}
