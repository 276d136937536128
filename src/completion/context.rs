//! Masked-context construction.
//!
//! The completion request carries the enclosing top-level form with the word
//! under the cursor replaced by a placeholder. This lets the runtime use
//! lexical context (local bindings, argument position) instead of plain
//! prefix matching. Context is only worth sending when the form is
//! well-formed, so the builder also owns the validity judgment.

use crate::buffer::{Buffer, Span};
use crate::completion::locator;

/// Placeholder substituted for the word under the cursor. The runtime's
/// completion engine recognises this literal as the completion point.
pub const PREFIX_SENTINEL: &str = "__prefix__";

/// The enclosing form with the target word masked out, plus the judgment
/// whether it is usable as request context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskedContext {
    /// The masked form text; only populated when `is_valid` is true.
    pub text: Option<String>,
    pub is_valid: bool,
}

impl MaskedContext {
    pub fn invalid() -> Self {
        Self {
            text: None,
            is_valid: false,
        }
    }
}

/// Splice [`PREFIX_SENTINEL`] over `word_span` inside `form_span`.
///
/// The result is invalid when the form is not a closed grouping, when the
/// masked text carries no information beyond the sentinel itself, or when
/// the word span leaks outside the form span (a degenerate location result,
/// not a caller bug; the line fallback can produce it). Downstream an
/// invalid result means "send the request without context", never a failed
/// completion.
pub fn build(buffer: &Buffer, form_span: Span, word_span: Span) -> MaskedContext {
    if !form_span.contains(word_span) {
        return MaskedContext::invalid();
    }

    let form_text = buffer.slice(form_span);
    let word_start = word_span.start - form_span.start;
    let word_end = word_span.end - form_span.start;

    let masked = format!(
        "{}{}{}",
        &form_text[..word_start],
        PREFIX_SENTINEL,
        &form_text[word_end..]
    );

    let is_valid = locator::within_valid_list(buffer, form_span) && masked != PREFIX_SENTINEL;
    MaskedContext {
        text: is_valid.then_some(masked),
        is_valid,
    }
}
