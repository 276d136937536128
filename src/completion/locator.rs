//! Word and top-level form location.
//!
//! This module answers two questions about a cursor position: what symbol is
//! under the cursor, and what is the outermost form enclosing it. Both are
//! computed with a single forward scan that understands string literals
//! (with backslash escapes), line comments, and character literals, so a
//! `)` inside `";)"` never closes a list.

use crate::buffer::{Buffer, Span};

/// Characters that may appear in a symbol besides alphanumerics.
const SYMBOL_PUNCTUATION: &str = "*+!-_'?<>=./$#:&";

pub fn is_symbol_char(c: char) -> bool {
    c.is_alphanumeric() || SYMBOL_PUNCTUATION.contains(c)
}

/// Find the maximal run of symbol characters containing or adjacent to
/// `offset`.
///
/// A cursor that touches no symbol characters (e.g. between two spaces)
/// yields an empty word anchored at the offset, since the runtime can
/// still complete from an empty prefix. `None` only means the offset is
/// unusable (past the end of the buffer or not on a char boundary), i.e.
/// no completion is possible at all.
pub fn locate_word(buffer: &Buffer, offset: usize) -> Option<(String, Span)> {
    let text = buffer.text();
    if offset > text.len() || !text.is_char_boundary(offset) {
        return None;
    }

    let mut start = offset;
    for (i, ch) in text[..offset].char_indices().rev() {
        if is_symbol_char(ch) {
            start = i;
        } else {
            break;
        }
    }

    let mut end = offset;
    for (i, ch) in text[offset..].char_indices() {
        if !is_symbol_char(ch) {
            break;
        }
        end = offset + i + ch.len_utf8();
    }

    let span = Span::new(start, end);
    Some((text[start..end].to_string(), span))
}

fn closer_for(opener: char) -> char {
    match opener {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

/// Walk the buffer and find the outermost form containing `offset`.
///
/// When the cursor sits inside a form left unclosed at end of input, the
/// span runs to the end of the buffer. When the cursor is at buffer top
/// level (inside no form at all), the span degrades to the current line;
/// [`within_valid_list`] rejects both cases so no malformed context is ever
/// sent to the runtime.
pub fn locate_enclosing_top_level_form(buffer: &Buffer, offset: usize) -> Span {
    let text = buffer.text();
    let offset = offset.min(text.len());

    let mut in_string = false;
    let mut in_comment = false;
    let mut escaped = false;
    let mut depth: usize = 0;
    let mut top_start: usize = 0;

    let mut iter = text.char_indices();
    while let Some((i, ch)) = iter.next() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        if in_comment {
            if ch == '\n' {
                in_comment = false;
            }
            continue;
        }
        match ch {
            ';' => in_comment = true,
            '"' => in_string = true,
            // character literal: the next char is data, not syntax
            '\\' => {
                iter.next();
            }
            '(' | '[' | '{' => {
                if depth == 0 {
                    top_start = i;
                }
                depth += 1;
            }
            ')' | ']' | '}' => {
                if depth > 0 {
                    depth -= 1;
                    if depth == 0 {
                        let span = Span::new(top_start, i + ch.len_utf8());
                        if span.contains_offset(offset) {
                            return span;
                        }
                    }
                }
                // a stray closer at top level is ignored; it belongs to
                // no form we could usefully send as context
            }
            _ => {}
        }
    }

    // Unclosed form at end of input; the cursor may still be inside it.
    if depth > 0 && top_start <= offset {
        return Span::new(top_start, text.len());
    }

    buffer.line_span(offset)
}

/// Whether `span` holds exactly one syntactically closed form.
///
/// This check gates what context is sent to the runtime: a dangling or
/// mismatched grouping would make the runtime mis-parse the request and
/// return garbage. The span must begin with an opening delimiter, every
/// delimiter inside must match, and the form must close exactly at the end
/// of the span (trailing whitespace allowed).
pub fn within_valid_list(buffer: &Buffer, span: Span) -> bool {
    if span.end > buffer.len() {
        return false;
    }
    let text = buffer.slice(span);

    let mut in_string = false;
    let mut in_comment = false;
    let mut escaped = false;
    let mut stack: Vec<char> = Vec::new();
    let mut closed_at: Option<usize> = None;
    let mut seen_opener = false;

    let mut iter = text.char_indices();
    while let Some((i, ch)) = iter.next() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        if in_comment {
            if ch == '\n' {
                in_comment = false;
            }
            continue;
        }
        match ch {
            ';' => in_comment = true,
            '"' => in_string = true,
            '\\' => {
                iter.next();
            }
            '(' | '[' | '{' => {
                // content before the first opener means this is not a form
                if !seen_opener && !text[..i].trim().is_empty() {
                    return false;
                }
                if seen_opener && stack.is_empty() {
                    // a second top-level form inside the span
                    return false;
                }
                seen_opener = true;
                stack.push(closer_for(ch));
            }
            ')' | ']' | '}' => match stack.pop() {
                Some(expected) if expected == ch => {
                    if stack.is_empty() {
                        closed_at = Some(i + ch.len_utf8());
                    }
                }
                _ => return false,
            },
            _ => {
                if !seen_opener && !ch.is_whitespace() {
                    return false;
                }
            }
        }
    }

    if in_string || !stack.is_empty() {
        return false;
    }
    match closed_at {
        Some(end) => text[end..].trim().is_empty(),
        None => false,
    }
}
