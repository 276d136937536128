//! Per-document namespace resolution.
//!
//! Both runtime operations are namespace-scoped, so every document needs a
//! current namespace. It is read from the first top-level `(ns my.name ...)`
//! or `(in-ns 'my.name)` form in the buffer and falls back to the runtime's
//! default namespace when the document declares none.

/// Namespace used when a document declares none.
pub const DEFAULT_NAMESPACE: &str = "user";

fn is_symbol_char(c: char) -> bool {
    crate::completion::locator::is_symbol_char(c)
}

/// Skip whitespace, commas, and line comments starting at `pos`.
fn skip_trivia(text: &str, mut pos: usize) -> usize {
    while pos < text.len() {
        let rest = &text[pos..];
        let ch = rest.chars().next().unwrap();
        if ch.is_whitespace() || ch == ',' {
            pos += ch.len_utf8();
        } else if ch == ';' {
            match rest.find('\n') {
                Some(idx) => pos += idx + 1,
                None => return text.len(),
            }
        } else {
            break;
        }
    }
    pos
}

/// Read one symbol token starting at `pos`; returns (token, next position).
fn read_symbol(text: &str, pos: usize) -> (String, usize) {
    let mut end = pos;
    for (i, ch) in text[pos..].char_indices() {
        if !is_symbol_char(ch) {
            break;
        }
        end = pos + i + ch.len_utf8();
    }
    (text[pos..end].to_string(), end)
}

/// Skip a metadata marker (`^:keyword`, `^Tag`, or `^{...}`) if present.
fn skip_metadata(text: &str, pos: usize) -> usize {
    if !text[pos..].starts_with('^') {
        return pos;
    }
    let pos = pos + 1;
    if text[pos..].starts_with('{') {
        let mut depth = 0usize;
        for (i, ch) in text[pos..].char_indices() {
            match ch {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return pos + i + 1;
                    }
                }
                _ => {}
            }
        }
        return text.len();
    }
    read_symbol(text, pos).1
}

/// Try to read a namespace name out of the list starting right after the
/// opening paren at `pos`.
fn namespace_from_list(text: &str, pos: usize) -> Option<String> {
    let pos = skip_trivia(text, pos);
    let (head, pos) = read_symbol(text, pos);
    if head != "ns" && head != "in-ns" {
        return None;
    }

    let mut pos = skip_trivia(text, pos);
    loop {
        let next = skip_metadata(text, pos);
        if next == pos {
            break;
        }
        pos = skip_trivia(text, next);
    }
    // `in-ns` quotes its argument
    if text[pos..].starts_with('\'') {
        pos += 1;
    }

    let (name, _) = read_symbol(text, pos);
    if name.is_empty() { None } else { Some(name) }
}

/// Scan top-level forms for a namespace declaration.
pub fn namespace_of(text: &str) -> Option<String> {
    let mut in_string = false;
    let mut in_comment = false;
    let mut escaped = false;
    let mut depth: usize = 0;

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
            '(' => {
                if depth == 0
                    && let Some(name) = namespace_from_list(text, i + 1)
                {
                    return Some(name);
                }
                depth += 1;
            }
            '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    None
}

/// The document's namespace, or [`DEFAULT_NAMESPACE`] when it declares none.
pub fn namespace_or_default(text: &str) -> String {
    namespace_of(text).unwrap_or_else(|| DEFAULT_NAMESPACE.to_string())
}
