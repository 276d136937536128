//! Turn a raw `info` payload into user-facing documentation.

use crate::session::InfoResponse;

/// Extract the `(documentation, detail)` pair for a completion entry.
///
/// Detail is the one-line summary shown next to the entry: the qualified
/// symbol plus its argument lists, or `class/member` for interop members.
/// Documentation is the multi-paragraph hover text. Either may be empty
/// when the runtime knows nothing about the symbol.
pub fn completion_info(info: &InfoResponse) -> (String, String) {
    let detail = if let (Some(class), Some(member)) = (&info.class, &info.member) {
        format!("{}/{}", class, member)
    } else {
        let qualified = match (&info.ns, &info.name) {
            (Some(ns), Some(name)) => format!("{}/{}", ns, name),
            (None, Some(name)) => name.clone(),
            _ => String::new(),
        };
        match &info.arglists {
            Some(arglists) if !qualified.is_empty() => {
                format!("{} {}", qualified, arglists.trim())
            }
            Some(arglists) => arglists.trim().to_string(),
            None => qualified,
        }
    };

    let mut paragraphs: Vec<String> = Vec::new();
    if info.special_form.is_some() {
        paragraphs.push("special form".to_string());
    }
    if let Some(arglists) = &info.arglists {
        paragraphs.push(arglists.trim().to_string());
    }
    if let Some(doc) = &info.doc {
        paragraphs.push(doc.trim().to_string());
    }
    let documentation = paragraphs.join("\n\n");

    (documentation, detail)
}
