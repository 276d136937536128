//! Candidate mapping and lazy documentation resolution.
//!
//! This module converts the runtime's raw candidate records into LSP
//! `CompletionItem`s and, once the user highlights an entry, fills in its
//! documentation and detail from a second `info` round trip.

use serde::{Deserialize, Serialize};
use tower_lsp::lsp_types::*;

use crate::infoparser;
use crate::session::{CompletionCandidate, ReplSession, SessionError};

/// Map the runtime-reported kind string onto the editor's kind enumeration.
///
/// The table is closed and total: anything unrecognised (or absent) lands
/// on `TEXT`, so no candidate is ever left unmapped.
pub fn kind_for(runtime_kind: Option<&str>) -> CompletionItemKind {
    match runtime_kind {
        Some("nil") | Some("macro") => CompletionItemKind::VALUE,
        Some("class") => CompletionItemKind::CLASS,
        Some("keyword") | Some("special-form") => CompletionItemKind::KEYWORD,
        Some("namespace") => CompletionItemKind::MODULE,
        Some("function") => CompletionItemKind::FUNCTION,
        Some("var") => CompletionItemKind::VARIABLE,
        Some("method") => CompletionItemKind::METHOD,
        _ => CompletionItemKind::TEXT,
    }
}

/// What `completionItem/resolve` needs to issue the `info` call: the
/// namespace-qualified symbol plus the file type that keys the session
/// registry. Travels inside the item's `data` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveTarget {
    pub ns: String,
    pub label: String,
    pub file_type: String,
}

impl ResolveTarget {
    pub fn from_item(item: &CompletionItem) -> Option<Self> {
        item.data
            .clone()
            .and_then(|value| serde_json::from_value(value).ok())
    }
}

/// Convert raw candidates into completion items, preserving runtime order.
///
/// Candidates missing a namespace tag are annotated with `fallback_ns` (the
/// document's current namespace) so the later `info` lookup is always
/// namespace-scoped. A candidate string starting with `.` names an interop
/// member; the leading sigil stays in the label but is dropped from the
/// inserted text.
pub fn map_candidates(
    candidates: Vec<CompletionCandidate>,
    fallback_ns: &str,
    file_type: &str,
) -> Vec<CompletionItem> {
    candidates
        .into_iter()
        .map(|candidate| {
            let ns = candidate
                .ns
                .unwrap_or_else(|| fallback_ns.to_string());
            let insert_text = candidate
                .candidate
                .strip_prefix('.')
                .unwrap_or(&candidate.candidate)
                .to_string();
            let target = ResolveTarget {
                ns,
                label: candidate.candidate.clone(),
                file_type: file_type.to_string(),
            };

            CompletionItem {
                label: candidate.candidate,
                kind: Some(kind_for(candidate.kind.as_deref())),
                insert_text: Some(insert_text),
                data: serde_json::to_value(&target).ok(),
                ..CompletionItem::default()
            }
        })
        .collect()
}

/// Fill in `documentation` and `detail` for one selected item via `info`.
///
/// Items without a [`ResolveTarget`] pass through unchanged. The operation
/// is idempotent: identical inputs produce identical output, since the
/// fields are overwritten from the parsed response rather than appended.
pub async fn resolve_detail(
    mut item: CompletionItem,
    session: &dyn ReplSession,
) -> Result<CompletionItem, SessionError> {
    let Some(target) = ResolveTarget::from_item(&item) else {
        return Ok(item);
    };

    let response = session.info(&target.ns, &target.label).await?;
    let (documentation, detail) = infoparser::completion_info(&response);

    if !documentation.is_empty() {
        item.documentation = Some(Documentation::String(documentation));
    }
    if !detail.is_empty() {
        item.detail = Some(detail);
    }
    Ok(item)
}
