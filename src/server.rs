/// LSP server trait implementation.
///
/// This module contains the `impl LanguageServer for Backend` block, which
/// handles all LSP protocol messages (initialize, didOpen, didChange,
/// didClose, completion, completionItem/resolve).
use tower_lsp::LanguageServer;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;

use crate::Backend;
use crate::buffer::Buffer;
use crate::completion::{context, locator, mapper};

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, _: InitializeParams) -> Result<InitializeResult> {
        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                completion_provider: Some(CompletionOptions {
                    resolve_provider: Some(true),
                    trigger_characters: Some(vec![
                        ".".to_string(),
                        "/".to_string(),
                        ":".to_string(),
                    ]),
                    all_commit_characters: None,
                    work_done_progress_options: WorkDoneProgressOptions {
                        work_done_progress: None,
                    },
                    ..CompletionOptions::default()
                }),
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                ..ServerCapabilities::default()
            },
            server_info: Some(ServerInfo {
                name: self.name.clone(),
                version: Some(self.version.clone()),
            }),
            offset_encoding: None,
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.log(MessageType::INFO, "repletion initialized!".to_string())
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        let uri = doc.uri.to_string();

        self.record_document(&uri, &doc.text, doc.version, Some(&doc.language_id));

        self.log(MessageType::INFO, format!("Opened file: {}", uri))
            .await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri.to_string();
        let version = params.text_document.version;

        if let Some(change) = params.content_changes.first() {
            self.record_document(&uri, &change.text, version, None);
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri.to_string();

        self.forget_document(&uri);

        self.log(MessageType::INFO, format!("Closed file: {}", uri))
            .await;
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = params.text_document_position.text_document.uri.to_string();
        let position = params.text_document_position.position;

        let Some(doc) = self.snapshot_document(&uri) else {
            return Ok(None);
        };

        // No live session for this file type means the completion feature
        // is unavailable, not an error.
        let Some(session) = self.sessions().get(&doc.language_id) else {
            return Ok(None);
        };

        let buffer = Buffer::new(doc.text.clone());
        let Some(offset) = buffer.offset_at(position) else {
            return Ok(None);
        };
        let Some((word, word_span)) = locator::locate_word(&buffer, offset) else {
            return Ok(None);
        };

        let form_span = locator::locate_enclosing_top_level_form(&buffer, offset);
        let masked = context::build(&buffer, form_span, word_span);

        let response = match session
            .complete(&doc.namespace, &word, masked.text.as_deref())
            .await
        {
            Ok(response) => response,
            Err(err) => {
                self.log(
                    MessageType::ERROR,
                    format!("completion request failed: {}", err),
                )
                .await;
                return Ok(None);
            }
        };

        // A newer edit may have landed while the request was in flight;
        // its completions describe a buffer that no longer exists.
        if self.document_version(&uri) != Some(doc.version) {
            return Ok(None);
        }

        if response.completions.is_empty() {
            return Ok(None);
        }

        let items = mapper::map_candidates(response.completions, &doc.namespace, &doc.language_id);
        Ok(Some(CompletionResponse::List(CompletionList {
            is_incomplete: true,
            items,
        })))
    }

    async fn completion_resolve(&self, item: CompletionItem) -> Result<CompletionItem> {
        let Some(target) = mapper::ResolveTarget::from_item(&item) else {
            return Ok(item);
        };

        // Without a session the item passes through unresolved.
        let Some(session) = self.sessions().get(&target.file_type) else {
            return Ok(item);
        };

        match mapper::resolve_detail(item.clone(), session.as_ref()).await {
            Ok(resolved) => Ok(resolved),
            Err(err) => {
                self.log(MessageType::ERROR, format!("info request failed: {}", err))
                    .await;
                Ok(item)
            }
        }
    }
}
