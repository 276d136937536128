#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::Semaphore;
use tower_lsp::LanguageServer;
use tower_lsp::lsp_types::*;

use repletion::Backend;
use repletion::session::{
    CompleteResponse, CompletionCandidate, InfoResponse, ReplSession, SessionError,
    SessionRegistry,
};

pub fn create_test_backend() -> Backend {
    Backend::new_test()
}

pub fn candidate(name: &str, kind: Option<&str>, ns: Option<&str>) -> CompletionCandidate {
    CompletionCandidate {
        candidate: name.to_string(),
        kind: kind.map(str::to_string),
        ns: ns.map(str::to_string),
    }
}

/// A scripted stand-in for a live REPL connection: records every request it
/// receives and replays canned responses.
pub struct ScriptedSession {
    candidates: Vec<CompletionCandidate>,
    infos: HashMap<String, InfoResponse>,
    fail_transport: bool,
    /// (entered, release): `complete` adds a permit to `entered` when the
    /// request has been captured, then blocks until `release` has one.
    gate: Option<(Arc<Semaphore>, Arc<Semaphore>)>,
    pub complete_calls: Mutex<Vec<(String, String, Option<String>)>>,
    pub info_calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedSession {
    pub fn new() -> Self {
        Self {
            candidates: Vec::new(),
            infos: HashMap::new(),
            fail_transport: false,
            gate: None,
            complete_calls: Mutex::new(Vec::new()),
            info_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_candidates(mut self, candidates: Vec<CompletionCandidate>) -> Self {
        self.candidates = candidates;
        self
    }

    pub fn with_info(mut self, ns: &str, symbol: &str, info: InfoResponse) -> Self {
        self.infos.insert(format!("{}/{}", ns, symbol), info);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail_transport = true;
        self
    }

    pub fn gated(mut self, entered: Arc<Semaphore>, release: Arc<Semaphore>) -> Self {
        self.gate = Some((entered, release));
        self
    }

    pub fn last_complete_call(&self) -> Option<(String, String, Option<String>)> {
        self.complete_calls.lock().unwrap().last().cloned()
    }
}

#[tower_lsp::async_trait]
impl ReplSession for ScriptedSession {
    async fn complete(
        &self,
        ns: &str,
        prefix: &str,
        context: Option<&str>,
    ) -> Result<CompleteResponse, SessionError> {
        self.complete_calls.lock().unwrap().push((
            ns.to_string(),
            prefix.to_string(),
            context.map(str::to_string),
        ));
        if let Some((entered, release)) = &self.gate {
            entered.add_permits(1);
            let _permit = release.acquire().await.expect("release gate closed");
        }
        if self.fail_transport {
            return Err(SessionError::Transport("connection reset".to_string()));
        }
        Ok(CompleteResponse {
            completions: self.candidates.clone(),
        })
    }

    async fn info(&self, ns: &str, symbol: &str) -> Result<InfoResponse, SessionError> {
        self.info_calls
            .lock()
            .unwrap()
            .push((ns.to_string(), symbol.to_string()));
        if self.fail_transport {
            return Err(SessionError::Transport("connection reset".to_string()));
        }
        Ok(self
            .infos
            .get(&format!("{}/{}", ns, symbol))
            .cloned()
            .unwrap_or_default())
    }
}

/// Backend with `session` registered for the `clojure` file type.
pub fn connected_backend(session: Arc<ScriptedSession>) -> Backend {
    let registry = Arc::new(SessionRegistry::new());
    registry.register("clojure", session);
    Backend::new_test_with_sessions(registry)
}

pub async fn open_document(backend: &Backend, uri: &str, text: &str) {
    open_document_as(backend, uri, "clojure", text).await;
}

pub async fn open_document_as(backend: &Backend, uri: &str, language_id: &str, text: &str) {
    backend
        .did_open(DidOpenTextDocumentParams {
            text_document: TextDocumentItem {
                uri: Url::parse(uri).unwrap(),
                language_id: language_id.to_string(),
                version: 1,
                text: text.to_string(),
            },
        })
        .await;
}

pub async fn change_document(backend: &Backend, uri: &str, version: i32, text: &str) {
    backend
        .did_change(DidChangeTextDocumentParams {
            text_document: VersionedTextDocumentIdentifier {
                uri: Url::parse(uri).unwrap(),
                version,
            },
            content_changes: vec![TextDocumentContentChangeEvent {
                range: None,
                range_length: None,
                text: text.to_string(),
            }],
        })
        .await;
}

pub async fn request_completion(
    backend: &Backend,
    uri: &str,
    line: u32,
    character: u32,
) -> Option<CompletionResponse> {
    backend
        .completion(CompletionParams {
            text_document_position: TextDocumentPositionParams {
                text_document: TextDocumentIdentifier {
                    uri: Url::parse(uri).unwrap(),
                },
                position: Position { line, character },
            },
            work_done_progress_params: WorkDoneProgressParams::default(),
            partial_result_params: PartialResultParams::default(),
            context: None,
        })
        .await
        .unwrap()
}

pub fn items_of(response: CompletionResponse) -> Vec<CompletionItem> {
    match response {
        CompletionResponse::Array(items) => items,
        CompletionResponse::List(list) => list.items,
    }
}
