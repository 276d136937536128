//! repletion: a language server that turns a connected REPL session into
//! an editor completion engine.
//!
//! The pipeline per request: locate the word and enclosing top-level form
//! at the cursor, build the masked context, send one `complete` round trip
//! to the runtime session for the document's file type, and map the raw
//! candidates into typed completion items. Documentation for a selected
//! item is resolved lazily through a second `info` round trip.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tower_lsp::Client;
use tower_lsp::lsp_types::MessageType;

pub mod buffer;
pub mod completion;
pub mod infoparser;
pub mod namespace;
pub mod server;
pub mod session;

use session::SessionRegistry;

/// Per-request snapshot of an open document. Captured once when a request
/// starts so the whole pipeline works on a consistent view even while the
/// user keeps typing.
#[derive(Debug, Clone)]
pub struct DocumentSnapshot {
    pub text: String,
    /// Editor-reported document version; used to discard stale responses.
    pub version: i32,
    /// LSP language id, the key into the session registry.
    pub language_id: String,
    /// The document's current namespace.
    pub namespace: String,
}

pub struct Backend {
    name: String,
    version: String,
    open_files: Arc<Mutex<HashMap<String, String>>>,
    doc_versions: Arc<Mutex<HashMap<String, i32>>>,
    language_ids: Arc<Mutex<HashMap<String, String>>>,
    namespaces: Arc<Mutex<HashMap<String, String>>>,
    sessions: Arc<SessionRegistry>,
    client: Option<Client>,
}

impl Backend {
    pub fn new(client: Client, sessions: Arc<SessionRegistry>) -> Self {
        Self {
            name: "repletion".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            open_files: Arc::new(Mutex::new(HashMap::new())),
            doc_versions: Arc::new(Mutex::new(HashMap::new())),
            language_ids: Arc::new(Mutex::new(HashMap::new())),
            namespaces: Arc::new(Mutex::new(HashMap::new())),
            sessions,
            client: Some(client),
        }
    }

    pub fn new_test() -> Self {
        Self::new_test_with_sessions(Arc::new(SessionRegistry::new()))
    }

    pub fn new_test_with_sessions(sessions: Arc<SessionRegistry>) -> Self {
        Self {
            name: "repletion".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            open_files: Arc::new(Mutex::new(HashMap::new())),
            doc_versions: Arc::new(Mutex::new(HashMap::new())),
            language_ids: Arc::new(Mutex::new(HashMap::new())),
            namespaces: Arc::new(Mutex::new(HashMap::new())),
            sessions,
            client: None,
        }
    }

    pub fn sessions(&self) -> &Arc<SessionRegistry> {
        &self.sessions
    }

    /// Take a consistent snapshot of an open document. `None` when the
    /// document is not open.
    pub fn snapshot_document(&self, uri: &str) -> Option<DocumentSnapshot> {
        let text = self.open_files.lock().ok()?.get(uri).cloned()?;
        let version = self
            .doc_versions
            .lock()
            .ok()?
            .get(uri)
            .copied()
            .unwrap_or(0);
        let language_id = self.language_ids.lock().ok()?.get(uri).cloned()?;
        let namespace = self
            .namespaces
            .lock()
            .ok()?
            .get(uri)
            .cloned()
            .unwrap_or_else(|| namespace::DEFAULT_NAMESPACE.to_string());
        Some(DocumentSnapshot {
            text,
            version,
            language_id,
            namespace,
        })
    }

    /// The latest editor-reported version for a document.
    pub fn document_version(&self, uri: &str) -> Option<i32> {
        if let Ok(versions) = self.doc_versions.lock() {
            versions.get(uri).copied()
        } else {
            None
        }
    }

    pub(crate) fn record_document(
        &self,
        uri: &str,
        text: &str,
        version: i32,
        language_id: Option<&str>,
    ) {
        if let Ok(mut files) = self.open_files.lock() {
            files.insert(uri.to_string(), text.to_string());
        }
        if let Ok(mut versions) = self.doc_versions.lock() {
            versions.insert(uri.to_string(), version);
        }
        if let Some(lang) = language_id
            && let Ok(mut langs) = self.language_ids.lock()
        {
            langs.insert(uri.to_string(), lang.to_string());
        }
        if let Ok(mut namespaces) = self.namespaces.lock() {
            namespaces.insert(uri.to_string(), namespace::namespace_or_default(text));
        }
    }

    pub(crate) fn forget_document(&self, uri: &str) {
        if let Ok(mut files) = self.open_files.lock() {
            files.remove(uri);
        }
        if let Ok(mut versions) = self.doc_versions.lock() {
            versions.remove(uri);
        }
        if let Ok(mut langs) = self.language_ids.lock() {
            langs.remove(uri);
        }
        if let Ok(mut namespaces) = self.namespaces.lock() {
            namespaces.remove(uri);
        }
    }

    pub(crate) async fn log(&self, typ: MessageType, message: String) {
        if let Some(client) = &self.client {
            client.log_message(typ, message).await;
        }
    }
}
