//! REPL session protocol surface.
//!
//! The runtime connection itself (transport, handshake, multiplexing) lives
//! outside this crate. What lives here is the request/response shape the
//! completion pipeline depends on (the `complete` and `info` operations),
//! plus the registry that hands out live sessions by file type. Sessions are
//! registered and unregistered explicitly by whoever owns the connection;
//! nothing in this crate reaches for ambient global state.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure of a runtime round trip. Propagated to the caller as a failed
/// future; retry and backoff belong to the transport, not here.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("malformed response from the runtime: {0}")]
    Protocol(String),
    #[error("runtime transport failure: {0}")]
    Transport(String),
}

/// One raw suggestion from the runtime's `complete` operation.
///
/// `ns` is genuinely optional on the wire: the runtime omits it for
/// candidates that belong to the querying namespace itself. It is
/// normalised here at the protocol boundary rather than duck-typed deep in
/// the mapping logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionCandidate {
    pub candidate: String,
    /// The runtime-reported kind string, e.g. `"function"`, `"macro"`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ns: Option<String>,
}

/// Response to `complete`. Candidate order is runtime-determined and
/// preserved end to end; this crate never re-sorts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompleteResponse {
    #[serde(default)]
    pub completions: Vec<CompletionCandidate>,
}

/// Raw documentation payload for one symbol, from the `info` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InfoResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ns: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    #[serde(
        rename = "arglists-str",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub arglists: Option<String>,
    #[serde(
        rename = "special-form",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub special_form: Option<String>,
    /// Owning class for interop members.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    /// Member name for interop members.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member: Option<String>,
}

/// A live connection to an interactive code-evaluation runtime.
///
/// Both operations are single round trips scoped by namespace. A superseded
/// request is never cancelled server-side; the caller discards stale
/// results by request identity instead.
#[tower_lsp::async_trait]
pub trait ReplSession: Send + Sync {
    async fn complete(
        &self,
        ns: &str,
        prefix: &str,
        context: Option<&str>,
    ) -> Result<CompleteResponse, SessionError>;

    async fn info(&self, ns: &str, symbol: &str) -> Result<InfoResponse, SessionError>;
}

/// Live sessions keyed by file type (the LSP language id).
///
/// One logical connection exists per file type. The registry is handed into
/// the backend at construction; `get` returning `None` means the completion
/// feature is unavailable for that file type, which every caller maps to an
/// empty result rather than an error.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, Arc<dyn ReplSession>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, file_type: impl Into<String>, session: Arc<dyn ReplSession>) {
        let file_type = file_type.into();
        tracing::debug!(%file_type, "registering repl session");
        self.sessions.write().insert(file_type, session);
    }

    /// Returns whether a session was actually removed.
    pub fn unregister(&self, file_type: &str) -> bool {
        tracing::debug!(%file_type, "unregistering repl session");
        self.sessions.write().remove(file_type).is_some()
    }

    pub fn get(&self, file_type: &str) -> Option<Arc<dyn ReplSession>> {
        self.sessions.read().get(file_type).cloned()
    }
}
