mod common;

use std::sync::Arc;

use common::{
    ScriptedSession, candidate, change_document, connected_backend, create_test_backend,
    open_document, request_completion,
};
use tokio::sync::Semaphore;
use tower_lsp::LanguageServer;
use tower_lsp::lsp_types::*;

#[tokio::test]
async fn test_initialize_server_info() {
    let backend = create_test_backend();
    let result = backend
        .initialize(InitializeParams::default())
        .await
        .unwrap();

    let server_info = result.server_info.expect("server_info should be present");
    assert_eq!(server_info.name, "repletion");
    assert_eq!(server_info.version, Some("0.3.0".to_string()));
}

#[tokio::test]
async fn test_initialize_capabilities() {
    let backend = create_test_backend();
    let result = backend
        .initialize(InitializeParams::default())
        .await
        .unwrap();

    let completion = result
        .capabilities
        .completion_provider
        .expect("completion provider should be enabled");
    assert_eq!(
        completion.resolve_provider,
        Some(true),
        "documentation is resolved lazily"
    );
    let triggers = completion.trigger_characters.unwrap();
    assert!(triggers.contains(&".".to_string()));
}

#[tokio::test]
async fn test_did_change_updates_namespace() {
    let session = Arc::new(
        ScriptedSession::new().with_candidates(vec![candidate("f", Some("function"), None)]),
    );
    let backend = connected_backend(session.clone());

    let uri = "file:///ns.clj";
    open_document(&backend, uri, "(ns one.core)\n(f)").await;
    request_completion(&backend, uri, 1, 2).await;
    assert_eq!(session.last_complete_call().unwrap().0, "one.core");

    change_document(&backend, uri, 2, "(ns two.core)\n(f)").await;
    request_completion(&backend, uri, 1, 2).await;
    assert_eq!(session.last_complete_call().unwrap().0, "two.core");
}

#[tokio::test]
async fn test_stale_response_is_discarded() {
    let entered = Arc::new(Semaphore::new(0));
    let release = Arc::new(Semaphore::new(0));
    let session = Arc::new(
        ScriptedSession::new()
            .with_candidates(vec![candidate("map", Some("function"), None)])
            .gated(entered.clone(), release.clone()),
    );
    let backend = Arc::new(connected_backend(session));

    let uri = "file:///race.clj";
    open_document(&backend, uri, "(ns app.core)\n(def x (ma))").await;

    let task_backend = backend.clone();
    let task =
        tokio::spawn(async move { request_completion(&task_backend, uri, 1, 10).await });

    // wait until the request has been captured, then edit the document
    // before letting the response through
    entered.acquire().await.unwrap().forget();
    change_document(&backend, uri, 2, "(ns app.core)\n(def y (ma))").await;
    release.add_permits(1);

    let result = task.await.unwrap();
    assert!(
        result.is_none(),
        "a response for a superseded document version must be discarded"
    );
}

#[tokio::test]
async fn test_fresh_response_is_kept_after_unrelated_edit_settles() {
    let session = Arc::new(
        ScriptedSession::new().with_candidates(vec![candidate("map", Some("function"), None)]),
    );
    let backend = connected_backend(session);

    let uri = "file:///calm.clj";
    open_document(&backend, uri, "(ns app.core)\n(ma)").await;
    change_document(&backend, uri, 2, "(ns app.core)\n(map)").await;

    // the request starts after the edit, so the versions agree
    let result = request_completion(&backend, uri, 1, 3).await;
    assert!(result.is_some());
}

#[tokio::test]
async fn test_did_close_forgets_document() {
    let session = Arc::new(
        ScriptedSession::new().with_candidates(vec![candidate("map", Some("function"), None)]),
    );
    let backend = connected_backend(session.clone());

    let uri = "file:///gone.clj";
    open_document(&backend, uri, "(ns app.core)\n(ma)").await;
    request_completion(&backend, uri, 1, 3).await;
    assert_eq!(session.complete_calls.lock().unwrap().len(), 1);

    backend
        .did_close(DidCloseTextDocumentParams {
            text_document: TextDocumentIdentifier {
                uri: Url::parse(uri).unwrap(),
            },
        })
        .await;

    let result = request_completion(&backend, uri, 1, 3).await;
    assert!(result.is_none());
    assert_eq!(
        session.complete_calls.lock().unwrap().len(),
        1,
        "a closed document must not reach the session"
    );
}

#[tokio::test]
async fn test_session_unregister_disables_completion() {
    let session = Arc::new(
        ScriptedSession::new().with_candidates(vec![candidate("map", Some("function"), None)]),
    );
    let backend = connected_backend(session);

    let uri = "file:///life.clj";
    open_document(&backend, uri, "(ns app.core)\n(ma)").await;
    assert!(request_completion(&backend, uri, 1, 3).await.is_some());

    assert!(backend.sessions().unregister("clojure"));
    assert!(request_completion(&backend, uri, 1, 3).await.is_none());
    assert!(!backend.sessions().unregister("clojure"));
}
