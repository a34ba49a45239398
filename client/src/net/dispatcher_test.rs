use futures::executor::block_on;

use super::*;
use crate::net::body::FormData;
use crate::net::testing::{MockTransport, RecordingAlert, session};

fn dispatcher<'a>(
    transport: &'a MockTransport,
    alert: &'a RecordingAlert,
) -> Dispatcher<&'a MockTransport, &'a RecordingAlert> {
    Dispatcher::new(transport, alert, ClientConfig::same_origin())
}

fn json_post(value: serde_json::Value) -> RequestOptions {
    RequestOptions::post(Some(RequestBody::Json(value)))
}

#[test]
fn safe_call_never_refreshes_first() {
    let transport = MockTransport::with_status(session("T1"));
    let alert = RecordingAlert::default();
    let d = dispatcher(&transport, &alert);

    let resp = block_on(d.fetch("/kb/stats", RequestOptions::get(), false)).unwrap();
    assert!(resp.ok());
    assert_eq!(transport.status_calls(), 0);
    assert_eq!(transport.urls(), vec!["/kb/stats".to_owned()]);
}

#[test]
fn mutating_call_refreshes_exactly_once_before_dispatch() {
    let transport = MockTransport::with_status(session("T1"));
    let alert = RecordingAlert::default();
    let d = dispatcher(&transport, &alert);

    block_on(d.fetch("/memory/delete", json_post(serde_json::json!({ "ids": [] })), true)).unwrap();
    assert_eq!(transport.status_calls(), 1);
    assert_eq!(
        transport.urls(),
        vec!["/auth/status".to_owned(), "/memory/delete".to_owned()]
    );
}

#[test]
fn mutating_call_uses_the_freshly_rotated_token() {
    let transport = MockTransport::with_status(session("rotated"));
    let alert = RecordingAlert::default();
    let d = dispatcher(&transport, &alert);
    d.auth().replace(session("stale"));

    block_on(d.fetch("/kb/rebuild", RequestOptions::post(None), true)).unwrap();
    let sent = transport.last_request().unwrap();
    assert_eq!(sent.headers.get(X_CSRF_TOKEN), Some("rotated"));
}

#[test]
fn signed_out_call_gets_default_bearer_key() {
    let transport = MockTransport::new();
    let alert = RecordingAlert::default();
    let d = dispatcher(&transport, &alert);

    block_on(d.get("/memory/list")).unwrap();
    let sent = transport.last_request().unwrap();
    assert_eq!(sent.headers.get("authorization"), Some("Bearer secret12345"));
    assert_eq!(sent.headers.get(X_CSRF_TOKEN), None);
}

#[test]
fn configured_key_replaces_default() {
    let transport = MockTransport::new();
    let alert = RecordingAlert::default();
    let config = ClientConfig::new("http://h:5000").with_api_key(Some("k-prod".to_owned()));
    let d = Dispatcher::new(&transport, &alert, config);

    block_on(d.get("/model")).unwrap();
    let sent = transport.last_request().unwrap();
    assert_eq!(sent.url, "http://h:5000/model");
    assert_eq!(sent.headers.get(AUTHORIZATION), Some("Bearer k-prod"));
}

#[test]
fn caller_supplied_credentials_are_not_overwritten() {
    let transport = MockTransport::new();
    let alert = RecordingAlert::default();
    let d = dispatcher(&transport, &alert);

    block_on(d.fetch("/model", RequestOptions::get().header("authorization", "Bearer mine"), false)).unwrap();
    let sent = transport.last_request().unwrap();
    assert_eq!(sent.headers.get(AUTHORIZATION), Some("Bearer mine"));
    assert_eq!(sent.headers.len(), 1);

    block_on(d.fetch("/model", RequestOptions::get().header("X-API-Key", "other"), false)).unwrap();
    let sent = transport.last_request().unwrap();
    assert_eq!(sent.headers.get(AUTHORIZATION), None);
    assert_eq!(sent.headers.get(X_API_KEY), Some("other"));
}

#[test]
fn session_mutation_carries_token_in_header_and_json_body() {
    let transport = MockTransport::with_status(session("T123"));
    let alert = RecordingAlert::default();
    let d = dispatcher(&transport, &alert);

    block_on(d.fetch("/kb/delete", json_post(serde_json::json!({ "a": 1 })), true)).unwrap();
    let sent = transport.last_request().unwrap();
    assert_eq!(sent.headers.get(X_CSRF_TOKEN), Some("T123"));
    assert_eq!(sent.headers.get(AUTHORIZATION), None);
    assert_eq!(
        sent.body,
        Some(RequestBody::Json(serde_json::json!({ "a": 1, "csrf_token": "T123" })))
    );
}

#[test]
fn session_read_carries_no_token() {
    let transport = MockTransport::new();
    let alert = RecordingAlert::default();
    let d = dispatcher(&transport, &alert);
    d.auth().replace(session("T123"));

    block_on(d.get("/kb/documents")).unwrap();
    let sent = transport.last_request().unwrap();
    assert!(sent.headers.is_empty());
}

#[test]
fn raw_body_is_sent_verbatim_with_header_token_only() {
    let transport = MockTransport::with_status(session("T9"));
    let alert = RecordingAlert::default();
    let d = dispatcher(&transport, &alert);
    let raw = r#"{"endpoint":"http://10.0.0.2:1234"}"#;

    block_on(d.fetch(
        "/admin/llm-endpoint",
        RequestOptions::post(Some(RequestBody::Raw(raw.to_owned()))),
        true,
    ))
    .unwrap();
    let sent = transport.last_request().unwrap();
    assert_eq!(sent.body, Some(RequestBody::Raw(raw.to_owned())));
    assert_eq!(sent.headers.get(X_CSRF_TOKEN), Some("T9"));
    assert_eq!(sent.headers.get(CONTENT_TYPE), Some(JSON_CONTENT_TYPE));
}

#[test]
fn form_body_gets_header_token_and_no_json_content_type() {
    let transport = MockTransport::with_status(session("T5"));
    let alert = RecordingAlert::default();
    let d = dispatcher(&transport, &alert);
    let form = FormData::new().text("prompt", "describe this");

    block_on(d.fetch("/chat", RequestOptions::post(Some(RequestBody::Form(form.clone()))), true)).unwrap();
    let sent = transport.last_request().unwrap();
    assert_eq!(sent.body, Some(RequestBody::Form(form)));
    assert_eq!(sent.headers.get(X_CSRF_TOKEN), Some("T5"));
    assert_eq!(sent.headers.get(CONTENT_TYPE), None);
}

#[test]
fn content_type_defaults_only_for_post_put_delete() {
    let state = AuthState::default();
    let config = ClientConfig::same_origin();
    for (method, expected) in [
        (Method::Post, Some(JSON_CONTENT_TYPE)),
        (Method::Put, Some(JSON_CONTENT_TYPE)),
        (Method::Delete, Some(JSON_CONTENT_TYPE)),
        (Method::Patch, None),
        (Method::Get, None),
    ] {
        let headers = prepare_headers(method, Headers::new(), None, &state, &config, false);
        assert_eq!(headers.get(CONTENT_TYPE), expected, "{method}");
    }

    let headers = prepare_headers(
        Method::Post,
        Headers::new().with("content-type", "text/plain"),
        None,
        &state,
        &config,
        false,
    );
    assert_eq!(headers.get(CONTENT_TYPE), Some("text/plain"));
}

#[test]
fn csrf_invalid_refreshes_once_and_alerts_once() {
    let transport = MockTransport::new();
    transport.push_response(HttpResponse::new(403, r#"{"error":"csrf_invalid"}"#));
    let alert = RecordingAlert::default();
    let d = dispatcher(&transport, &alert);
    d.auth().replace(session("T1"));

    let resp = block_on(d.fetch("/kb/delete", RequestOptions::get(), false)).unwrap();
    assert_eq!(resp.status, 403);
    assert_eq!(transport.status_calls(), 1);
    assert_eq!(alert.count(), 1);
    assert_eq!(alert.messages(), vec![CSRF_INVALID_NOTICE.to_owned()]);
}

#[test]
fn csrf_missing_refreshes_once_without_alert() {
    let transport = MockTransport::new();
    transport.push_response(HttpResponse::new(400, r#"{"error":"csrf_missing"}"#));
    let alert = RecordingAlert::default();
    let d = dispatcher(&transport, &alert);

    let resp = block_on(d.fetch("/memory/delete", RequestOptions::get(), false)).unwrap();
    assert_eq!(resp.status, 400);
    assert_eq!(transport.status_calls(), 1);
    assert_eq!(alert.count(), 0);
}

#[test]
fn csrf_failure_on_mutation_adds_one_refresh_to_the_initial_one() {
    let transport = MockTransport::with_status(session("T1"));
    transport.push_response(HttpResponse::new(403, r#"{"error":"csrf_invalid"}"#));
    let alert = RecordingAlert::default();
    let d = dispatcher(&transport, &alert);

    block_on(d.post("/kb/rebuild", None)).unwrap();
    assert_eq!(transport.status_calls(), 2);
    assert_eq!(alert.count(), 1);
    assert_eq!(
        transport.urls(),
        vec!["/auth/status".to_owned(), "/kb/rebuild".to_owned(), "/auth/status".to_owned()]
    );
}

#[test]
fn failed_request_is_not_retried() {
    let transport = MockTransport::with_status(session("T1"));
    transport.push_response(HttpResponse::new(400, r#"{"error":"csrf_missing"}"#));
    let alert = RecordingAlert::default();
    let d = dispatcher(&transport, &alert);

    block_on(d.post("/kb/rebuild", None)).unwrap();
    let dispatched = transport.urls().iter().filter(|u| *u == "/kb/rebuild").count();
    assert_eq!(dispatched, 1);
}

#[test]
fn other_failures_are_returned_untouched() {
    let transport = MockTransport::new();
    transport.push_response(HttpResponse::new(429, r#"{"error":"rate_limited"}"#));
    transport.push_response(HttpResponse::new(502, "Bad Gateway"));
    let alert = RecordingAlert::default();
    let d = dispatcher(&transport, &alert);

    let first = block_on(d.get("/chat")).unwrap();
    assert_eq!(first.status, 429);
    let second = block_on(d.get("/chat")).unwrap();
    assert_eq!(second.text(), "Bad Gateway");
    assert_eq!(transport.status_calls(), 0);
    assert_eq!(alert.count(), 0);
}

#[test]
fn transport_failure_propagates() {
    let transport = MockTransport::new();
    transport.push_error(TransportError::Network {
        url: "/chat".to_owned(),
        message: "connection refused".to_owned(),
    });
    let alert = RecordingAlert::default();
    let d = dispatcher(&transport, &alert);

    let err = block_on(d.get("/chat")).unwrap_err();
    assert!(matches!(err, TransportError::Network { .. }));
    assert_eq!(alert.count(), 0);
}

#[test]
fn logout_elsewhere_switches_back_to_bearer_mode() {
    let transport = MockTransport::with_status(AuthState::default());
    let alert = RecordingAlert::default();
    let d = dispatcher(&transport, &alert);
    d.auth().replace(session("T1"));

    block_on(d.post("/memory/delete", Some(RequestBody::Json(serde_json::json!({ "ids": ["m1"] }))))).unwrap();
    let sent = transport.last_request().unwrap();
    assert_eq!(sent.headers.get(AUTHORIZATION), Some("Bearer secret12345"));
    assert_eq!(sent.headers.get(X_CSRF_TOKEN), None);
    assert_eq!(sent.body, Some(RequestBody::Json(serde_json::json!({ "ids": ["m1"] }))));
}

#[test]
fn mutating_refresh_reaches_the_cache_listener() {
    let signed_in = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&signed_in);
    let cache = AuthCache::with_listener(move |state| flag.store(state.authenticated, Ordering::SeqCst));
    cache.replace(session("T1"));
    let transport = MockTransport::with_status(AuthState::default());
    let alert = RecordingAlert::default();
    let d = Dispatcher::with_cache(&transport, &alert, ClientConfig::same_origin(), cache);

    block_on(d.fetch("/kb/delete", json_post(serde_json::json!({ "doc_ids": ["d1"] })), true)).unwrap();
    assert!(!signed_in.load(Ordering::SeqCst));
}
