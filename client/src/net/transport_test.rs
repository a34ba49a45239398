use super::*;

#[test]
fn headers_lookup_is_case_insensitive() {
    let headers = Headers::new().with("Content-Type", "application/json");
    assert_eq!(headers.get("content-type"), Some("application/json"));
    assert!(headers.contains("CONTENT-TYPE"));
    assert!(!headers.contains("Authorization"));
}

#[test]
fn headers_set_replaces_existing_value_in_place() {
    let mut headers = Headers::new().with("X-CSRF-Token", "a").with("Accept", "*/*");
    headers.set("x-csrf-token", "b");
    let pairs: Vec<(&str, &str)> = headers.iter().collect();
    assert_eq!(pairs, vec![("X-CSRF-Token", "b"), ("Accept", "*/*")]);
    assert_eq!(headers.len(), 2);
}

#[test]
fn method_json_default_covers_post_put_delete_only() {
    assert!(Method::Post.defaults_to_json());
    assert!(Method::Put.defaults_to_json());
    assert!(Method::Delete.defaults_to_json());
    assert!(!Method::Get.defaults_to_json());
    assert!(!Method::Patch.defaults_to_json());
}

#[test]
fn response_ok_is_2xx() {
    assert!(HttpResponse::new(200, "").ok());
    assert!(HttpResponse::new(204, "").ok());
    assert!(!HttpResponse::new(302, "").ok());
    assert!(!HttpResponse::new(403, "").ok());
}

#[test]
fn response_json_decodes_body() {
    let resp = HttpResponse::new(200, r#"{"status":"ok"}"#);
    let value: serde_json::Value = resp.json().unwrap();
    assert_eq!(value["status"], "ok");
    assert!(HttpResponse::new(500, "<html>").json::<serde_json::Value>().is_err());
}

#[test]
fn join_url_handles_slashes_and_absolute_urls() {
    assert_eq!(join_url("http://h:5000/", "/chat"), "http://h:5000/chat");
    assert_eq!(join_url("http://h:5000", "chat"), "http://h:5000/chat");
    assert_eq!(join_url("", "/auth/status"), "/auth/status");
    assert_eq!(join_url("http://h", "https://other/x"), "https://other/x");
}

#[test]
fn failed_body_read_is_a_network_error() {
    let err = TransportError::body_read("/kb/rebuild", "stream closed");
    let TransportError::Network { url, message } = &err else {
        panic!("expected network error");
    };
    assert_eq!(url, "/kb/rebuild");
    assert_eq!(message, "reading response body: stream closed");
    assert_eq!(err.to_string(), "request to /kb/rebuild failed: reading response body: stream closed");
}
