//! Request built from server parameters, response emitted to a writer

use es_http::core::{Request, Response};
use es_http::emitter::{Emitter, WriterEmitter};
use es_http::factory::{uri_from_server, ServerParams, UriOverrides};

fn server_params(params: &[(&str, &str)]) -> ServerParams {
    params
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Test request built from CGI-style parameters
#[test]
fn test_request_from_server_params() {
    let params = server_params(&[
        ("HTTPS", "on"),
        ("SERVER_NAME", "shop.example.com"),
        ("SERVER_PORT", "443"),
        ("REQUEST_URI", "/cart?item=42"),
    ]);
    let uri = uri_from_server(&params, &UriOverrides::default()).unwrap();
    let request = Request::new(uri).with_method("post").unwrap();

    assert_eq!(request.method().as_str(), "POST");
    assert_eq!(request.uri().to_string(), "https://shop.example.com/cart?item=42");
    assert_eq!(request.request_target(), "/cart?item=42");
    assert_eq!(request.header_line("Host"), "shop.example.com");
}

/// Test forced host behind a proxy
#[test]
fn test_request_with_overrides() {
    let params = server_params(&[
        ("SERVER_ADDR", "10.0.0.5"),
        ("SERVER_PORT", "8080"),
        ("REQUEST_URI", "/health"),
    ]);
    let overrides = UriOverrides {
        scheme: Some("https".to_string()),
        host: Some("public.example.com".to_string()),
        port: Some(443),
    };
    let request = Request::new(uri_from_server(&params, &overrides).unwrap());

    assert_eq!(request.uri().to_string(), "https://public.example.com/health");
    assert_eq!(request.header_line("host"), "public.example.com");
}

/// Test emitting a response built with the builder
#[test]
fn test_emit_response() {
    let response = Response::builder()
        .status(201)
        .header("content-type", "application/json")
        .header("x-request-id", "abc123")
        .body(r#"{"id":42}"#)
        .build()
        .unwrap();

    let mut emitter = WriterEmitter::new(Vec::new());
    emitter.emit(&response).unwrap();
    let output = String::from_utf8(emitter.into_inner()).unwrap();

    let (head, body) = output.split_once("\r\n\r\n").unwrap();
    let mut lines = head.lines();
    assert_eq!(lines.next(), Some("HTTP/1.1 201 Created"));
    let headers: Vec<&str> = lines.collect();
    assert!(headers.contains(&"Content-Type: application/json"));
    assert!(headers.contains(&"X-Request-Id: abc123"));
    assert_eq!(body, r#"{"id":42}"#);
}
