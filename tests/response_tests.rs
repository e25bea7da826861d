use plainhttp::prelude::*;

fn html_response() -> Response {
    Response::parse(
        vec![
            "HTTP/1.1 200 OK".to_string(),
            "Content-Type: text/html".to_string(),
        ],
        Box::new(MemoryStream::new("<html><title>Hi</title></html>")),
    )
    .expect("well-formed response")
}

#[test]
fn test_status_line_parsing() {
    let response = html_response();

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.reason_phrase(), "OK");
    assert_eq!(response.protocol(), "HTTP");
    assert_eq!(response.protocol_version(), "1.1");
}

#[test]
fn test_multi_word_reason_phrase() {
    let response = Response::parse(
        vec!["HTTP/1.1 503 Service Unavailable".to_string()],
        Box::new(MemoryStream::empty()),
    )
    .expect("well-formed response");

    assert_eq!(response.status_code(), 503);
    assert_eq!(response.reason_phrase(), "Service Unavailable");
}

#[test]
fn test_malformed_status_line_is_rejected() {
    let result = Response::parse(
        vec!["garbage".to_string()],
        Box::new(MemoryStream::empty()),
    );

    assert!(matches!(result, Err(Error::MalformedResponse(_))));
}

#[test]
fn test_empty_header_list_is_rejected() {
    let result = Response::parse(Vec::new(), Box::new(MemoryStream::empty()));

    assert!(matches!(result, Err(Error::MalformedResponse(_))));
}

#[test]
fn test_header_index_is_case_insensitive() {
    let response = html_response();

    assert_eq!(response.header("content-type"), "text/html");
    assert_eq!(response.header("CONTENT-TYPE"), "text/html");
    assert_eq!(response.header("x-missing"), "");
    assert!(response.has_header("Content-type"));
}

#[test]
fn test_header_index_is_last_write_wins() {
    let response = Response::parse(
        vec![
            "HTTP/1.1 200 OK".to_string(),
            "X-Val: first".to_string(),
            "X-Val: second".to_string(),
        ],
        Box::new(MemoryStream::empty()),
    )
    .expect("well-formed response");

    assert_eq!(response.header("x-val"), "second");
    assert_eq!(
        response.header_all("x-val"),
        vec!["first".to_string(), "second".to_string()]
    );
    assert_eq!(response.header_line("x-val"), "first, second");
}

#[test]
fn test_page_title_extraction() {
    assert_eq!(html_response().page_title(), "Hi");
}

#[test]
fn test_page_title_decodes_entities() {
    let response = Response::parse(
        vec!["HTTP/1.1 200 OK".to_string()],
        Box::new(MemoryStream::new(
            "<html>\n<head><title>Caf&eacute; &amp; Bar</title></head>\n</html>",
        )),
    )
    .expect("well-formed response");

    assert_eq!(response.page_title(), "Café & Bar");
}

#[test]
fn test_page_title_missing_gives_empty_string() {
    let response = Response::parse(
        vec!["HTTP/1.1 200 OK".to_string()],
        Box::new(MemoryStream::new("<html><body>no title here</body></html>")),
    )
    .expect("well-formed response");

    assert_eq!(response.page_title(), "");
}

#[test]
fn test_page_title_only_scans_leading_bytes() {
    let mut body = "x".repeat(20_000);
    body.push_str("\n<title>Too Late</title>");

    let response = Response::parse(
        vec!["HTTP/1.1 200 OK".to_string()],
        Box::new(MemoryStream::new(body)),
    )
    .expect("well-formed response");

    assert_eq!(response.page_title(), "");
}

#[test]
fn test_json_decode() {
    let response = Response::parse(
        vec![
            "HTTP/1.1 200 OK".to_string(),
            "Content-Type: application/json; charset=utf-8".to_string(),
        ],
        Box::new(MemoryStream::new(r#"{"status":"ok","count":3}"#)),
    )
    .expect("well-formed response");

    let data = response.json_decode().expect("valid json");
    assert_eq!(data["status"], "ok");
    assert_eq!(data["count"], 3);
}

#[test]
fn test_json_decode_without_content_type_header() {
    let response = Response::parse(
        vec!["HTTP/1.1 200 OK".to_string()],
        Box::new(MemoryStream::new("[1,2,3]")),
    )
    .expect("well-formed response");

    assert!(response.json_decode().is_ok());
}

#[test]
fn test_json_decode_rejects_non_json_content_type() {
    let result = html_response().json_decode();

    assert!(matches!(result, Err(Error::UnexpectedContent(_))));
}

#[test]
fn test_json_decode_rejects_empty_body() {
    let response = Response::parse(
        vec![
            "HTTP/1.1 204 No Content".to_string(),
            "Content-Type: application/json".to_string(),
        ],
        Box::new(MemoryStream::empty()),
    )
    .expect("well-formed response");

    assert!(matches!(
        response.json_decode(),
        Err(Error::UnexpectedContent(_))
    ));
}

#[test]
fn test_json_decode_rejects_broken_json() {
    let response = Response::parse(
        vec![
            "HTTP/1.1 200 OK".to_string(),
            "Content-Type: application/json".to_string(),
        ],
        Box::new(MemoryStream::new("{not json")),
    )
    .expect("well-formed response");

    assert!(matches!(response.json_decode(), Err(Error::MalformedJson(_))));
}

#[test]
fn test_degraded_response() {
    let response = Response::degraded(Box::new(MemoryStream::empty()));

    assert_eq!(response.status_code(), 0);
    assert_eq!(response.reason_phrase(), "");
    assert!(response.headers().is_empty());
    assert_eq!(response.size(), 0);
}

#[test]
fn test_with_status() {
    let response = Response::degraded(Box::new(MemoryStream::empty()))
        .with_status(408, "Request Timeout");

    assert_eq!(response.status_code(), 408);
    assert_eq!(response.reason_phrase(), "Request Timeout");
}

#[test]
fn test_index_mutators() {
    let response = html_response()
        .with_header("x-extra", "1")
        .without_header("content-TYPE");

    assert_eq!(response.header("X-Extra"), "1");
    assert!(!response.has_header("content-type"));
}

#[test]
fn test_size_reports_body_bytes() {
    assert_eq!(html_response().size(), 30);
}
