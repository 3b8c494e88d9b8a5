//! The fixture server must capture bodies however the client frames them.

mod common;

use std::io::Cursor;

use common::FixtureServer;

#[test]
fn test_records_chunked_request_body() {
    let server = FixtureServer::start(|_| (200, "{}".to_string()));

    // A reader body has no known length, so reqwest streams it chunked.
    let body = reqwest::blocking::Body::new(Cursor::new(br#"{"url": "streamed"}"#.to_vec()));
    let response = reqwest::blocking::Client::new()
        .post(format!("{}/analyze/staged", server.url()))
        .body(body)
        .send()
        .unwrap();
    assert!(response.status().is_success());

    let requests = server.requests_to("/analyze/staged");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert!(requests[0].header("content-length").is_none());
    assert_eq!(requests[0].json()["url"], "streamed");
}

#[test]
fn test_reuses_keep_alive_connection() {
    let server = FixtureServer::start(|request| (200, request.body.clone()));
    let client = reqwest::blocking::Client::new();

    for n in 0..3 {
        let echoed = client
            .post(format!("{}/echo", server.url()))
            .body(format!("{{\"n\": {n}}}"))
            .send()
            .unwrap()
            .text()
            .unwrap();
        assert_eq!(echoed, format!("{{\"n\": {n}}}"));
    }
    assert_eq!(server.requests_to("/echo").len(), 3);
}
