// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use projsync_api::Client;
use projsync_app::{ApiError, ProjectId, ProjectPayload, ProjectService};
use std::collections::BTreeMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tiny_http::{Header, Response, Server};

#[derive(Debug)]
struct SeenRequest {
    method: String,
    url: String,
    content_type: Option<String>,
    authorization: Option<String>,
    body: String,
}

struct MockServer {
    base_url: String,
    seen: Receiver<SeenRequest>,
    handle: JoinHandle<()>,
}

impl MockServer {
    fn next_request(&self) -> SeenRequest {
        self.seen
            .recv_timeout(Duration::from_secs(2))
            .expect("mock server should have seen a request")
    }

    fn join(self) {
        self.handle.join().expect("server thread should join");
    }
}

/// Answers one request per entry in `responses`, in order.
fn serve(responses: Vec<(u16, &'static str)>) -> Result<MockServer> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let base_url = format!("http://{}/api/projects", server.server_addr());
    let (tx, seen) = mpsc::channel();

    let handle = thread::spawn(move || {
        for (status, body) in responses {
            let mut request = server.recv().expect("request expected");
            let mut received = String::new();
            request
                .as_reader()
                .read_to_string(&mut received)
                .expect("request body should be readable");
            let header = |name: &str| {
                request
                    .headers()
                    .iter()
                    .find(|header| header.field.as_str().as_str().eq_ignore_ascii_case(name))
                    .map(|header| header.value.as_str().to_owned())
            };
            let seen_request = SeenRequest {
                method: request.method().as_str().to_owned(),
                url: request.url().to_owned(),
                content_type: header("Content-Type"),
                authorization: header("Authorization"),
                body: received,
            };
            tx.send(seen_request).expect("test should be listening");

            let response = Response::from_string(body)
                .with_status_code(status)
                .with_header(
                    Header::from_bytes("Content-Type", "application/json")
                        .expect("valid content type header"),
                );
            request.respond(response).expect("response should succeed");
        }
    });

    Ok(MockServer {
        base_url,
        seen,
        handle,
    })
}

fn client(server: &MockServer) -> Result<Client> {
    Client::new(&server.base_url, Duration::from_secs(2))
}

#[test]
fn list_returns_records_in_server_order() -> Result<()> {
    let server = serve(vec![(
        200,
        r#"[{"id":9,"name":"Zeta"},{"id":2,"name":"Alpha","status":"open"}]"#,
    )])?;
    let mut client = client(&server)?;

    let records = client.list()?;
    let ids: Vec<i64> = records.iter().map(|record| record.id.get()).collect();
    assert_eq!(ids, vec![9, 2]);
    assert_eq!(records[1].status.as_deref(), Some("open"));

    let seen = server.next_request();
    assert_eq!(seen.method, "GET");
    assert_eq!(seen.url, "/api/projects");
    assert!(seen.body.is_empty());
    server.join();
    Ok(())
}

#[test]
fn list_with_empty_body_is_an_empty_collection() -> Result<()> {
    let server = serve(vec![(200, "")])?;
    let mut client = client(&server)?;
    assert!(client.list()?.is_empty());
    server.join();
    Ok(())
}

#[test]
fn create_posts_json_with_nulls_for_blank_fields() -> Result<()> {
    let server = serve(vec![(201, r#"{"id":1,"name":"Alpha","status":"NEW"}"#)])?;
    let mut client = client(&server)?;

    let created = client.create(&ProjectPayload {
        name: Some("Alpha".to_owned()),
        ..ProjectPayload::default()
    })?;
    assert_eq!(created.map(|record| record.id), Some(ProjectId::new(1)));

    let seen = server.next_request();
    assert_eq!(seen.method, "POST");
    assert_eq!(seen.url, "/api/projects");
    assert_eq!(seen.content_type.as_deref(), Some("application/json"));
    let body: serde_json::Value = serde_json::from_str(&seen.body)?;
    assert_eq!(
        body,
        serde_json::json!({
            "name": "Alpha",
            "description": null,
            "status": null,
            "responsible": null,
        })
    );
    server.join();
    Ok(())
}

#[test]
fn update_patches_the_item_path() -> Result<()> {
    let server = serve(vec![(200, r#"{"id":7,"name":"Beta"}"#)])?;
    let mut client = client(&server)?;

    let payload = ProjectPayload {
        name: Some("Beta".to_owned()),
        description: Some("x".to_owned()),
        status: Some("open".to_owned()),
        responsible: Some("bob".to_owned()),
    };
    client.update(ProjectId::new(7), &payload)?;

    let seen = server.next_request();
    assert_eq!(seen.method, "PATCH");
    assert_eq!(seen.url, "/api/projects/7");
    assert_eq!(seen.content_type.as_deref(), Some("application/json"));
    let sent: ProjectPayload = serde_json::from_str(&seen.body)?;
    assert_eq!(sent, payload);
    server.join();
    Ok(())
}

#[test]
fn update_with_empty_success_body_returns_none() -> Result<()> {
    let server = serve(vec![(200, "")])?;
    let mut client = client(&server)?;
    let updated = client.update(ProjectId::new(3), &ProjectPayload::default())?;
    assert_eq!(updated, None);
    server.join();
    Ok(())
}

#[test]
fn remove_accepts_no_content() -> Result<()> {
    let server = serve(vec![(204, "")])?;
    let mut client = client(&server)?;
    client.remove(ProjectId::new(4))?;

    let seen = server.next_request();
    assert_eq!(seen.method, "DELETE");
    assert_eq!(seen.url, "/api/projects/4");
    server.join();
    Ok(())
}

#[test]
fn remove_reports_not_found_with_status() -> Result<()> {
    let server = serve(vec![(
        404,
        r#"{"error":"Project not found","status":404}"#,
    )])?;
    let mut client = client(&server)?;
    let error = client
        .remove(ProjectId::new(99))
        .expect_err("missing project should fail");
    assert_eq!(
        error,
        ApiError::Http {
            status: 404,
            message: "Project not found".to_owned(),
        }
    );
    server.join();
    Ok(())
}

#[test]
fn server_errors_keep_status_and_message_for_every_operation() -> Result<()> {
    let server = serve(vec![(500, r#"{"error":"boom"}"#); 4])?;
    let mut client = client(&server)?;

    let errors = [
        client.list().map(|_| ()),
        client.create(&ProjectPayload::default()).map(|_| ()),
        client
            .update(ProjectId::new(1), &ProjectPayload::default())
            .map(|_| ()),
        client.remove(ProjectId::new(1)),
    ];
    for result in errors {
        let error = result.expect_err("500 should be an error");
        let message = error.to_string();
        assert!(message.contains("500"), "unexpected message: {message}");
        assert!(message.contains("boom"), "unexpected message: {message}");
    }
    server.join();
    Ok(())
}

#[test]
fn malformed_success_body_is_a_decode_error() -> Result<()> {
    let server = serve(vec![(200, "<html>oops</html>")])?;
    let mut client = client(&server)?;
    let error = client.list().expect_err("html should not decode");
    assert!(matches!(error, ApiError::Decode(_)));
    server.join();
    Ok(())
}

#[test]
fn configured_headers_are_sent_with_every_request() -> Result<()> {
    let server = serve(vec![(200, "[]"), (204, "")])?;
    let headers = BTreeMap::from([("Authorization".to_owned(), "Bearer secret".to_owned())]);
    let mut client = Client::with_headers(&server.base_url, Duration::from_secs(2), &headers)?;

    client.list()?;
    client.remove(ProjectId::new(1))?;

    for _ in 0..2 {
        let seen = server.next_request();
        assert_eq!(seen.authorization.as_deref(), Some("Bearer secret"));
    }
    server.join();
    Ok(())
}

#[test]
fn unreachable_server_is_a_transport_error() -> Result<()> {
    let mut client = Client::new(
        "http://127.0.0.1:1/api/projects",
        Duration::from_millis(200),
    )?;
    let error = client.list().expect_err("nothing listens on port 1");
    assert!(matches!(error, ApiError::Transport(_)));
    assert_eq!(error.status(), None);
    Ok(())
}

#[test]
fn request_timeout_is_a_transport_error() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let base_url = format!("http://{}/api/projects", server.server_addr());
    let handle = thread::spawn(move || {
        // Hold the request open well past the client timeout, then drop it.
        let request = server.recv().expect("request expected");
        thread::sleep(Duration::from_millis(800));
        drop(request);
    });

    let mut client = Client::new(&base_url, Duration::from_millis(200))?;
    let error = client.list().expect_err("server never answers");
    match &error {
        ApiError::Transport(message) => {
            assert!(message.contains("timed out"), "unexpected: {message}")
        }
        other => panic!("expected a transport error, got {other:?}"),
    }
    assert_eq!(error.status(), None);
    handle.join().map_err(|_| anyhow!("server thread panicked"))?;
    Ok(())
}

#[test]
fn truncated_error_body_still_reports_status() -> Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let base_url = format!("http://{}/api/projects", listener.local_addr()?);
    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().expect("connection expected");
        let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
        let mut line = String::new();
        while reader.read_line(&mut line).expect("read request line") > 0 {
            if line == "\r\n" {
                break;
            }
            line.clear();
        }
        let mut stream = stream;
        stream
            .write_all(
                b"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 100\r\n\r\n{\"error\":\"b",
            )
            .expect("write partial response");
    });

    let mut client = Client::new(&base_url, Duration::from_secs(2))?;
    let error = client.list().expect_err("500 must fail");
    handle.join().map_err(|_| anyhow!("server thread panicked"))?;

    assert_eq!(error.status(), Some(500));
    assert!(error.to_string().starts_with("Error 500:"), "unexpected: {error}");
    Ok(())
}
