mod common;

use spidey::http::connection::{Connection, ConnectionState};
use spidey::http::response::Status;
use spidey::server::ServerContext;
use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};

const PEER: &str = "192.0.2.7:51000";

async fn serve(ctx: &ServerContext, raw: &[u8]) -> (Status, String) {
    let (mut client, server) = tokio::io::duplex(256 * 1024);
    let mut conn: Connection<DuplexStream> = Connection::new(server, PEER.parse().unwrap());

    client.write_all(raw).await.unwrap();
    let status = conn.run(ctx).await;
    conn.release().await;

    let mut out = Vec::new();
    client.read_to_end(&mut out).await.unwrap();
    (status, String::from_utf8_lossy(&out).into_owned())
}

#[tokio::test]
async fn test_static_file_request() {
    let dir = common::document_root();
    let ctx = common::context(dir.path());

    let (status, out) = serve(&ctx, &common::get("/index.html")).await;

    assert_eq!(status, Status::Ok);
    assert_eq!(out, "HTTP/1.0 200 OK\r\nContent-Type: text/html\r\n\r\n<h1>Hello</h1>\n");
}

#[tokio::test]
async fn test_directory_request() {
    let dir = common::document_root();
    let ctx = common::context(dir.path());

    let (status, out) = serve(&ctx, &common::get("/docs")).await;

    assert_eq!(status, Status::Ok);
    assert!(out.contains("<a href=\"/docs/a.txt\">a.txt</a>"));
    assert!(out.contains("<a href=\"/docs/..\">..</a>"));
}

#[tokio::test]
async fn test_cgi_request() {
    let dir = common::document_root();
    let ctx = common::context(dir.path());

    let raw = b"GET /hello.cgi?x=1 HTTP/1.0\r\nHost: spidey.test\r\n\r\n";
    let (status, out) = serve(&ctx, raw).await;

    assert_eq!(status, Status::Ok);
    assert!(out.ends_with("query=x=1 method=GET host=spidey.test\n"));
}

#[tokio::test]
async fn test_malformed_request_is_bad_request() {
    let dir = common::document_root();
    let ctx = common::context(dir.path());

    let (status, out) = serve(&ctx, b"GARBAGE\r\n\r\n").await;

    assert_eq!(status, Status::BadRequest);
    assert!(out.starts_with("HTTP/1.0 400 Bad Request\r\n"));
}

#[tokio::test]
async fn test_request_without_headers_is_bad_request() {
    let dir = common::document_root();
    let ctx = common::context(dir.path());

    let (status, _) = serve(&ctx, b"GET / HTTP/1.0\r\n\r\n").await;
    assert_eq!(status, Status::BadRequest);
}

#[tokio::test]
async fn test_escape_looks_like_missing_file() {
    let dir = common::document_root();
    let ctx = common::context(dir.path());

    let (escape_status, escape_out) = serve(&ctx, &common::get("/../../../../../../etc/passwd")).await;
    let (missing_status, missing_out) = serve(&ctx, &common::get("/no-such-file")).await;

    assert_eq!(escape_status, Status::NotFound);
    assert_eq!(missing_status, Status::NotFound);
    assert_eq!(escape_out, missing_out);
    assert!(!escape_out.contains("root:"));
}

#[tokio::test]
async fn test_unreadable_file_is_bad_request() {
    let dir = common::document_root();
    let ctx = common::context(dir.path());

    let (status, out) = serve(&ctx, &common::get("/locked.txt")).await;

    assert_eq!(status, Status::BadRequest);
    assert!(out.starts_with("HTTP/1.0 400 Bad Request\r\n"));
}

#[tokio::test]
async fn test_files_the_server_cannot_use_are_bad_requests() {
    let dir = common::document_root();
    let ctx = common::context(dir.path());
    common::write_file(&dir.path().join("private.txt"), b"mine\n", 0o600);
    common::write_file(&dir.path().join("private.cgi"), b"#!/bin/sh\necho hi\n", 0o700);

    let (file_status, file_out) = serve(&ctx, &common::get("/private.txt")).await;
    let (cgi_status, cgi_out) = serve(&ctx, &common::get("/private.cgi")).await;

    assert_eq!(file_status, Status::BadRequest);
    assert!(file_out.starts_with("HTTP/1.0 400 Bad Request\r\n"));
    assert_eq!(cgi_status, Status::BadRequest);
    assert!(cgi_out.starts_with("HTTP/1.0 400 Bad Request\r\n"));
}

#[tokio::test]
async fn test_state_machine_and_release() {
    let dir = common::document_root();
    let ctx = common::context(dir.path());
    let (mut client, server) = tokio::io::duplex(64 * 1024);
    let mut conn = Connection::new(server, PEER.parse().unwrap());

    assert_eq!(conn.state(), &ConnectionState::Reading);
    assert_eq!(conn.request().client_host, "192.0.2.7");
    assert_eq!(conn.request().client_port, "51000");

    client.write_all(&common::get("/notes.txt")).await.unwrap();
    let status = conn.run(&ctx).await;

    assert_eq!(status, Status::Ok);
    assert_eq!(conn.state(), &ConnectionState::Closed(Status::Ok));
    assert_eq!(conn.request().uri, "/notes.txt");
    assert_eq!(conn.request().path, Some(ctx.root.join("notes.txt")));
    assert!(conn.is_open());

    conn.release().await;
    assert!(!conn.is_open());
    assert_eq!(conn.state(), &ConnectionState::Released);
    assert!(conn.request().uri.is_empty());
    assert!(conn.request().headers.is_empty());

    conn.release().await;
    assert_eq!(conn.state(), &ConnectionState::Released);

    let mut out = Vec::new();
    client.read_to_end(&mut out).await.unwrap();
    assert!(out.ends_with(b"plain notes\n"));
}

#[tokio::test]
async fn test_release_before_run() {
    let dir = common::document_root();
    let ctx = common::context(dir.path());
    let (_client, server) = tokio::io::duplex(1024);
    let mut conn = Connection::new(server, PEER.parse().unwrap());

    conn.release().await;
    assert_eq!(conn.run(&ctx).await, Status::InternalServerError);
    assert_eq!(conn.state(), &ConnectionState::Released);
}

#[tokio::test]
async fn test_client_hangup_before_request() {
    let dir = common::document_root();
    let ctx = common::context(dir.path());
    let (client, server) = tokio::io::duplex(1024);
    let mut conn = Connection::new(server, PEER.parse().unwrap());

    drop(client);
    assert_eq!(conn.run(&ctx).await, Status::BadRequest);
    conn.release().await;
}
