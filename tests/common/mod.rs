#![allow(dead_code)]

use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::sync::Arc;

use spidey::config::SpawnFailurePolicy;
use spidey::handlers::Credentials;
use spidey::http::mime::MimeTypes;
use spidey::server::{ServerContext, WorkerLimits, forking, single};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub const MIME_DB: &str = "\
# test database
text/html       html htm
text/css        css
image/png       png
text/plain      txt
";

/// A user that owns nothing in the fixtures and belongs to none of their
/// groups, so only the "other" permission bits apply whoever runs the tests.
pub const STRANGER: Credentials = Credentials {
    uid: u32::MAX - 1,
    gid: u32::MAX - 1,
    groups: Vec::new(),
};

pub const ROOT: Credentials = Credentials {
    uid: 0,
    gid: 0,
    groups: Vec::new(),
};

pub fn context(root: &Path) -> ServerContext {
    let mut ctx = ServerContext::new(root, 9898, MimeTypes::parse(MIME_DB, "text/plain")).unwrap();
    ctx.credentials = STRANGER;
    ctx
}

/// Credentials of whoever owns `path`.
pub fn owner_of(path: &Path) -> Credentials {
    use std::os::unix::fs::MetadataExt;

    let meta = std::fs::metadata(path).unwrap();
    Credentials {
        uid: meta.uid(),
        gid: meta.gid(),
        groups: Vec::new(),
    }
}

pub fn write_file(path: &Path, contents: &[u8], mode: u32) {
    std::fs::write(path, contents).unwrap();
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).unwrap();
}

/// Builds a small document root:
///
/// ```text
/// index.html      0644
/// notes.txt       0644
/// .hidden         0644
/// locked.txt      0000
/// hello.cgi       0755
/// docs/a.txt      0644
/// ```
pub fn document_root() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    write_file(&root.join("index.html"), b"<h1>Hello</h1>\n", 0o644);
    write_file(&root.join("notes.txt"), b"plain notes\n", 0o644);
    write_file(&root.join(".hidden"), b"secret\n", 0o644);
    write_file(&root.join("locked.txt"), b"nobody\n", 0o000);
    write_file(
        &root.join("hello.cgi"),
        b"#!/bin/sh\nprintf 'HTTP/1.0 200 OK\\r\\nContent-Type: text/plain\\r\\n\\r\\n'\necho \"query=$QUERY_STRING method=$REQUEST_METHOD host=$HTTP_HOST\"\n",
        0o755,
    );
    std::fs::create_dir(root.join("docs")).unwrap();
    write_file(&root.join("docs").join("a.txt"), b"a\n", 0o644);

    dir
}

pub async fn spawn_single(root: &Path) -> std::net::SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let ctx = context(root);
    tokio::spawn(async move {
        single::serve(&listener, &ctx).await;
    });
    addr
}

pub async fn spawn_forking(
    root: &Path,
    max_workers: usize,
    on_spawn_failure: SpawnFailurePolicy,
) -> (std::net::SocketAddr, tokio::task::JoinHandle<Result<(), spidey::server::ServeError>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let ctx = Arc::new(context(root));
    let limits = WorkerLimits {
        max_workers,
        on_spawn_failure,
    };
    let handle = tokio::spawn(async move { forking::serve(&listener, ctx, limits).await });
    (addr, handle)
}

/// Sends `raw` and reads the whole response until the server closes. A
/// connection the server drops without answering reads as empty.
pub async fn roundtrip(addr: std::net::SocketAddr, raw: impl AsRef<[u8]>) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let _ = stream.write_all(raw.as_ref()).await;
    let mut out = Vec::new();
    let _ = stream.read_to_end(&mut out).await;
    String::from_utf8_lossy(&out).into_owned()
}

pub fn get(uri: &str) -> Vec<u8> {
    format!("GET {} HTTP/1.0\r\nHost: localhost\r\n\r\n", uri).into_bytes()
}
