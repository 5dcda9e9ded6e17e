use std::ffi::OsString;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use tokio::io::AsyncWrite;

use crate::handlers::error::handle_error;
use crate::http::response::{Response, Status};
use crate::http::writer::write_response;

/// Lists the directory at `path` as an HTML page of links.
///
/// Entries are sorted by name and include hidden entries and `..`, never
/// `.`. Each link is the request URI joined with the entry name.
pub async fn handle_browse<W>(stream: &mut W, path: &Path, uri: &str) -> Status
where
    W: AsyncWrite + Unpin,
{
    let entries = match list_entries(path).await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "scan failed");
            return handle_error(stream, Status::NotFound).await;
        }
    };

    tracing::debug!(path = %path.display(), entries = entries.len(), "Listing directory");

    let response = Response::html(render_listing(uri, &entries));
    match write_response(stream, &response).await {
        Ok(()) => Status::Ok,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to write directory listing");
            Status::InternalServerError
        }
    }
}

/// Names in `path`, sorted bytewise, with `..` added and `.` left out.
pub async fn list_entries(path: &Path) -> std::io::Result<Vec<OsString>> {
    let mut dir = tokio::fs::read_dir(path).await?;
    let mut names = vec![OsString::from("..")];

    while let Some(entry) = dir.next_entry().await? {
        let name = entry.file_name();
        if name != "." && name != ".." {
            names.push(name);
        }
    }

    names.sort();
    Ok(names)
}

/// Renders the listing page. Entry names are copied byte for byte, only
/// HTML-escaped, so names that are not UTF-8 still link to the real file.
pub fn render_listing(uri: &str, entries: &[OsString]) -> Vec<u8> {
    let prefix = escape_html(uri.trim_end_matches('/').as_bytes());

    let mut page = b"<!doctype html>\n<html><head><meta charset=\"utf-8\">\
         <style>ul { list-style: none; }</style></head><body>\n<ul>\n"
        .to_vec();
    for name in entries {
        let name = escape_html(name.as_bytes());
        page.extend_from_slice(b"<li><a href=\"");
        page.extend_from_slice(&prefix);
        page.push(b'/');
        page.extend_from_slice(&name);
        page.extend_from_slice(b"\">");
        page.extend_from_slice(&name);
        page.extend_from_slice(b"</a></li>\n");
    }
    page.extend_from_slice(b"</ul>\n</body></html>\n");
    page
}

fn escape_html(raw: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(raw.len());
    for &b in raw {
        match b {
            b'&' => out.extend_from_slice(b"&amp;"),
            b'<' => out.extend_from_slice(b"&lt;"),
            b'>' => out.extend_from_slice(b"&gt;"),
            b'"' => out.extend_from_slice(b"&quot;"),
            _ => out.push(b),
        }
    }
    out
}
