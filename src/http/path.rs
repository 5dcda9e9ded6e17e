use std::ffi::OsString;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("cannot resolve path: {0}")]
    NotFound(#[source] std::io::Error),
    #[error("{} escapes the document root", .0.display())]
    PathEscapesRoot(PathBuf),
}

/// Maps a request URI onto a canonical path below `root`.
///
/// `root` must already be canonical. The URI is appended to it verbatim,
/// then `.`, `..` and symbolic links are resolved; anything that lands
/// outside `root` is rejected.
pub async fn resolve(root: &Path, uri: &str) -> Result<PathBuf, ResolveError> {
    let mut joined = OsString::from(root.as_os_str());
    joined.push("/");
    joined.push(uri);

    let path = tokio::fs::canonicalize(&joined)
        .await
        .map_err(ResolveError::NotFound)?;

    if !path.starts_with(root) {
        return Err(ResolveError::PathEscapesRoot(path));
    }

    Ok(path)
}
