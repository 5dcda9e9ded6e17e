use spidey::http::mime::MimeTypes;
use std::path::Path;

const DB: &str = "\
# comment line with html in it
text/html                       html htm
application/xhtml+xml           xhtml
text/x-first                    dup
text/x-second                   dup

image/png\tpng
lonely/type
";

#[test]
fn test_lookup_by_extension() {
    let table = MimeTypes::parse(DB, "text/plain");

    assert_eq!(table.lookup(Path::new("/srv/www/index.html")), "text/html");
    assert_eq!(table.lookup(Path::new("/srv/www/page.htm")), "text/html");
    assert_eq!(table.lookup(Path::new("logo.png")), "image/png");
}

#[test]
fn test_first_matching_line_wins() {
    let table = MimeTypes::parse(DB, "text/plain");
    assert_eq!(table.lookup(Path::new("x.dup")), "text/x-first");
}

#[test]
fn test_extension_is_after_last_dot() {
    let table = MimeTypes::parse(DB, "text/plain");
    assert_eq!(table.lookup(Path::new("archive.tar.png")), "image/png");
}

#[test]
fn test_dot_in_directory_name_is_ignored() {
    let table = MimeTypes::parse(DB, "text/plain");
    assert_eq!(table.lookup(Path::new("/srv/site.html/README")), "text/plain");
}

#[test]
fn test_missing_or_unknown_extension_uses_default() {
    let table = MimeTypes::parse(DB, "application/octet-stream");

    assert_eq!(table.lookup(Path::new("Makefile")), "application/octet-stream");
    assert_eq!(table.lookup(Path::new("data.bin")), "application/octet-stream");
}

#[test]
fn test_comments_and_bare_types_are_skipped() {
    let table = MimeTypes::parse(DB, "text/plain");

    assert_eq!(table.lookup(Path::new("x.comment")), "text/plain");
    assert_eq!(table.lookup(Path::new("x.type")), "text/plain");
    assert_eq!(table.len(), 5);
}

#[test]
fn test_empty_table() {
    let table = MimeTypes::empty("text/plain");

    assert!(table.is_empty());
    assert_eq!(table.default_type(), "text/plain");
    assert_eq!(table.lookup(Path::new("index.html")), "text/plain");
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mime.types");
    std::fs::write(&path, DB).unwrap();

    let table = MimeTypes::load(&path, "text/plain").unwrap();
    assert_eq!(table.lookup(Path::new("a.xhtml")), "application/xhtml+xml");
}

#[test]
fn test_load_missing_file_fails() {
    assert!(MimeTypes::load(Path::new("/nonexistent/mime.types"), "text/plain").is_err());
}
