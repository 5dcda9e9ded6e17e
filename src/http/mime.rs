//! Extension to content-type table.
//!
//! Loaded once from a `mime.types` style database:
//!
//! ```text
//! # comment
//! text/html       html htm
//! image/png       png
//! ```
//!
//! The first line that lists an extension wins.

use anyhow::Context;
use std::collections::HashMap;
use std::path::Path;

pub const DEFAULT_MIME_TYPE: &str = "text/plain";

#[derive(Debug, Clone)]
pub struct MimeTypes {
    by_extension: HashMap<String, String>,
    default_type: String,
}

impl MimeTypes {
    /// Table with no entries; every lookup answers `default_type`.
    pub fn empty(default_type: impl Into<String>) -> Self {
        Self {
            by_extension: HashMap::new(),
            default_type: default_type.into(),
        }
    }

    pub fn parse(contents: &str, default_type: impl Into<String>) -> Self {
        let mut table = Self::empty(default_type);
        for line in contents.lines() {
            table.add_line(line);
        }
        table
    }

    pub fn load(path: &Path, default_type: impl Into<String>) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read mime database {}", path.display()))?;
        Ok(Self::parse(&contents, default_type))
    }

    fn add_line(&mut self, line: &str) {
        let mut fields = line.split_whitespace();
        let mimetype = match fields.next() {
            Some(m) if !m.starts_with('#') => m,
            _ => return,
        };
        for ext in fields {
            self.by_extension
                .entry(ext.to_string())
                .or_insert_with(|| mimetype.to_string());
        }
    }

    /// Content type for the file at `path`, keyed on the text after the
    /// last `.` of its file name.
    pub fn lookup(&self, path: &Path) -> &str {
        path.file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.rsplit_once('.'))
            .and_then(|(_, ext)| self.by_extension.get(ext))
            .map(String::as_str)
            .unwrap_or(&self.default_type)
    }

    pub fn default_type(&self) -> &str {
        &self.default_type
    }

    pub fn len(&self) -> usize {
        self.by_extension.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_extension.is_empty()
    }
}

impl Default for MimeTypes {
    fn default() -> Self {
        Self::empty(DEFAULT_MIME_TYPE)
    }
}
