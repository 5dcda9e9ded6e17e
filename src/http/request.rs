use std::path::PathBuf;

/// A single `Name: value` header line as received from the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Header name, case preserved as received
    pub name: String,
    /// Header value with the whitespace after the colon stripped
    pub value: String,
}

/// Ordered collection of request headers.
///
/// Entries are kept in arrival order. Duplicate names are retained as
/// separate entries; lookups are case-sensitive and answer the first match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<Header>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a header, keeping any earlier entry with the same name.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push(Header {
            name: name.into(),
            value: value.into(),
        });
    }

    /// Returns the value of the first header named exactly `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|h| h.name == name)
            .map(|h| h.value.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Header> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = &'a Header;
    type IntoIter = std::slice::Iter<'a, Header>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Represents one client request for the lifetime of its connection.
///
/// The request line fields and the headers are filled in by the parser; the
/// peer fields are recorded when the connection is accepted; `path` is only
/// set once the path resolver has validated the URI against the document
/// root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    /// Method token exactly as sent (no validation is performed)
    pub method: String,
    /// Request URI with any query string removed
    pub uri: String,
    /// Text after the first `?` of the URI, empty when there was none
    pub query: String,
    /// Canonical filesystem path inside the document root
    pub path: Option<PathBuf>,
    /// Request headers in arrival order
    pub headers: Headers,
    /// Numeric address of the peer
    pub client_host: String,
    /// Numeric port of the peer
    pub client_port: String,
}

/// Builder for constructing Request objects.
pub struct RequestBuilder {
    method: Option<String>,
    uri: Option<String>,
    query: String,
    headers: Headers,
    client_host: String,
    client_port: String,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: None,
            uri: None,
            query: String::new(),
            headers: Headers::new(),
            client_host: String::new(),
            client_port: String::new(),
        }
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(name, value);
        self
    }

    pub fn peer(mut self, host: impl Into<String>, port: impl Into<String>) -> Self {
        self.client_host = host.into();
        self.client_port = port.into();
        self
    }

    pub fn build(self) -> Result<Request, &'static str> {
        Ok(Request {
            method: self.method.ok_or("method missing")?,
            uri: self.uri.ok_or("uri missing")?,
            query: self.query,
            path: None,
            headers: self.headers,
            client_host: self.client_host,
            client_port: self.client_port,
        })
    }
}

impl Request {
    /// Retrieves a header value by exact name.
    ///
    /// # Returns
    ///
    /// `Some(&str)` with the first value recorded under `name`, `None` otherwise.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// The URI as it appeared on the request line, query included.
    pub fn target(&self) -> String {
        if self.query.is_empty() {
            self.uri.clone()
        } else {
            format!("{}?{}", self.uri, self.query)
        }
    }

    /// Serializes the request line and headers in HTTP/1.0 wire form,
    /// terminated by the blank line. The output parses back into the same
    /// method, URI, query and header set.
    pub fn to_wire(&self) -> String {
        let mut out = format!("{} {} HTTP/1.0\r\n", self.method, self.target());
        for h in &self.headers {
            out.push_str(&h.name);
            out.push_str(": ");
            out.push_str(&h.value);
            out.push_str("\r\n");
        }
        out.push_str("\r\n");
        out
    }

    /// Drops every derived string and the header list. Peer information is
    /// cleared as well; the request is left as freshly allocated.
    pub fn clear(&mut self) {
        *self = Request::default();
    }
}
