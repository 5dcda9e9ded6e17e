/// HTTP status codes produced by the server.
///
/// Four statuses are named:
/// - `Ok` (200): Request successful
/// - `BadRequest` (400): Malformed request or unservable target
/// - `NotFound` (404): Resource missing or outside the document root
/// - `InternalServerError` (500): Server error
///
/// Any other code is carried as `Unknown` and rendered with the
/// `418 I'm A Teapot` placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
    /// 500 Internal Server Error
    InternalServerError,
    /// Anything else
    Unknown(u16),
}

impl Status {
    /// Maps a numeric code onto a status.
    ///
    /// # Example
    ///
    /// ```
    /// # use spidey::http::response::Status;
    /// assert_eq!(Status::from_u16(404), Status::NotFound);
    /// assert_eq!(Status::from_u16(302), Status::Unknown(302));
    /// ```
    pub fn from_u16(code: u16) -> Self {
        match code {
            200 => Status::Ok,
            400 => Status::BadRequest,
            404 => Status::NotFound,
            500 => Status::InternalServerError,
            other => Status::Unknown(other),
        }
    }

    /// Returns the numeric HTTP status code that goes on the wire.
    ///
    /// # Example
    ///
    /// ```
    /// # use spidey::http::response::Status;
    /// assert_eq!(Status::Ok.as_u16(), 200);
    /// assert_eq!(Status::Unknown(302).as_u16(), 418);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::BadRequest => 400,
            Status::NotFound => 404,
            Status::InternalServerError => 500,
            Status::Unknown(_) => 418,
        }
    }

    /// Returns the reason phrase for this status.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::BadRequest => "Bad Request",
            Status::NotFound => "Not Found",
            Status::InternalServerError => "Internal Server Error",
            Status::Unknown(_) => "I'm A Teapot",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Status::Ok)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}

/// A response that is fully generated in memory before it is sent
/// (error pages and directory listings).
///
/// Streamed bodies (static files, CGI output) never go through this type.
#[derive(Debug)]
pub struct Response {
    /// The HTTP status
    pub status: Status,
    /// Headers in the order they will be written
    pub headers: Vec<(String, String)>,
    /// Response body as bytes
    pub body: Vec<u8>,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(Status::Ok)
///     .header("Content-Type", "text/html")
///     .body(page.into_bytes())
///     .build();
/// ```
pub struct ResponseBuilder {
    status: Status,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status.
    pub fn new(status: Status) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Adds or replaces a header. Names compare case-insensitively.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&key))
        {
            Some(slot) => slot.1 = value,
            None => self.headers.push((key, value)),
        }
        self
    }

    /// Sets the response body.
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Builds the final Response. No `Content-Length` is added: HTTP/1.0
    /// bodies here are delimited by connection close.
    pub fn build(self) -> Response {
        Response {
            status: self.status,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Response {
    /// Creates a `200 OK` HTML response.
    pub fn html(body: impl Into<Vec<u8>>) -> Self {
        ResponseBuilder::new(Status::Ok)
            .header("Content-Type", "text/html")
            .body(body.into())
            .build()
    }

    /// Returns the value of the header named `key`, ignoring case.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}
