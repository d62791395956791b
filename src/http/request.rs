/// HTTP request methods.
///
/// The server only ever serves `GET`. Every other token found in the method
/// position is kept as-is so it can be answered with 405 Method Not Allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// Any other token, standard verb or not
    Extension(String),
}

impl Method {
    /// Parses an HTTP method from its request-line token.
    ///
    /// Matching is case-sensitive: `get` is an extension method, not `GET`.
    ///
    /// # Example
    ///
    /// ```
    /// # use lantern::http::request::Method;
    /// assert_eq!(Method::parse("GET"), Method::GET);
    /// assert_eq!(Method::parse("get"), Method::Extension("get".to_string()));
    /// ```
    pub fn parse(s: &str) -> Self {
        match s {
            "GET" => Method::GET,
            other => Method::Extension(other.to_string()),
        }
    }

    pub fn is_get(&self) -> bool {
        *self == Method::GET
    }
}

/// A parsed request line.
///
/// Headers are consumed and discarded by the parser, so a request is just the
/// three request-line tokens plus the trimmed line itself, which the access
/// log records verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The HTTP method (GET, POST, etc.)
    pub method: Method,
    /// The request path exactly as sent (e.g., "/index.html")
    pub path: String,
    /// HTTP version token (typically "HTTP/1.1")
    pub version: String,
    /// The request line with its CRLF terminator removed
    pub line: String,
}

impl Request {
    /// Splits a trimmed request line into its three tokens.
    ///
    /// Tokens are separated by single spaces; anything other than exactly
    /// three tokens yields `None`.
    pub fn from_line(line: &str) -> Option<Self> {
        let parts: Vec<&str> = line.split(' ').collect();
        let [method, path, version] = parts.as_slice() else {
            return None;
        };

        Some(Self {
            method: Method::parse(method),
            path: path.to_string(),
            version: version.to_string(),
            line: line.to_string(),
        })
    }
}
