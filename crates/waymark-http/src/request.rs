//! HTTP request shape.
//!
//! [`HttpRequest`] carries just what routing needs: the method, the path, the
//! query string, headers and enough of the origin (scheme and host) to build
//! absolute URLs.

use http::{HeaderMap, Method};

/// An incoming HTTP request.
///
/// # Examples
///
/// ```
/// use waymark_http::HttpRequest;
///
/// let request = HttpRequest::builder()
///     .method(http::Method::GET)
///     .path("/post/42")
///     .query_string("ref=x")
///     .build();
///
/// assert_eq!(request.path(), "/post/42");
/// assert_eq!(request.route_path(), "post/42");
/// assert_eq!(request.get_full_path(), "/post/42?ref=x");
/// ```
#[derive(Debug, Clone)]
pub struct HttpRequest {
    method: Method,
    path: String,
    query_string: String,
    headers: HeaderMap,
    scheme: String,
}

impl HttpRequest {
    /// Creates a new [`HttpRequestBuilder`].
    pub fn builder() -> HttpRequestBuilder {
        HttpRequestBuilder::default()
    }

    /// Creates an `HttpRequest` from the head of an `http`/axum request.
    pub fn from_parts(parts: &http::request::Parts) -> Self {
        let uri = &parts.uri;
        let mut headers = parts.headers.clone();

        if !headers.contains_key(http::header::HOST) {
            if let Some(value) = uri
                .authority()
                .and_then(|a| http::HeaderValue::from_str(a.as_str()).ok())
            {
                headers.insert(http::header::HOST, value);
            }
        }

        Self {
            method: parts.method.clone(),
            path: uri.path().to_string(),
            query_string: uri.query().unwrap_or("").to_string(),
            headers,
            scheme: uri.scheme_str().unwrap_or("http").to_string(),
        }
    }

    /// Returns the HTTP method.
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request path (without query string).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the path in the form route expressions are written in: without
    /// its leading `/`.
    pub fn route_path(&self) -> &str {
        self.path.strip_prefix('/').unwrap_or(&self.path)
    }

    /// Returns the raw query string (without the leading `?`).
    pub fn query_string(&self) -> &str {
        &self.query_string
    }

    /// Returns the request headers.
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the URL scheme (`"http"` or `"https"`).
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Returns the host from the `Host` header, or `"localhost"`.
    pub fn host(&self) -> &str {
        self.headers
            .get(http::header::HOST)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("localhost")
    }

    /// Returns the full path including the query string.
    pub fn get_full_path(&self) -> String {
        if self.query_string.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query_string)
        }
    }

    /// Builds an absolute URI from the current request.
    ///
    /// If `location` is `None`, uses the request's full path. If `location` is
    /// already absolute (starts with `http://` or `https://`), it is returned as-is.
    pub fn build_absolute_uri(&self, location: Option<&str>) -> String {
        let scheme = &self.scheme;
        let host = self.host();

        match location {
            Some(loc) if loc.starts_with("http://") || loc.starts_with("https://") => {
                loc.to_string()
            }
            Some(loc) if loc.starts_with('/') => format!("{scheme}://{host}{loc}"),
            Some(loc) => format!("{scheme}://{host}/{loc}"),
            None => format!("{scheme}://{host}{}", self.get_full_path()),
        }
    }
}

/// Builder for constructing [`HttpRequest`] instances, mainly in tests.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    method: Method,
    path: String,
    query_string: String,
    headers: HeaderMap,
    scheme: String,
}

impl Default for HttpRequestBuilder {
    fn default() -> Self {
        Self {
            method: Method::GET,
            path: "/".to_string(),
            query_string: String::new(),
            headers: HeaderMap::new(),
            scheme: "http".to_string(),
        }
    }
}

impl HttpRequestBuilder {
    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the request path.
    #[must_use]
    pub fn path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }

    /// Sets the query string (without leading `?`).
    #[must_use]
    pub fn query_string(mut self, qs: &str) -> Self {
        self.query_string = qs.to_string();
        self
    }

    /// Adds a header. Invalid names or values are ignored.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            http::header::HeaderName::from_bytes(name.as_bytes()),
            http::header::HeaderValue::from_str(value),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Sets the scheme (http or https).
    #[must_use]
    pub fn scheme(mut self, scheme: &str) -> Self {
        self.scheme = scheme.to_string();
        self
    }

    /// Builds the [`HttpRequest`].
    pub fn build(self) -> HttpRequest {
        HttpRequest {
            method: self.method,
            path: self.path,
            query_string: self.query_string,
            headers: self.headers,
            scheme: self.scheme,
        }
    }
}
