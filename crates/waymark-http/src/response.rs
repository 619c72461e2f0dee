//! HTTP response shape.
//!
//! [`HttpResponse`] is the value dispatch returns. Handlers either build one
//! themselves or hand back raw text that is appended to the response the
//! caller supplied.

use axum::response::IntoResponse;
use http::{HeaderMap, HeaderValue, StatusCode};

use waymark_core::WaymarkError;

/// An HTTP response with a text body.
///
/// # Examples
///
/// ```
/// use waymark_http::HttpResponse;
///
/// let mut response = HttpResponse::ok("Hello");
/// response.write(", World!");
/// assert_eq!(response.status(), http::StatusCode::OK);
/// assert_eq!(response.body(), "Hello, World!");
/// ```
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: StatusCode,
    headers: HeaderMap,
    content_type: String,
    body: String,
}

impl Default for HttpResponse {
    fn default() -> Self {
        Self::ok("")
    }
}

impl HttpResponse {
    /// Creates a new `HttpResponse` with the given status code and body.
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            content_type: "text/html; charset=utf-8".to_string(),
            body: body.into(),
        }
    }

    /// Creates a 200 OK response with the given body.
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, body)
    }

    /// Creates a 404 Not Found response.
    pub fn not_found(body: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, body)
    }

    /// Creates a 500 Internal Server Error response.
    pub fn server_error(body: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, body)
    }

    /// Creates a plain-text response describing `error`, with the status its
    /// [`WaymarkError::status_code`] maps to.
    pub fn from_error(error: &WaymarkError) -> Self {
        let status =
            StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = Self::new(status, error.to_string());
        response.set_content_type("text/plain; charset=utf-8");
        response
    }

    /// Returns the status code.
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Sets the status code.
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// Returns the response headers.
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a mutable reference to the response headers.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Returns the content type.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Sets the content type.
    pub fn set_content_type(&mut self, content_type: impl Into<String>) {
        self.content_type = content_type.into();
    }

    /// Returns the body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Appends `content` to the body.
    pub fn write(&mut self, content: &str) {
        self.body.push_str(content);
    }
}

impl IntoResponse for HttpResponse {
    fn into_response(self) -> axum::response::Response {
        let mut response = (self.status, self.body).into_response();

        if let Ok(ct) = HeaderValue::from_str(&self.content_type) {
            response.headers_mut().insert(http::header::CONTENT_TYPE, ct);
        }

        // Custom headers win over the defaults set above.
        for (key, value) in &self.headers {
            response.headers_mut().insert(key, value.clone());
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_response_ok() {
        let resp = HttpResponse::ok("Hello");
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.content_type(), "text/html; charset=utf-8");
        assert_eq!(resp.body(), "Hello");
    }

    #[test]
    fn test_http_response_not_found() {
        let resp = HttpResponse::not_found("Not Found");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_http_response_server_error() {
        let resp = HttpResponse::server_error("boom");
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_write_appends() {
        let mut resp = HttpResponse::default();
        resp.write("a");
        resp.write("b");
        assert_eq!(resp.body(), "ab");
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[test]
    fn test_set_status_and_headers() {
        let mut resp = HttpResponse::ok("");
        resp.set_status(StatusCode::CREATED);
        resp.headers_mut()
            .insert("x-route", HeaderValue::from_static("post"));
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(resp.headers().get("x-route").unwrap(), "post");
    }

    #[test]
    fn test_from_error() {
        let resp = HttpResponse::from_error(&WaymarkError::NotFound("nope".into()));
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.body(), "Not found: no route matches 'nope'");
        assert_eq!(resp.content_type(), "text/plain; charset=utf-8");

        let resp = HttpResponse::from_error(&WaymarkError::UnboundHandler("x@y".into()));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_into_response() {
        let mut resp = HttpResponse::ok("body text");
        resp.headers_mut()
            .insert("x-custom", HeaderValue::from_static("1"));
        let response = resp.into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(http::header::CONTENT_TYPE).unwrap(),
            "text/html; charset=utf-8"
        );
        assert_eq!(response.headers().get("x-custom").unwrap(), "1");

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"body text");
    }
}
