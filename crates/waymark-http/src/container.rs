//! Handler invocation.
//!
//! The dispatcher never calls handlers directly. It asks a [`Container`] to
//! run whatever is bound to a handler identifier such as `"showPost"` or
//! `"blogController@listAction"`.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use waymark_core::{WaymarkError, WaymarkResult};

use crate::response::HttpResponse;
use crate::urls::params::Parameters;

/// What a handler hands back.
#[derive(Debug, Clone)]
pub enum DispatchOutcome {
    /// A complete response, returned to the caller unchanged.
    Response(HttpResponse),
    /// Raw text, written into the response supplied to the dispatcher.
    Raw(String),
}

impl From<HttpResponse> for DispatchOutcome {
    fn from(response: HttpResponse) -> Self {
        Self::Response(response)
    }
}

impl From<String> for DispatchOutcome {
    fn from(raw: String) -> Self {
        Self::Raw(raw)
    }
}

impl From<&str> for DispatchOutcome {
    fn from(raw: &str) -> Self {
        Self::Raw(raw.to_string())
    }
}

/// Resolves a handler identifier and invokes it with named parameters.
pub trait Container: Send + Sync {
    /// Invokes the handler bound to `identifier`.
    ///
    /// # Errors
    ///
    /// Implementations fail when nothing is bound to `identifier` or when the
    /// handler itself fails.
    fn call(&self, identifier: &str, parameters: Parameters) -> WaymarkResult<DispatchOutcome>;
}

/// A bound handler.
pub type Handler = Arc<dyn Fn(Parameters) -> WaymarkResult<DispatchOutcome> + Send + Sync>;

/// A [`Container`] backed by an identifier-to-closure map.
///
/// # Examples
///
/// ```
/// use waymark_http::container::{Container, DispatchOutcome, HandlerRegistry};
/// use waymark_http::urls::params::Parameters;
///
/// let mut registry = HandlerRegistry::new();
/// registry.bind("showPost", |params: Parameters| {
///     Ok(format!("post {}", params.get_str("id").unwrap_or("?")).into())
/// });
///
/// let params: Parameters = [("id", "42")].into_iter().collect();
/// match registry.call("showPost", params).unwrap() {
///     DispatchOutcome::Raw(body) => assert_eq!(body, "post 42"),
///     DispatchOutcome::Response(_) => unreachable!(),
/// }
/// ```
#[derive(Default, Clone)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Handler>,
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut identifiers: Vec<_> = self.handlers.keys().collect();
        identifiers.sort();
        f.debug_struct("HandlerRegistry")
            .field("identifiers", &identifiers)
            .finish()
    }
}

impl HandlerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `handler` to `identifier`, replacing any previous binding.
    pub fn bind<F>(&mut self, identifier: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(Parameters) -> WaymarkResult<DispatchOutcome> + Send + Sync + 'static,
    {
        self.handlers.insert(identifier.into(), Arc::new(handler));
        self
    }

    /// Returns `true` if something is bound to `identifier`.
    pub fn is_bound(&self, identifier: &str) -> bool {
        self.handlers.contains_key(identifier)
    }

    /// Returns the number of bound handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Container for HandlerRegistry {
    fn call(&self, identifier: &str, parameters: Parameters) -> WaymarkResult<DispatchOutcome> {
        let handler = self
            .handlers
            .get(identifier)
            .ok_or_else(|| WaymarkError::UnboundHandler(identifier.to_string()))?;
        handler(parameters)
    }
}
