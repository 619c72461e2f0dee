//! Request dispatch.
//!
//! The [`Dispatcher`] walks a [`RouteTable`] in order, stops at the first
//! route whose expression matches the path, works out which handler to call
//! and asks its [`Container`] to run it.

use std::fmt;
use std::sync::Arc;

use waymark_core::logging::dispatch_span;
use waymark_core::{Settings, WaymarkError, WaymarkResult};

use super::cache::ExpressionCache;
use super::params::Parameters;
use super::route::RouteDefinition;
use super::table::RouteTable;
use crate::container::{Container, DispatchOutcome};
use crate::request::HttpRequest;
use crate::response::HttpResponse;

/// Parameter holding the controller name for derived handler identifiers.
pub const CONTROLLER_PARAM: &str = "controller";

/// Parameter holding the action name for derived handler identifiers.
pub const ACTION_PARAM: &str = "action";

/// How handler identifiers are derived for routes without an explicit handler.
///
/// The identifier is `controller + controller_suffix + "@" + action + action_suffix`,
/// falling back to the defaults when a parameter is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerNaming {
    /// Controller used when the route captured none.
    pub controller_default: String,
    /// Appended to the controller name.
    pub controller_suffix: String,
    /// Action used when the route captured none.
    pub action_default: String,
    /// Appended to the action name.
    pub action_suffix: String,
}

impl Default for HandlerNaming {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl HandlerNaming {
    /// Reads the naming rules from the `controller` and `action` settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            controller_default: settings.controller.default.clone(),
            controller_suffix: settings.controller.suffix.clone(),
            action_default: settings.action.default.clone(),
            action_suffix: settings.action.suffix.clone(),
        }
    }

    /// Derives the handler identifier from matched parameters.
    ///
    /// ```
    /// use waymark_http::urls::dispatch::HandlerNaming;
    /// use waymark_http::urls::params::Parameters;
    ///
    /// let naming = HandlerNaming::default();
    /// let params: Parameters = [("controller", "blog")].into_iter().collect();
    /// assert_eq!(naming.identifier(&params), "blogController@indexAction");
    /// ```
    pub fn identifier(&self, parameters: &Parameters) -> String {
        let controller = parameters
            .get_str(CONTROLLER_PARAM)
            .unwrap_or(self.controller_default.as_str());
        let action = parameters
            .get_str(ACTION_PARAM)
            .unwrap_or(self.action_default.as_str());
        format!(
            "{controller}{}@{action}{}",
            self.controller_suffix, self.action_suffix
        )
    }
}

/// The result of route selection.
#[derive(Debug, Clone)]
pub struct ResolvedRoute {
    /// The matched route, carrying its full match state.
    pub route: RouteDefinition,
    /// The handler identifier to invoke.
    pub identifier: String,
    /// The named parameters passed to the handler, without `controller` and
    /// `action`.
    pub parameters: Parameters,
}

/// Resolves paths against a route table and invokes the matching handler.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use waymark_http::container::HandlerRegistry;
/// use waymark_http::urls::dispatch::{Dispatcher, HandlerNaming};
/// use waymark_http::urls::params::Parameters;
/// use waymark_http::urls::table::RouteTable;
/// use waymark_http::HttpResponse;
///
/// let table = RouteTable::new().route(r"post/<id:\d+>", Some("showPost"));
/// let mut registry = HandlerRegistry::new();
/// registry.bind("showPost", |p: Parameters| {
///     Ok(format!("post {}", p.get_str("id").unwrap_or_default()).into())
/// });
///
/// let dispatcher = Dispatcher::new(Arc::new(table), Arc::new(registry), HandlerNaming::default());
/// let response = dispatcher.resolve("post/42", HttpResponse::default()).unwrap();
/// assert_eq!(response.body(), "post 42");
///
/// let err = dispatcher.resolve("post/abc", HttpResponse::default()).unwrap_err();
/// assert!(err.is_not_found());
/// ```
#[derive(Clone)]
pub struct Dispatcher {
    table: Arc<RouteTable>,
    container: Arc<dyn Container>,
    naming: HandlerNaming,
    cache: Option<Arc<ExpressionCache>>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("table", &self.table)
            .field("naming", &self.naming)
            .field("cached", &self.cache.is_some())
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Creates a dispatcher that compiles each route expression afresh on
    /// every lookup.
    pub fn new(table: Arc<RouteTable>, container: Arc<dyn Container>, naming: HandlerNaming) -> Self {
        Self {
            table,
            container,
            naming,
            cache: None,
        }
    }

    /// Compiles route expressions through `cache` instead.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<ExpressionCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Returns the route table.
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Returns the handler naming rules.
    pub const fn naming(&self) -> &HandlerNaming {
        &self.naming
    }

    /// Selects the first route matching `path` without invoking anything.
    ///
    /// # Errors
    ///
    /// - [`WaymarkError::NotFound`] if no route matches.
    /// - Compilation errors for an invalid expression reached before a match.
    pub fn find(&self, path: &str) -> WaymarkResult<ResolvedRoute> {
        for entry in self.table.iter() {
            let mut route = self.route_for(&entry.expression)?;

            if !route.matches_path(path) {
                tracing::trace!(expression = %entry.expression, "route did not match");
                continue;
            }

            let mut parameters = route.parameters().clone();
            let identifier = match &entry.handler {
                Some(handler) => handler.clone(),
                None => self.naming.identifier(&parameters),
            };
            parameters.remove(CONTROLLER_PARAM);
            parameters.remove(ACTION_PARAM);

            tracing::debug!(
                expression = %entry.expression,
                handler = %identifier,
                "route matched"
            );

            return Ok(ResolvedRoute {
                route,
                identifier,
                parameters,
            });
        }

        tracing::debug!(path, "no route matched");
        Err(WaymarkError::NotFound(path.to_string()))
    }

    /// Dispatches `path` and returns the handler's response.
    ///
    /// A handler returning [`DispatchOutcome::Raw`] has its text appended to
    /// `response`, which is then returned.
    ///
    /// # Errors
    ///
    /// [`WaymarkError::NotFound`] when nothing matches, plus anything the
    /// container or handler reports.
    pub fn resolve(&self, path: &str, mut response: HttpResponse) -> WaymarkResult<HttpResponse> {
        let span = dispatch_span(path);
        let _guard = span.enter();

        let resolved = self.find(path)?;
        match self.container.call(&resolved.identifier, resolved.parameters)? {
            DispatchOutcome::Response(handled) => Ok(handled),
            DispatchOutcome::Raw(raw) => {
                response.write(&raw);
                Ok(response)
            }
        }
    }

    /// Dispatches an HTTP request by its path, without the leading `/`.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::resolve`].
    pub fn handle(&self, request: &HttpRequest, response: HttpResponse) -> WaymarkResult<HttpResponse> {
        self.resolve(request.route_path(), response)
    }

    fn route_for(&self, expression: &str) -> WaymarkResult<RouteDefinition> {
        match &self.cache {
            Some(cache) => Ok(RouteDefinition::from_compiled(
                cache.get_or_compile(expression)?,
                None,
            )),
            None => RouteDefinition::make(expression, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::HandlerRegistry;
    use http::StatusCode;

    fn echo_registry(identifiers: &[&str]) -> HandlerRegistry {
        let mut registry = HandlerRegistry::new();
        for identifier in identifiers {
            let name = (*identifier).to_string();
            registry.bind(*identifier, move |params: Parameters| {
                let args: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
                Ok(format!("{name}({})", args.join(",")).into())
            });
        }
        registry
    }

    fn dispatcher(table: RouteTable, registry: HandlerRegistry) -> Dispatcher {
        Dispatcher::new(Arc::new(table), Arc::new(registry), HandlerNaming::default())
    }

    #[test]
    fn test_naming_defaults() {
        let naming = HandlerNaming::default();
        assert_eq!(naming.controller_default, "index");
        assert_eq!(naming.controller_suffix, "Controller");
        assert_eq!(naming.action_default, "index");
        assert_eq!(naming.action_suffix, "Action");
        assert_eq!(naming.identifier(&Parameters::new()), "indexController@indexAction");
    }

    #[test]
    fn test_naming_from_settings() {
        let mut settings = Settings::default();
        settings.controller.suffix = "Ctl".into();
        settings.action.default = "show".into();
        settings.action.suffix = String::new();

        let naming = HandlerNaming::from_settings(&settings);
        let params: Parameters = [("controller", "user")].into_iter().collect();
        assert_eq!(naming.identifier(&params), "userCtl@show");
    }

    #[test]
    fn test_explicit_handler() {
        let d = dispatcher(
            RouteTable::new().route(r"post/<id:\d+>", Some("showPost")),
            echo_registry(&["showPost"]),
        );
        let response = d.resolve("post/42", HttpResponse::default()).unwrap();
        assert_eq!(response.body(), "showPost(id=42)");
    }

    #[test]
    fn test_derived_handler_strips_controller_and_action() {
        let d = dispatcher(
            RouteTable::new().route("<controller>/<action>/<id>", None),
            echo_registry(&["blogController@editAction"]),
        );
        let resolved = d.find("blog/edit/7").unwrap();
        assert_eq!(resolved.identifier, "blogController@editAction");
        assert_eq!(resolved.parameters.len(), 1);
        assert_eq!(resolved.parameters.get_str("id"), Some("7"));
        // The route keeps the full match state.
        assert_eq!(resolved.route.parameters().get_str("controller"), Some("blog"));
    }

    #[test]
    fn test_explicit_handler_still_strips_controller_and_action() {
        let d = dispatcher(
            RouteTable::new().route("<controller>/<id>", Some("generic")),
            echo_registry(&["generic"]),
        );
        let response = d.resolve("blog/3", HttpResponse::default()).unwrap();
        assert_eq!(response.body(), "generic(id=3)");
    }

    #[test]
    fn test_first_match_wins() {
        let d = dispatcher(
            RouteTable::new()
                .route("a/<x>", Some("loose"))
                .route(r"a/<x:\d+>", Some("strict")),
            echo_registry(&["loose", "strict"]),
        );
        assert_eq!(d.find("a/1").unwrap().identifier, "loose");
    }

    #[test]
    fn test_falls_through_to_later_routes() {
        let d = dispatcher(
            RouteTable::new()
                .route(r"a/<x:\d+>", Some("numeric"))
                .route("a/<x>", Some("any")),
            echo_registry(&["numeric", "any"]),
        );
        assert_eq!(d.find("a/1").unwrap().identifier, "numeric");
        assert_eq!(d.find("a/b").unwrap().identifier, "any");
    }

    #[test]
    fn test_not_found() {
        let d = dispatcher(
            RouteTable::new().route(r"post/<id:\d+>", Some("showPost")),
            echo_registry(&["showPost"]),
        );
        let err = d.resolve("post/abc", HttpResponse::default()).unwrap_err();
        assert!(matches!(err, WaymarkError::NotFound(ref p) if p == "post/abc"));
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn test_empty_table_not_found() {
        let d = dispatcher(RouteTable::new(), HandlerRegistry::new());
        assert!(d.find("").unwrap_err().is_not_found());
    }

    #[test]
    fn test_unbound_handler_propagates() {
        let d = dispatcher(RouteTable::new().route("about", None), HandlerRegistry::new());
        let err = d.resolve("about", HttpResponse::default()).unwrap_err();
        assert!(matches!(
            err,
            WaymarkError::UnboundHandler(ref id) if id == "indexController@indexAction"
        ));
    }

    #[test]
    fn test_invalid_expression_propagates() {
        let d = dispatcher(RouteTable::new().route("<a>/<a>", None), HandlerRegistry::new());
        assert!(matches!(
            d.find("x/y").unwrap_err(),
            WaymarkError::DuplicateParameter { .. }
        ));
    }

    #[test]
    fn test_raw_outcome_written_into_supplied_response() {
        let d = dispatcher(
            RouteTable::new().route("about", Some("about")),
            echo_registry(&["about"]),
        );
        let mut supplied = HttpResponse::ok("<header>");
        supplied.set_status(StatusCode::ACCEPTED);

        let response = d.resolve("about", supplied).unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(response.body(), "<header>about()");
    }

    #[test]
    fn test_response_outcome_returned_as_is() {
        let mut registry = HandlerRegistry::new();
        registry.bind("gone", |_| Ok(HttpResponse::new(StatusCode::GONE, "bye").into()));
        let d = dispatcher(RouteTable::new().route("old", Some("gone")), registry);

        let response = d.resolve("old", HttpResponse::ok("ignored")).unwrap();
        assert_eq!(response.status(), StatusCode::GONE);
        assert_eq!(response.body(), "bye");
    }

    #[test]
    fn test_handle_strips_leading_slash() {
        let d = dispatcher(
            RouteTable::new().route(r"post/<id:\d+>", Some("showPost")),
            echo_registry(&["showPost"]),
        );
        let request = HttpRequest::builder().path("/post/5").build();
        let response = d.handle(&request, HttpResponse::default()).unwrap();
        assert_eq!(response.body(), "showPost(id=5)");
    }

    #[test]
    fn test_with_cache_behaves_like_fresh_compile() {
        let cache = Arc::new(ExpressionCache::new());
        let d = dispatcher(
            RouteTable::new()
                .route(r"post/<id:\d+>", Some("showPost"))
                .route("<controller>/<action>", None),
            echo_registry(&["showPost", "blogController@listAction"]),
        )
        .with_cache(Arc::clone(&cache));

        for _ in 0..3 {
            let response = d.resolve("blog/list", HttpResponse::default()).unwrap();
            assert_eq!(response.body(), "blogController@listAction()");
        }
        assert_eq!(cache.len(), 2);
        assert!(d.find("post/x/y").unwrap_err().is_not_found());
    }

    #[test]
    fn test_dispatcher_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Dispatcher>();
    }
}
