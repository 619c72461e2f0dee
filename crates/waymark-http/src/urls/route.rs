//! Route definitions and path matching.
//!
//! A [`RouteDefinition`] pairs a compiled expression with the state of its
//! last successful match. Routes are cheap to build and are meant to be
//! created per match attempt and owned by whoever created them.

use std::sync::Arc;

use regex::Regex;

use waymark_core::WaymarkResult;

use super::compiler::{compile, CompiledExpression, ParameterRule};
use super::params::Parameters;

/// A named route built from a route expression.
///
/// # Examples
///
/// ```
/// use waymark_http::urls::params::Parameters;
/// use waymark_http::urls::route::RouteDefinition;
///
/// let mut route = RouteDefinition::make(r"post/<id:\d+>", None).unwrap();
/// assert_eq!(route.name(), r"post/<id:\d+>");
///
/// assert!(route.matches_path("post/42"));
/// assert_eq!(route.parameters().get_str("id"), Some("42"));
/// assert!(!route.matches_path("post/abc"));
/// ```
#[derive(Debug, Clone)]
pub struct RouteDefinition {
    name: String,
    compiled: Arc<CompiledExpression>,
    parameters: Parameters,
    captures: Vec<String>,
}

impl RouteDefinition {
    /// Compiles `expression` into a new route. The name defaults to the
    /// expression itself.
    ///
    /// # Errors
    ///
    /// Propagates compilation errors, see [`compile`].
    pub fn make(expression: &str, name: Option<&str>) -> WaymarkResult<Self> {
        Ok(Self::from_compiled(Arc::new(compile(expression)?), name))
    }

    /// Builds a route around an already compiled expression.
    pub fn from_compiled(compiled: Arc<CompiledExpression>, name: Option<&str>) -> Self {
        let name = name.map_or_else(|| compiled.expression().to_string(), String::from);
        Self {
            name,
            compiled,
            parameters: Parameters::new(),
            captures: Vec::new(),
        }
    }

    /// Returns the route name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the current route expression.
    pub fn expression(&self) -> &str {
        self.compiled.expression()
    }

    /// Returns the compiled expression.
    pub fn compiled(&self) -> &CompiledExpression {
        &self.compiled
    }

    /// Returns the anchored match pattern.
    pub fn pattern(&self) -> &Regex {
        self.compiled.pattern()
    }

    /// Returns the reverse-generation template, `None` for literal routes.
    pub fn template(&self) -> Option<&str> {
        self.compiled.template()
    }

    /// Returns the declared parameters in declaration order.
    pub fn rules(&self) -> &[ParameterRule] {
        self.compiled.rules()
    }

    /// Returns the named parameters captured by the last successful match.
    pub const fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Returns the positional captures of the last successful match. Index 0
    /// is the whole match; groups that did not participate are empty.
    pub fn captures(&self) -> &[String] {
        &self.captures
    }

    /// Consumes the route, returning its matched named parameters.
    pub fn into_parameters(self) -> Parameters {
        self.parameters
    }

    /// Switches the route to a different expression, keeping its name and
    /// match state. Does nothing when the expression is unchanged.
    ///
    /// # Errors
    ///
    /// Propagates compilation errors, see [`compile`].
    pub fn recompile(&mut self, expression: &str) -> WaymarkResult<()> {
        if expression != self.expression() {
            self.compiled = Arc::new(compile(expression)?);
        }
        Ok(())
    }

    /// Tests `path` against the route.
    ///
    /// On a match, every named group that captured an empty string and has an
    /// entry in `defaults` takes the default value instead, and the captured
    /// values replace the previous match state. On a miss nothing changes.
    pub fn matches(&mut self, path: &str, defaults: &Parameters) -> bool {
        let pattern = self.compiled.pattern();
        let Some(caps) = pattern.captures(path) else {
            return false;
        };

        let mut parameters = Parameters::new();
        for name in pattern.capture_names().flatten() {
            if let Some(m) = caps.name(name) {
                parameters.insert(name, m.as_str());
            }
        }

        for (name, value) in defaults.iter() {
            if parameters.get_str(name) == Some("") {
                parameters.insert(name, value.clone());
            }
        }

        self.captures = caps
            .iter()
            .map(|m| m.map_or_else(String::new, |m| m.as_str().to_string()))
            .collect();
        self.parameters = parameters;
        true
    }

    /// Tests `path` against the route without defaults.
    pub fn matches_path(&mut self, path: &str) -> bool {
        self.matches(path, &Parameters::new())
    }
}
