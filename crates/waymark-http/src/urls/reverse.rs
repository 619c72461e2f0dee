//! Reverse URL generation.
//!
//! [`generate`] rebuilds a concrete path from a route and a set of parameter
//! values, the inverse of matching. Values that fill placeholders are consumed;
//! whatever is left becomes the query string.

use std::fmt;

use regex::Regex;
use std::sync::OnceLock;

use waymark_core::{UrlSettings, WaymarkError, WaymarkResult};

use super::params::{form_encode, ParamValue, Parameters};
use super::route::RouteDefinition;
use crate::request::HttpRequest;

/// A generated path plus its query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUrl {
    path: String,
    query: String,
}

impl GeneratedUrl {
    /// Returns the generated path, including the configured format suffix.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the query string without the leading `?` (may be empty).
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Re-bases the URL on the scheme and host of `request`, producing an
    /// absolute location such as `https://example.com/post/42?ref=x`.
    pub fn absolute(&self, request: &HttpRequest) -> String {
        request.build_absolute_uri(Some(&self.to_string()))
    }
}

impl fmt::Display for GeneratedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.query.is_empty() {
            f.write_str(&self.path)
        } else {
            write!(f, "{}?{}", self.path, self.query)
        }
    }
}

fn separator_runs() -> &'static Regex {
    static RUNS: OnceLock<Regex> = OnceLock::new();
    RUNS.get_or_init(|| Regex::new("/+").expect("separator regex is valid"))
}

/// Generates a URL for `route` using `expression` and `parameters`.
///
/// If `expression` differs from the route's current expression the route is
/// recompiled first. Each declared parameter is filled, in declaration order,
/// from `parameters` (validated against its rule and percent-encoded when
/// `settings.encode` is set) or else from the route's last match. Runs of `/`
/// are collapsed, one trailing `/` is stripped and `settings.format` is
/// appended. Unused parameters become the query string.
///
/// # Errors
///
/// - [`WaymarkError::ParameterValidation`] if a supplied value is a list or
///   fails its rule.
/// - [`WaymarkError::MissingParameter`] if a parameter has neither a supplied
///   value nor a matched one.
/// - Compilation errors when recompiling.
///
/// # Examples
///
/// ```
/// use waymark_core::UrlSettings;
/// use waymark_http::urls::params::Parameters;
/// use waymark_http::urls::reverse::generate;
/// use waymark_http::urls::route::RouteDefinition;
///
/// let mut route = RouteDefinition::make(r"post/<id:\d+>", None).unwrap();
/// let mut params = Parameters::new();
/// params.insert("id", 42);
/// params.insert("ref", "x");
///
/// let settings = UrlSettings { encode: true, format: ".html".to_string() };
/// let url = generate(&mut route, r"post/<id:\d+>", params, &settings).unwrap();
/// assert_eq!(url.to_string(), "post/42.html?ref=x");
/// ```
pub fn generate(
    route: &mut RouteDefinition,
    expression: &str,
    mut parameters: Parameters,
    settings: &UrlSettings,
) -> WaymarkResult<GeneratedUrl> {
    route.recompile(expression)?;

    let mut values: Vec<(&str, String)> = Vec::with_capacity(route.rules().len());

    for rule in route.rules() {
        let name = rule.name();

        if let Some(supplied) = parameters.get(name) {
            let value = match supplied {
                ParamValue::Scalar(s) if rule.accepts(s) => s,
                _ => {
                    return Err(WaymarkError::ParameterValidation {
                        name: name.to_string(),
                        rule: rule.rule().unwrap_or_default().to_string(),
                    });
                }
            };

            let value = if settings.encode {
                form_encode(value)
            } else {
                value.clone()
            };
            values.push((name, value));
            parameters.remove(name);
            continue;
        }

        if let Some(matched) = route.parameters().get(name) {
            values.push((name, matched.to_string()));
            continue;
        }

        return Err(WaymarkError::MissingParameter {
            name: name.to_string(),
        });
    }

    let raw = route.template().map_or_else(
        || route.expression().to_string(),
        |template| substitute(template, &values),
    );

    let collapsed = separator_runs().replace_all(&raw, "/");
    let trimmed = collapsed.strip_suffix('/').unwrap_or(&collapsed);
    let path = format!("{trimmed}{}", settings.format);

    tracing::trace!(route = route.name(), path = %path, "generated url");

    Ok(GeneratedUrl {
        path,
        query: parameters.to_query_string(),
    })
}

/// Replaces each `<name>` in `template` with its value, in a single pass so
/// substituted text is never rescanned.
fn substitute(template: &str, values: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        let replaced = values.iter().find_map(|(name, value)| {
            let token_len = name.len() + 2;
            let is_token = tail.len() >= token_len
                && tail.as_bytes()[token_len - 1] == b'>'
                && &tail[1..token_len - 1] == *name;
            is_token.then_some((value, token_len))
        });

        match replaced {
            Some((value, len)) => {
                out.push_str(value);
                rest = &tail[len..];
            }
            None => {
                out.push('<');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}
