//! Route expressions, matching and dispatch.
//!
//! - [`compiler`]: compiles route expressions into patterns and templates
//! - [`route`]: named routes and path matching
//! - [`reverse`]: reverse URL generation from parameter values
//! - [`table`]: ordered route tables, loadable from TOML or JSON
//! - [`dispatch`]: first-match-wins resolution and handler invocation
//! - [`cache`]: memoized compilation shared across dispatches
//! - [`params`]: the ordered parameter map used throughout
//!
//! # Examples
//!
//! ```
//! use waymark_core::UrlSettings;
//! use waymark_http::urls::params::Parameters;
//! use waymark_http::urls::reverse::generate;
//! use waymark_http::urls::route::RouteDefinition;
//!
//! // Forward matching
//! let mut route = RouteDefinition::make(r"post/<id:\d+>", None).unwrap();
//! assert!(route.matches_path("post/42"));
//! assert_eq!(route.parameters().get_str("id"), Some("42"));
//!
//! // Reverse generation
//! let mut params = Parameters::new();
//! params.insert("id", 7);
//! let url = generate(&mut route, r"post/<id:\d+>", params, &UrlSettings::default()).unwrap();
//! assert_eq!(url.to_string(), "post/7");
//! ```

pub mod cache;
pub mod compiler;
pub mod dispatch;
pub mod params;
pub mod reverse;
pub mod route;
pub mod table;
