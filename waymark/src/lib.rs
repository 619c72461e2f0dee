//! # waymark
//!
//! A path-routing engine: compact route expressions such as `post/<id:\d+>`
//! compile to anchored patterns, match request paths, regenerate URLs from
//! parameter values and dispatch to handlers in first-match-wins order.
//!
//! This is the meta-crate that re-exports the sub-crates. Depend on `waymark`
//! for everything, or on the individual crates for finer-grained control.
//!
//! # Examples
//!
//! ```
//! # #[cfg(feature = "http")]
//! # {
//! use std::sync::Arc;
//! use waymark::prelude::*;
//!
//! let settings = Settings::default();
//! let table = RouteTable::new().route("<controller>/<action>", None);
//!
//! let mut registry = HandlerRegistry::new();
//! registry.bind("blogController@listAction", |_| Ok("posts".into()));
//!
//! let dispatcher = Dispatcher::new(
//!     Arc::new(table),
//!     Arc::new(registry),
//!     HandlerNaming::from_settings(&settings),
//! );
//! let response = dispatcher.resolve("blog/list", HttpResponse::default()).unwrap();
//! assert_eq!(response.body(), "posts");
//! # }
//! ```

/// Error types, settings, settings loading and logging setup.
pub use waymark_core as core;

/// Routing: request and response shapes, route expressions, matching,
/// reverse generation and dispatch.
#[cfg(feature = "http")]
pub use waymark_http as http;

// Third-party re-exports for user convenience
pub use serde;
pub use serde_json;
pub use tracing;
pub use tracing_subscriber;

/// The commonly used types in one import.
pub mod prelude {
    pub use waymark_core::logging::setup_logging;
    pub use waymark_core::{Settings, WaymarkError, WaymarkResult};

    #[cfg(feature = "http")]
    pub use waymark_http::container::{Container, DispatchOutcome, HandlerRegistry};
    #[cfg(feature = "http")]
    pub use waymark_http::urls::dispatch::{Dispatcher, HandlerNaming};
    #[cfg(feature = "http")]
    pub use waymark_http::urls::params::{ParamValue, Parameters};
    #[cfg(feature = "http")]
    pub use waymark_http::urls::reverse::generate;
    #[cfg(feature = "http")]
    pub use waymark_http::urls::route::RouteDefinition;
    #[cfg(feature = "http")]
    pub use waymark_http::urls::table::RouteTable;
    #[cfg(feature = "http")]
    pub use waymark_http::{HttpRequest, HttpResponse};
}
