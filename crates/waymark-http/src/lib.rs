//! # waymark-http
//!
//! The routing layer of waymark. Provides request and response shapes, route
//! expression compilation, path matching, reverse URL generation and
//! first-match-wins dispatch to a handler [`Container`](container::Container).

pub mod container;
pub mod request;
pub mod response;
pub mod urls;

pub use request::HttpRequest;
pub use response::HttpResponse;
