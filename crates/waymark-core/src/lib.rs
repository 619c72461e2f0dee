//! # waymark-core
//!
//! Core types for the waymark routing engine. This crate has no routing logic
//! of its own; it provides the foundation the routing crate builds on.
//!
//! ## Modules
//!
//! - [`error`] - Error taxonomy and result alias
//! - [`settings`] - The configuration store read by the generator and resolver
//! - [`settings_loader`] - Loading settings from TOML/JSON files and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{WaymarkError, WaymarkResult};
pub use settings::{ActionSettings, ControllerSettings, Settings, UrlSettings};
