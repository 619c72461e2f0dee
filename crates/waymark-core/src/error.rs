//! Core error types for the waymark routing engine.
//!
//! [`WaymarkError`] covers every failure the routing core can raise: compile-time
//! expression errors, reverse-generation errors, dispatch misses, handler
//! container errors and configuration errors.

use thiserror::Error;

/// The primary error type for waymark.
///
/// None of these errors is retried or recovered inside the routing core. They
/// propagate to the caller, which decides how to present them. Only
/// [`WaymarkError::NotFound`] is expected to be turned into a user-facing
/// response; see [`WaymarkError::status_code`].
#[derive(Error, Debug)]
pub enum WaymarkError {
    // ── Expression compilation ───────────────────────────────────────

    /// The same parameter name is declared twice in one route expression.
    #[error("Cannot redeclare route parameter \"{name}\" in expression \"{expression}\"")]
    DuplicateParameter {
        /// The repeated parameter name.
        name: String,
        /// The expression that declared it twice.
        expression: String,
    },

    /// A route expression produced a pattern the regex engine rejected.
    #[error("Invalid route pattern for \"{expression}\": {message}")]
    InvalidPattern {
        /// The offending route expression.
        expression: String,
        /// The regex engine's error message.
        message: String,
    },

    // ── Reverse generation ───────────────────────────────────────────

    /// A supplied value does not conform to its parameter rule, or is not a
    /// scalar value.
    #[error("Value does not conform to the rule \"{rule}\" of parameter \"{name}\"")]
    ParameterValidation {
        /// The parameter name.
        name: String,
        /// The declared rule, or an empty string when none was declared.
        rule: String,
    },

    /// No value was supplied for a parameter and no matched value is available.
    #[error("Missing the route parameter \"{name}\"")]
    MissingParameter {
        /// The parameter name.
        name: String,
    },

    // ── Dispatch ─────────────────────────────────────────────────────

    /// No route table entry matches the request path.
    #[error("Not found: no route matches '{0}'")]
    NotFound(String),

    /// The handler container has nothing bound to the derived identifier.
    #[error("No handler bound to '{0}'")]
    UnboundHandler(String),

    /// A handler ran but failed.
    #[error("Handler '{identifier}' failed: {message}")]
    HandlerFailed {
        /// The handler identifier.
        identifier: String,
        /// A description of the failure.
        message: String,
    },

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value or definition file is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl WaymarkError {
    /// Returns the HTTP status code associated with this error.
    ///
    /// - `NotFound` -> 404
    /// - Everything else -> 500
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::DuplicateParameter { .. }
            | Self::InvalidPattern { .. }
            | Self::ParameterValidation { .. }
            | Self::MissingParameter { .. }
            | Self::UnboundHandler(_)
            | Self::HandlerFailed { .. }
            | Self::ConfigurationError(_)
            | Self::IoError(_) => 500,
        }
    }

    /// Returns `true` for the dispatch miss error.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// A convenience type alias for `Result<T, WaymarkError>`.
pub type WaymarkResult<T> = Result<T, WaymarkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(WaymarkError::NotFound("x".into()).status_code(), 404);
        assert_eq!(
            WaymarkError::DuplicateParameter {
                name: "id".into(),
                expression: "<id>/<id>".into(),
            }
            .status_code(),
            500
        );
        assert_eq!(
            WaymarkError::MissingParameter { name: "id".into() }.status_code(),
            500
        );
        assert_eq!(WaymarkError::UnboundHandler("x".into()).status_code(), 500);
        assert_eq!(WaymarkError::ConfigurationError("x".into()).status_code(), 500);
    }

    #[test]
    fn test_is_not_found() {
        assert!(WaymarkError::NotFound("post/abc".into()).is_not_found());
        assert!(!WaymarkError::UnboundHandler("x".into()).is_not_found());
    }

    #[test]
    fn test_display() {
        let err = WaymarkError::DuplicateParameter {
            name: "id".into(),
            expression: "post/<id>/<id>".into(),
        };
        assert_eq!(
            err.to_string(),
            "Cannot redeclare route parameter \"id\" in expression \"post/<id>/<id>\""
        );

        let err = WaymarkError::ParameterValidation {
            name: "id".into(),
            rule: r"\d+".into(),
        };
        assert!(err.to_string().contains(r#"rule "\d+" of parameter "id""#));

        let err = WaymarkError::NotFound("post/abc".into());
        assert_eq!(err.to_string(), "Not found: no route matches 'post/abc'");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "routes missing");
        let err: WaymarkError = io_err.into();
        assert_eq!(err.status_code(), 500);
        assert!(err.to_string().contains("routes missing"));
    }
}
