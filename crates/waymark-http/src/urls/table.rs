//! The ordered route table.
//!
//! Entry order is match priority. A table is built once, either in code or
//! from a TOML/JSON definition file, and then shared read-only behind an
//! `Arc`.
//!
//! ```toml
//! [[routes]]
//! expression = "post/<id:\\d+>"
//! handler = "showPost"
//!
//! [[routes]]
//! expression = "<controller>/<action>"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use waymark_core::{WaymarkError, WaymarkResult};

/// One route: an expression and an optional explicit handler identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTableEntry {
    /// The route expression.
    pub expression: String,
    /// The handler identifier. When absent, the identifier is derived from
    /// the `controller` and `action` parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,
}

impl RouteTableEntry {
    /// Creates an entry.
    pub fn new(expression: impl Into<String>, handler: Option<&str>) -> Self {
        Self {
            expression: expression.into(),
            handler: handler.map(String::from),
        }
    }
}

/// An ordered list of routes.
///
/// # Examples
///
/// ```
/// use waymark_http::urls::table::RouteTable;
///
/// let table = RouteTable::new()
///     .route(r"post/<id:\d+>", Some("showPost"))
///     .route("<controller>/<action>", None);
///
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.entries()[0].handler.as_deref(), Some("showPost"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTable {
    #[serde(default)]
    routes: Vec<RouteTableEntry>,
}

impl RouteTable {
    /// Creates an empty table.
    pub const fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Appends a route, builder style.
    #[must_use]
    pub fn route(mut self, expression: impl Into<String>, handler: Option<&str>) -> Self {
        self.push(RouteTableEntry::new(expression, handler));
        self
    }

    /// Appends an entry.
    pub fn push(&mut self, entry: RouteTableEntry) {
        self.routes.push(entry);
    }

    /// Returns the entries in priority order.
    pub fn entries(&self) -> &[RouteTableEntry] {
        &self.routes
    }

    /// Iterates over the entries in priority order.
    pub fn iter(&self) -> std::slice::Iter<'_, RouteTableEntry> {
        self.routes.iter()
    }

    /// Returns the number of routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if the table has no routes.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Loads a table from a TOML string with a `[[routes]]` array.
    ///
    /// # Errors
    ///
    /// Returns [`WaymarkError::ConfigurationError`] if the TOML is malformed.
    pub fn from_toml_str(toml_str: &str) -> WaymarkResult<Self> {
        toml::from_str(toml_str).map_err(|e| {
            WaymarkError::ConfigurationError(format!("Failed to parse route table TOML: {e}"))
        })
    }

    /// Loads a table from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`WaymarkError::ConfigurationError`] if the file cannot be read
    /// or is malformed.
    pub fn from_toml_file(path: impl AsRef<Path>) -> WaymarkResult<Self> {
        Self::from_toml_str(&read_table(path.as_ref(), "TOML")?)
    }

    /// Loads a table from a JSON string of the form `{"routes": [...]}`.
    ///
    /// # Errors
    ///
    /// Returns [`WaymarkError::ConfigurationError`] if the JSON is malformed.
    pub fn from_json_str(json_str: &str) -> WaymarkResult<Self> {
        serde_json::from_str(json_str).map_err(|e| {
            WaymarkError::ConfigurationError(format!("Failed to parse route table JSON: {e}"))
        })
    }

    /// Loads a table from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`WaymarkError::ConfigurationError`] if the file cannot be read
    /// or is malformed.
    pub fn from_json_file(path: impl AsRef<Path>) -> WaymarkResult<Self> {
        Self::from_json_str(&read_table(path.as_ref(), "JSON")?)
    }
}

impl<'a> IntoIterator for &'a RouteTable {
    type Item = &'a RouteTableEntry;
    type IntoIter = std::slice::Iter<'a, RouteTableEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<RouteTableEntry> for RouteTable {
    fn from_iter<I: IntoIterator<Item = RouteTableEntry>>(iter: I) -> Self {
        Self {
            routes: iter.into_iter().collect(),
        }
    }
}

fn read_table(path: &Path, kind: &str) -> WaymarkResult<String> {
    std::fs::read_to_string(path).map_err(|e| {
        WaymarkError::ConfigurationError(format!(
            "Failed to read route table {kind} file '{}': {e}",
            path.display()
        ))
    })
}
