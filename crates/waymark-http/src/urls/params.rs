//! Route parameter maps.
//!
//! [`Parameters`] is the ordered name/value map that flows through matching,
//! dispatch and reverse generation. Order matters: it is the declaration order
//! of captured parameters and the serialization order of leftover query-string
//! parameters.

use std::fmt;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters escaped by form-style encoding: everything except ASCII
/// alphanumerics and `-`, `_`, `.`. Spaces are handled separately.
const FORM: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

/// A single parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// A scalar value.
    Scalar(String),
    /// A list of values. Lists never fill a path placeholder.
    List(Vec<String>),
}

impl ParamValue {
    /// Returns the scalar value, or `None` for lists.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            Self::List(_) => None,
        }
    }

    /// Returns `true` for scalar values.
    pub const fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(s) => f.write_str(s),
            Self::List(items) => f.write_str(&items.join(",")),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        Self::Scalar(value.clone())
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(values: Vec<&str>) -> Self {
        Self::List(values.into_iter().map(String::from).collect())
    }
}

macro_rules! scalar_from_display {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ParamValue {
                fn from(value: $t) -> Self {
                    Self::Scalar(value.to_string())
                }
            }
        )*
    };
}

scalar_from_display!(i32, i64, u32, u64, usize, bool);

/// An insertion-ordered map of parameter names to values with unique keys.
///
/// # Examples
///
/// ```
/// use waymark_http::urls::params::Parameters;
///
/// let mut params = Parameters::new();
/// params.insert("id", 42);
/// params.insert("ref", "x y");
///
/// assert_eq!(params.get_str("id"), Some("42"));
/// assert_eq!(params.to_query_string(), "id=42&ref=x+y");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters {
    entries: Vec<(String, ParamValue)>,
}

impl Parameters {
    /// Creates an empty parameter map.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Inserts a value, replacing an existing value in place so the key keeps
    /// its original position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Returns the value for `name`.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find_map(|(k, v)| (k == name).then_some(v))
    }

    /// Returns the value for `name` if it is a scalar.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ParamValue::as_scalar)
    }

    /// Removes `name`, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<ParamValue> {
        let index = self.entries.iter().position(|(k, _)| k == name)?;
        Some(self.entries.remove(index).1)
    }

    /// Returns `true` if `name` is present.
    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == name)
    }

    /// Returns the number of parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates over names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Serializes the parameters as a form-encoded query string, preserving
    /// insertion order. List values expand to `name[0]=a&name[1]=b`.
    pub fn to_query_string(&self) -> String {
        let mut parts = Vec::with_capacity(self.entries.len());

        for (name, value) in &self.entries {
            match value {
                ParamValue::Scalar(s) => {
                    parts.push(format!("{}={}", form_encode(name), form_encode(s)));
                }
                ParamValue::List(items) => {
                    for (index, item) in items.iter().enumerate() {
                        let key = format!("{name}[{index}]");
                        parts.push(format!("{}={}", form_encode(&key), form_encode(item)));
                    }
                }
            }
        }

        parts.join("&")
    }
}

impl<K, V> FromIterator<(K, V)> for Parameters
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

impl IntoIterator for Parameters {
    type Item = (String, ParamValue);
    type IntoIter = std::vec::IntoIter<(String, ParamValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Form-style percent-encoding: spaces become `+`, everything outside
/// `[A-Za-z0-9._-]` becomes `%XX`.
pub fn form_encode(input: &str) -> String {
    input
        .split(' ')
        .map(|part| utf8_percent_encode(part, FORM).to_string())
        .collect::<Vec<_>>()
        .join("+")
}
