//! Settings for the waymark routing engine.
//!
//! [`Settings`] is the configuration store read by the reverse generator and the
//! dispatch resolver. It is passed explicitly to whoever needs it; there is no
//! process-wide instance.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Options used when generating URLs from routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlSettings {
    /// Whether substituted parameter values are percent-encoded.
    pub encode: bool,
    /// A suffix appended to every generated path (e.g. `".html"`).
    pub format: String,
}

impl Default for UrlSettings {
    fn default() -> Self {
        Self {
            encode: true,
            format: String::new(),
        }
    }
}

/// Naming conventions for the controller half of a handler identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerSettings {
    /// Controller name used when a match carries no `controller` parameter.
    pub default: String,
    /// Suffix appended to the controller name.
    pub suffix: String,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            default: "index".to_string(),
            suffix: "Controller".to_string(),
        }
    }
}

/// Naming conventions for the action half of a handler identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionSettings {
    /// Action name used when a match carries no `action` parameter.
    pub default: String,
    /// Suffix appended to the action name.
    pub suffix: String,
}

impl Default for ActionSettings {
    fn default() -> Self {
        Self {
            default: "index".to_string(),
            suffix: "Action".to_string(),
        }
    }
}

/// The complete set of waymark settings.
///
/// # Examples
///
/// ```
/// use waymark_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.url.encode);
/// assert_eq!(settings.controller.suffix, "Controller");
/// assert_eq!(settings.get("action.suffix"), Some(serde_json::json!("Action")));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Whether debug mode is enabled.
    pub debug: bool,

    // ── Logging ──────────────────────────────────────────────────────

    /// The log filter directive (e.g. "info", "waymark_http=debug").
    pub log_level: String,

    // ── Routing ──────────────────────────────────────────────────────

    /// URL generation options (`url.encode`, `url.format`).
    pub url: UrlSettings,
    /// Controller naming (`controller.default`, `controller.suffix`).
    pub controller: ControllerSettings,
    /// Action naming (`action.default`, `action.suffix`).
    pub action: ActionSettings,

    // ── Escape hatch ─────────────────────────────────────────────────

    /// Custom settings that don't fit into the above categories.
    pub extra: HashMap<String, serde_json::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            log_level: "info".to_string(),
            url: UrlSettings::default(),
            controller: ControllerSettings::default(),
            action: ActionSettings::default(),
            extra: HashMap::new(),
        }
    }
}

impl Settings {
    /// Looks up a setting by dotted key, e.g. `"url.format"`.
    ///
    /// Typed fields are searched first, then [`extra`](Self::extra), where the
    /// first segment names the entry and the rest walks into nested objects.
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        let mut root = serde_json::to_value(self).ok()?;
        if let Some(obj) = root.as_object_mut() {
            obj.remove("extra");
        }

        lookup(&root, key).or_else(|| {
            let (head, rest) = key.split_once('.').map_or((key, None), |(h, r)| (h, Some(r)));
            let value = self.extra.get(head)?;
            rest.map_or_else(|| Some(value.clone()), |rest| lookup(value, rest))
        })
    }

    /// Looks up a setting by dotted key, falling back to `default`.
    pub fn get_or(&self, key: &str, default: serde_json::Value) -> serde_json::Value {
        self.get(key).unwrap_or(default)
    }
}

fn lookup(value: &serde_json::Value, dotted: &str) -> Option<serde_json::Value> {
    dotted
        .split('.')
        .try_fold(value, |current, segment| current.get(segment))
        .cloned()
}
