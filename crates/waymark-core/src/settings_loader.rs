//! Settings loading from configuration files.
//!
//! This module loads [`Settings`] from TOML or JSON files and applies
//! environment variable overrides.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (deep-merged over the defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `WAYMARK_DEBUG` | `debug` |
//! | `WAYMARK_LOG_LEVEL` | `log_level` |
//! | `WAYMARK_URL_ENCODE` | `url.encode` |
//! | `WAYMARK_URL_FORMAT` | `url.format` |
//! | `WAYMARK_CONTROLLER_DEFAULT` | `controller.default` |
//! | `WAYMARK_CONTROLLER_SUFFIX` | `controller.suffix` |
//! | `WAYMARK_ACTION_DEFAULT` | `action.default` |
//! | `WAYMARK_ACTION_SUFFIX` | `action.suffix` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use waymark_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file("config/waymark.toml").unwrap();
//! let settings = settings_loader::from_json_file_with_env("config/waymark.json").unwrap();
//! ```

use std::path::Path;

use crate::error::WaymarkError;
use crate::settings::Settings;

/// Loads settings from a TOML string.
///
/// Keys absent from the TOML keep their default values, including keys inside
/// partially specified tables such as `[url]`.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or cannot be deserialized.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, WaymarkError> {
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| WaymarkError::ConfigurationError(format!("Failed to parse TOML: {e}")))?;

    merge_over_defaults(toml_to_json(toml_value), "TOML")
}

/// Loads settings from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, WaymarkError> {
    from_toml_str(&read_config(path.as_ref(), "TOML")?)
}

/// Loads settings from a TOML file and then applies environment variable overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, WaymarkError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a JSON string.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or cannot be deserialized.
pub fn from_json_str(json_str: &str) -> Result<Settings, WaymarkError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| WaymarkError::ConfigurationError(format!("Failed to parse JSON: {e}")))?;

    merge_over_defaults(json_value, "JSON")
}

/// Loads settings from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the JSON is malformed.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, WaymarkError> {
    from_json_str(&read_config(path.as_ref(), "JSON")?)
}

/// Loads settings from a JSON file and then applies environment variable overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the JSON is malformed.
pub fn from_json_file_with_env(path: impl AsRef<Path>) -> Result<Settings, WaymarkError> {
    let mut settings = from_json_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies environment variable overrides to a settings struct.
///
/// Boolean variables accept "true"/"1"/"yes" (case-insensitive) as true and
/// anything else as false.
pub fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(val) = std::env::var("WAYMARK_DEBUG") {
        settings.debug = parse_bool(&val);
    }

    if let Ok(val) = std::env::var("WAYMARK_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Ok(val) = std::env::var("WAYMARK_URL_ENCODE") {
        settings.url.encode = parse_bool(&val);
    }

    if let Ok(val) = std::env::var("WAYMARK_URL_FORMAT") {
        settings.url.format = val;
    }

    if let Ok(val) = std::env::var("WAYMARK_CONTROLLER_DEFAULT") {
        settings.controller.default = val;
    }

    if let Ok(val) = std::env::var("WAYMARK_CONTROLLER_SUFFIX") {
        settings.controller.suffix = val;
    }

    if let Ok(val) = std::env::var("WAYMARK_ACTION_DEFAULT") {
        settings.action.default = val;
    }

    if let Ok(val) = std::env::var("WAYMARK_ACTION_SUFFIX") {
        settings.action.suffix = val;
    }
}

// ============================================================
// Helpers
// ============================================================

fn parse_bool(val: &str) -> bool {
    matches!(val.to_lowercase().as_str(), "true" | "1" | "yes")
}

fn read_config(path: &Path, kind: &str) -> Result<String, WaymarkError> {
    std::fs::read_to_string(path).map_err(|e| {
        WaymarkError::ConfigurationError(format!(
            "Failed to read {kind} file '{}': {e}",
            path.display()
        ))
    })
}

fn merge_over_defaults(value: serde_json::Value, kind: &str) -> Result<Settings, WaymarkError> {
    let default_json = serde_json::to_value(Settings::default()).map_err(|e| {
        WaymarkError::ConfigurationError(format!("Failed to serialize default settings: {e}"))
    })?;

    let merged = merge_json(default_json, value);
    serde_json::from_value(merged).map_err(|e| {
        WaymarkError::ConfigurationError(format!("Failed to deserialize settings from {kind}: {e}"))
    })
}

/// Converts a TOML value to a `serde_json::Value`.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => {
            let map: serde_json::Map<String, serde_json::Value> = table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect();
            serde_json::Value::Object(map)
        }
    }
}

/// Deep-merges two JSON values. The `override_val` takes precedence.
fn merge_json(base: serde_json::Value, override_val: serde_json::Value) -> serde_json::Value {
    match (base, override_val) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(override_map)) => {
            for (key, override_v) in override_map {
                let merged = if let Some(base_v) = base_map.remove(&key) {
                    merge_json(base_v, override_v)
                } else {
                    override_v
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, override_val) => override_val,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── TOML loading ────────────────────────────────────────────────

    #[test]
    fn test_from_toml_str_basic() {
        let toml = r#"
            debug = false
            log_level = "waymark_http=debug"
        "#;

        let settings = from_toml_str(toml).unwrap();
        assert!(!settings.debug);
        assert_eq!(settings.log_level, "waymark_http=debug");
        // Defaults preserved
        assert!(settings.url.encode);
        assert_eq!(settings.controller.suffix, "Controller");
    }

    #[test]
    fn test_from_toml_str_partial_table() {
        let toml = r#"
            [url]
            format = ".html"

            [action]
            suffix = "Handler"
        "#;

        let settings = from_toml_str(toml).unwrap();
        assert_eq!(settings.url.format, ".html");
        assert!(settings.url.encode);
        assert_eq!(settings.action.suffix, "Handler");
        assert_eq!(settings.action.default, "index");
    }

    #[test]
    fn test_from_toml_str_extra() {
        let toml = r#"
            [extra.site]
            name = "blog"
        "#;

        let settings = from_toml_str(toml).unwrap();
        assert_eq!(settings.get("site.name"), Some(serde_json::json!("blog")));
    }

    #[test]
    fn test_from_toml_str_empty() {
        let settings = from_toml_str("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_from_toml_str_invalid() {
        let result = from_toml_str("[[invalid toml content");
        assert!(matches!(result, Err(WaymarkError::ConfigurationError(_))));
    }

    #[test]
    fn test_from_toml_str_wrong_type() {
        let result = from_toml_str("[url]\nencode = \"sometimes\"");
        assert!(result.is_err());
    }

    // ── JSON loading ────────────────────────────────────────────────

    #[test]
    fn test_from_json_str_basic() {
        let json = r#"{
            "url": {"encode": false},
            "controller": {"default": "home"}
        }"#;

        let settings = from_json_str(json).unwrap();
        assert!(!settings.url.encode);
        assert_eq!(settings.controller.default, "home");
        assert_eq!(settings.controller.suffix, "Controller");
    }

    #[test]
    fn test_from_json_str_empty_object() {
        let settings = from_json_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_from_json_str_invalid() {
        assert!(from_json_str("{invalid json").is_err());
    }

    // ── File loading ────────────────────────────────────────────────

    #[test]
    fn test_from_toml_file() {
        let dir = std::env::temp_dir().join("waymark_test_settings_toml");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("waymark.toml");

        std::fs::write(&path, "[url]\nformat = \".json\"\n").unwrap();

        let settings = from_toml_file(&path).unwrap();
        assert_eq!(settings.url.format, ".json");

        std::fs::remove_file(&path).ok();
        std::fs::remove_dir(&dir).ok();
    }

    #[test]
    fn test_from_json_file() {
        let dir = std::env::temp_dir().join("waymark_test_settings_json");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("waymark.json");

        std::fs::write(&path, r#"{"debug": false}"#).unwrap();

        let settings = from_json_file(&path).unwrap();
        assert!(!settings.debug);

        std::fs::remove_file(&path).ok();
        std::fs::remove_dir(&dir).ok();
    }

    #[test]
    fn test_from_toml_file_missing() {
        let result = from_toml_file("/nonexistent/path/waymark.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_json_file_missing() {
        let result = from_json_file("/nonexistent/path/waymark.json");
        assert!(result.is_err());
    }

    // ── Environment variable overrides ──────────────────────────────
    //
    // Each test owns one variable and only asserts on its own field, since
    // tests share the process environment.

    #[test]
    fn test_apply_env_overrides_debug() {
        let mut settings = Settings::default();
        std::env::set_var("WAYMARK_DEBUG", "0");
        apply_env_overrides(&mut settings);
        assert!(!settings.debug);
        std::env::remove_var("WAYMARK_DEBUG");
    }

    #[test]
    fn test_apply_env_overrides_log_level() {
        let mut settings = Settings::default();
        std::env::set_var("WAYMARK_LOG_LEVEL", "trace");
        apply_env_overrides(&mut settings);
        assert_eq!(settings.log_level, "trace");
        std::env::remove_var("WAYMARK_LOG_LEVEL");
    }

    #[test]
    fn test_apply_env_overrides_url_encode() {
        let mut settings = Settings::default();
        std::env::set_var("WAYMARK_URL_ENCODE", "no");
        apply_env_overrides(&mut settings);
        assert!(!settings.url.encode);
        std::env::remove_var("WAYMARK_URL_ENCODE");
    }

    #[test]
    fn test_apply_env_overrides_url_format() {
        let mut settings = Settings::default();
        std::env::set_var("WAYMARK_URL_FORMAT", ".html");
        apply_env_overrides(&mut settings);
        assert_eq!(settings.url.format, ".html");
        std::env::remove_var("WAYMARK_URL_FORMAT");
    }

    #[test]
    fn test_apply_env_overrides_controller() {
        let mut settings = Settings::default();
        std::env::set_var("WAYMARK_CONTROLLER_SUFFIX", "Ctl");
        apply_env_overrides(&mut settings);
        assert_eq!(settings.controller.suffix, "Ctl");
        std::env::remove_var("WAYMARK_CONTROLLER_SUFFIX");
    }

    #[test]
    fn test_from_env() {
        std::env::set_var("WAYMARK_ACTION_DEFAULT", "show");
        let settings = from_env();
        assert_eq!(settings.action.default, "show");
        std::env::remove_var("WAYMARK_ACTION_DEFAULT");
    }

    #[test]
    fn test_toml_with_env_override() {
        let dir = std::env::temp_dir().join("waymark_test_settings_toml_env");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("waymark_env.toml");

        std::fs::write(&path, "[action]\nsuffix = \"FromFile\"\n").unwrap();
        std::env::set_var("WAYMARK_ACTION_SUFFIX", "FromEnv");

        let settings = from_toml_file_with_env(&path).unwrap();
        assert_eq!(settings.action.suffix, "FromEnv");

        std::env::remove_var("WAYMARK_ACTION_SUFFIX");
        std::fs::remove_file(&path).ok();
        std::fs::remove_dir(&dir).ok();
    }

    // ── Helpers ─────────────────────────────────────────────────────

    #[test]
    fn test_merge_json_nested() {
        let base = serde_json::json!({"outer": {"a": 1, "b": 2}});
        let over = serde_json::json!({"outer": {"b": 3}});
        let merged = merge_json(base, over);
        assert_eq!(merged["outer"]["a"], 1);
        assert_eq!(merged["outer"]["b"], 3);
    }

    #[test]
    fn test_merge_json_array_override() {
        let base = serde_json::json!({"list": [1, 2, 3]});
        let over = serde_json::json!({"list": [4, 5]});
        let merged = merge_json(base, over);
        assert_eq!(merged["list"], serde_json::json!([4, 5]));
    }

    #[test]
    fn test_toml_to_json() {
        let toml_val: toml::Value = toml::from_str(
            r#"
            name = "test"
            count = 42
            flag = true
            [nested]
            key = "value"
        "#,
        )
        .unwrap();

        let json = toml_to_json(toml_val);
        assert_eq!(json["name"], "test");
        assert_eq!(json["count"], 42);
        assert_eq!(json["flag"], true);
        assert_eq!(json["nested"]["key"], "value");
    }
}
