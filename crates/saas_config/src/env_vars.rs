//! Environment variable naming for configuration values and secrets.
//!
//! Configuration paths map to `SAAS__SECTION__KEY`, secret paths map to
//! `SAAS_SECRET_SECTION_KEY` with a fallback to the legacy `SECTION_KEY` form.

use serde_json::Value;
use std::env;
use tracing::warn;

/// The default prefix for configuration environment variables
pub const DEFAULT_PREFIX: &str = "SAAS";

/// The prefix for secret environment variables
pub const SECRET_PREFIX: &str = "SAAS_SECRET";

/// The separator for configuration environment variables
pub const CONFIG_SEPARATOR: &str = "__";

/// The separator for secret environment variables
pub const SECRET_SEPARATOR: &str = "_";

/// Marker value replaced from the environment after loading.
pub const SECRET_MARKER: &str = "secret_from_env";

/// Get the prefix for configuration environment variables
pub fn get_config_prefix() -> String {
    env::var("PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string())
}

/// Convert a configuration path (e.g. "server.host") to an environment
/// variable name (e.g. "SAAS__SERVER__HOST").
pub fn config_path_to_env_var(path: &str) -> String {
    let prefix = get_config_prefix();
    let path = path.replace('.', CONFIG_SEPARATOR);
    format!("{}{}{}", prefix, CONFIG_SEPARATOR, path).to_uppercase()
}

/// Convert a secret path (e.g. "merchant.test_secret_key") to an environment
/// variable name (e.g. "SAAS_SECRET_MERCHANT_TEST_SECRET_KEY").
pub fn secret_path_to_env_var(path: &str) -> String {
    let path = path.replace('.', SECRET_SEPARATOR);
    format!("{}{}{}", SECRET_PREFIX, SECRET_SEPARATOR, path).to_uppercase()
}

/// Legacy naming without prefix: "merchant.test_secret_key" -> "MERCHANT_TEST_SECRET_KEY".
pub fn legacy_secret_path_to_env_var(path: &str) -> String {
    let parts: Vec<&str> = path.split('.').collect();
    match parts.split_first() {
        Some((service, rest)) if !rest.is_empty() => {
            format!("{}_{}", service, rest.join(SECRET_SEPARATOR)).to_uppercase()
        }
        _ => path.to_uppercase(),
    }
}

pub fn get_config_env_var(path: &str) -> Option<String> {
    env::var(config_path_to_env_var(path)).ok()
}

/// Looks up a secret under the prefixed name first, then the legacy name.
pub fn get_secret_env_var(path: &str) -> Option<String> {
    if let Ok(value) = env::var(secret_path_to_env_var(path)) {
        return Some(value);
    }
    env::var(legacy_secret_path_to_env_var(path)).ok()
}

/// Paths containing "secret", "key", "password" or "token" are secrets.
pub fn is_secret_path(path: &str) -> bool {
    let path_lower = path.to_lowercase();
    path_lower.contains("secret")
        || path_lower.contains("key")
        || path_lower.contains("password")
        || path_lower.contains("token")
}

pub fn get_env_var(path: &str) -> Option<String> {
    if is_secret_path(path) {
        get_secret_env_var(path)
    } else {
        get_config_env_var(path)
    }
}

/// Replaces every `"secret_from_env"` string in `value` with the matching
/// environment variable. Returns `true` if anything was replaced.
pub fn inject_env_vars(value: &mut Value) -> bool {
    fn walk(path: &mut Vec<String>, obj: &mut Value) -> bool {
        let mut replaced = false;

        match obj {
            Value::Object(map) => {
                for (k, v) in map.iter_mut() {
                    path.push(k.clone());
                    replaced |= walk(path, v);
                    path.pop();
                }
            }
            Value::Array(arr) => {
                for (i, v) in arr.iter_mut().enumerate() {
                    path.push(i.to_string());
                    replaced |= walk(path, v);
                    path.pop();
                }
            }
            Value::String(s) if s == SECRET_MARKER => {
                let path_str = path.join(".");
                if let Some(env_val) = get_env_var(&path_str) {
                    *s = env_val;
                    replaced = true;
                } else {
                    warn!("env var for {} not found", path_str);
                }
            }
            _ => {}
        }

        replaced
    }

    walk(&mut Vec::new(), value)
}

/// Secret paths whose value is still the marker, e.g. after
/// [`inject_env_vars`] found no environment variable for them.
pub fn unresolved_secret_markers(value: &Value) -> Vec<String> {
    fn walk(path: &mut Vec<String>, obj: &Value, found: &mut Vec<String>) {
        match obj {
            Value::Object(map) => {
                for (k, v) in map {
                    path.push(k.clone());
                    walk(path, v, found);
                    path.pop();
                }
            }
            Value::Array(arr) => {
                for (i, v) in arr.iter().enumerate() {
                    path.push(i.to_string());
                    walk(path, v, found);
                    path.pop();
                }
            }
            Value::String(s) if s == SECRET_MARKER => {
                let path_str = path.join(".");
                if is_secret_path(&path_str) {
                    found.push(path_str);
                }
            }
            _ => {}
        }
    }

    let mut found = Vec::new();
    walk(&mut Vec::new(), value, &mut found);
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_config_path_to_env_var() {
        assert_eq!(config_path_to_env_var("server.host"), "SAAS__SERVER__HOST");
        assert_eq!(
            config_path_to_env_var("stripe_connect.base_path"),
            "SAAS__STRIPE_CONNECT__BASE_PATH"
        );
    }

    #[test]
    fn test_secret_path_to_env_var() {
        assert_eq!(
            secret_path_to_env_var("merchant.test_secret_key"),
            "SAAS_SECRET_MERCHANT_TEST_SECRET_KEY"
        );
    }

    #[test]
    fn test_legacy_secret_path_to_env_var() {
        assert_eq!(
            legacy_secret_path_to_env_var("merchant.live_secret_key"),
            "MERCHANT_LIVE_SECRET_KEY"
        );
        assert_eq!(legacy_secret_path_to_env_var("token"), "TOKEN");
    }

    #[test]
    fn test_is_secret_path() {
        assert!(is_secret_path("merchant.test_secret_key"));
        assert!(is_secret_path("merchant.live_secret_key"));
        assert!(!is_secret_path("server.host"));
        assert!(!is_secret_path("merchant.email"));
    }

    #[test]
    fn test_inject_env_vars_replaces_marker() {
        env::set_var("SAAS_SECRET_INJECTTEST_API_KEY", "sk_test_injected");
        let mut value = json!({
            "injecttest": { "api_key": "secret_from_env", "name": "kept" }
        });

        assert!(inject_env_vars(&mut value));
        assert_eq!(value["injecttest"]["api_key"], "sk_test_injected");
        assert_eq!(value["injecttest"]["name"], "kept");
    }

    #[test]
    fn test_inject_env_vars_leaves_unresolved_marker() {
        let mut value = json!({ "nothing_here": { "secret": "secret_from_env" } });

        assert!(!inject_env_vars(&mut value));
        assert_eq!(value["nothing_here"]["secret"], SECRET_MARKER);
        assert_eq!(unresolved_secret_markers(&value), vec!["nothing_here.secret".to_string()]);
    }

    #[test]
    fn test_unresolved_markers_skip_non_secret_paths() {
        let value = json!({ "merchant": { "name": "secret_from_env", "email": "owner@acme.test" } });

        assert!(unresolved_secret_markers(&value).is_empty());
    }
}
