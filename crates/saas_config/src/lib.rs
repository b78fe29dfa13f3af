use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

pub mod env_vars;
pub mod models;
pub use models::*;

/// Loads the application configuration.
///
/// Sources, later ones winning:
/// 1. `{CONFIG_DIR}/default.*`
/// 2. `{CONFIG_DIR}/{RUN_ENV}.*`
/// 3. environment variables `{PREFIX}__SECTION__KEY`
///
/// `CONFIG_DIR` defaults to `config`, `RUN_ENV` to `debug`, `PREFIX` to `SAAS`.
/// Values set to `"secret_from_env"` are then resolved from the environment.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env_vars::get_config_prefix();
    let config_dir = env::var("CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config"));

    load_config_from(&config_dir, &run_env, &prefix)
}

/// Same as [`load_config`] with explicit inputs.
pub fn load_config_from(
    config_dir: &Path,
    run_env: &str,
    prefix: &str,
) -> Result<AppConfig, ConfigError> {
    let default_path = config_dir.join("default");
    let env_path = config_dir.join(run_env);

    debug!(
        "loading config from {} and {} (env prefix {})",
        default_path.display(),
        env_path.display(),
        prefix
    );

    let builder = Config::builder()
        .add_source(File::with_name(&default_path.to_string_lossy()).required(false))
        .add_source(File::with_name(&env_path.to_string_lossy()).required(false))
        .add_source(
            Environment::with_prefix(prefix)
                .separator(env_vars::CONFIG_SEPARATOR)
                .try_parsing(true),
        );

    let raw_config: AppConfig = builder.build()?.try_deserialize()?;
    apply_env_overrides_from_marker(raw_config)
}

/// Applies environment overrides based on "secret_from_env" markers in the serialized config.
///
/// A marker on a secret path without a matching environment variable is an error.
pub fn apply_env_overrides_from_marker(config: AppConfig) -> Result<AppConfig, ConfigError> {
    let mut json = serde_json::to_value(&config)
        .map_err(|err| ConfigError::Message(format!("failed to serialize config: {err}")))?;
    env_vars::inject_env_vars(&mut json);

    let unresolved = env_vars::unresolved_secret_markers(&json);
    if !unresolved.is_empty() {
        let expected: Vec<String> = unresolved
            .iter()
            .map(|path| env_vars::secret_path_to_env_var(path))
            .collect();
        return Err(ConfigError::Message(format!(
            "secrets marked \"{}\" are not set: {} (expected {})",
            env_vars::SECRET_MARKER,
            unresolved.join(", "),
            expected.join(", ")
        )));
    }
    serde_json::from_value(json)
        .map_err(|err| ConfigError::Message(format!("failed to rebuild config: {err}")))
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Loads the dotenv file into the process environment once.
///
/// The path comes from `DOTENV_OVERRIDE`, then from a first command line
/// argument starting with `.env`, and defaults to `.env`. Returns the path used.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path_override = env::var("DOTENV_OVERRIDE").ok();
    let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

    let dotenv_path = dotenv_path_override
        .or(dotenv_path_arg)
        .unwrap_or_else(|| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_config_dir(name: &str, default_toml: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("saas-config-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("default.toml"), default_toml).unwrap();
        dir
    }

    #[test]
    fn test_load_config_applies_defaults() {
        let dir = write_config_dir(
            "defaults",
            r#"
use_stripe_connect = true

[server]
host = "127.0.0.1"
port = 8080

[stripe_connect]
base_path = "/api"
"#,
        );

        let config = load_config_from(&dir, "debug", "SAASTESTDEFAULTS").unwrap();
        let stripe = config.stripe_connect.unwrap();

        assert!(config.use_stripe_connect);
        assert_eq!(config.server.port, 8080);
        assert_eq!(stripe.base_path, "/api");
        assert_eq!(stripe.default_currency, "gbp");
        assert_eq!(stripe.fallback_domain, "blackhole-1.iana.org");
        assert_eq!(stripe.api_base_url, "https://api.stripe.com");
        assert!(config.merchant.is_none());
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = write_config_dir(
            "override",
            r#"
[server]
host = "127.0.0.1"
port = 8080
"#,
        );
        env::set_var("SAASTESTOVERRIDE__SERVER__PORT", "9090");

        let config = load_config_from(&dir, "debug", "SAASTESTOVERRIDE").unwrap();

        assert_eq!(config.server.port, 9090);
        assert!(!config.use_stripe_connect);
    }

    #[test]
    fn test_secret_marker_is_resolved() {
        let dir = write_config_dir(
            "secrets",
            r#"
[server]
host = "127.0.0.1"
port = 8080

[merchant]
name = "Acme"
email = "owner@acme.test"
test_secret_key = "secret_from_env"
"#,
        );
        env::set_var("SAAS_SECRET_MERCHANT_TEST_SECRET_KEY", "sk_test_from_env");

        let config = load_config_from(&dir, "debug", "SAASTESTSECRETS").unwrap();

        assert_eq!(config.merchant.unwrap().test_secret_key, "sk_test_from_env");
    }

    #[test]
    fn test_unresolved_secret_marker_is_an_error() {
        let dir = write_config_dir(
            "unresolved",
            r#"
[server]
host = "127.0.0.1"
port = 8080

[merchant]
name = "Acme"
email = "owner@acme.test"
test_secret_key = "sk_test_inline"
live_secret_key = "secret_from_env"
"#,
        );
        env::remove_var("SAAS_SECRET_MERCHANT_LIVE_SECRET_KEY");
        env::remove_var("MERCHANT_LIVE_SECRET_KEY");

        let err = load_config_from(&dir, "debug", "SAASTESTUNRESOLVED").unwrap_err();

        assert!(err.to_string().contains("SAAS_SECRET_MERCHANT_LIVE_SECRET_KEY"));
    }

    #[test]
    fn test_missing_server_section_is_an_error() {
        let dir = write_config_dir("broken", "use_stripe_connect = true\n");

        assert!(load_config_from(&dir, "debug", "SAASTESTBROKEN").is_err());
    }
}
