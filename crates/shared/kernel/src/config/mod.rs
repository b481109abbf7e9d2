use config::{Case, Config, Environment, File, Map};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variables starting with `SLUICE__` override file settings.
pub const ENV_PREFIX: &str = "SLUICE";

/// Looked up (without extension) when no path is given; may be absent.
pub const DEFAULT_CONFIG_FILE: &str = "sluice";

#[sluice_derive::sluice_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads `T` from a config file overlaid with environment variables.
///
/// Layers, lowest priority first:
/// 1. **File**: `path` if given (required to exist), otherwise an optional
///    `sluice.{toml,json,yaml,..}` in the working directory.
/// 2. **Environment**: `SLUICE__` prefixed variables; `__` separates nesting
///    levels, so `SLUICE__LOG__LEVEL=debug` sets `log.level`.
///
/// # Errors
/// Returns [`ConfigError::Config`] when an explicit file is missing or
/// unreadable, or when the merged settings do not deserialize into `T`.
///
/// # Example
/// ```rust
/// use sluice_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct Settings {
///     port: u16,
/// }
///
/// let cfg: Settings = load_config(Some("config/local.toml")).unwrap_or_default();
/// assert_eq!(cfg.port, 0);
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    match path {
        Some(path) => load(path.as_ref(), true, None),
        None => load(&PathBuf::from(DEFAULT_CONFIG_FILE), false, None),
    }
}

/// `env` replaces the process environment when given.
pub(crate) fn load<T>(
    file: &Path,
    required: bool,
    env: Option<Map<String, String>>,
) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    info!(path = %file.display(), required, "Loading configuration");

    Config::builder()
        .add_source(File::from(file).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .convert_case(Case::Snake)
                .try_parsing(true)
                .source(env),
        )
        .build()
        .context(format!("reading {}", file.display()))?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WorkerConfig;
    use std::fs;
    use std::time::Duration;
    use tempfile::tempdir;

    fn env(vars: &[(&str, &str)]) -> Option<Map<String, String>> {
        Some(vars.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect())
    }

    #[test]
    fn test_file_values_are_read() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("worker.toml");
        fs::write(&file, "name = \"orders\"\ntimeout_ms = 5000\n\n[log]\nlevel = \"debug\"\n").unwrap();

        let cfg: WorkerConfig = load(&file, true, env(&[])).unwrap();

        assert_eq!(cfg.name, "orders");
        assert_eq!(cfg.timeout(), Duration::from_secs(5));
        assert_eq!(cfg.log.level, "debug");
        assert!(cfg.log.console);
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("worker.toml");
        fs::write(&file, "name = \"orders\"\ntimeout_ms = 5000\n").unwrap();

        let cfg: WorkerConfig = load(
            &file,
            true,
            env(&[
                ("SLUICE__TIMEOUT_MS", "1500"),
                ("SLUICE__LOG__JSON", "true"),
                ("OTHER__NAME", "ignored"),
            ]),
        )
        .unwrap();

        assert_eq!(cfg.name, "orders");
        assert_eq!(cfg.timeout_ms, 1500);
        assert!(cfg.log.json);
    }

    #[test]
    fn test_missing_optional_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let cfg: WorkerConfig = load(&dir.path().join("absent"), false, env(&[])).unwrap();
        assert_eq!(cfg, WorkerConfig::default());
    }

    #[test]
    fn test_missing_required_file_is_an_error() {
        let dir = tempdir().unwrap();
        let err = load::<WorkerConfig>(&dir.path().join("absent.toml"), true, env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Config { .. }));
        assert!(err.to_string().contains("absent.toml"), "got {err}");
    }

    #[test]
    fn test_malformed_value_is_an_error() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("worker.json");
        fs::write(&file, r#"{ "timeout_ms": "soon" }"#).unwrap();

        let err = load::<WorkerConfig>(&file, true, env(&[])).unwrap_err();
        assert!(err.to_string().contains("deserialize"), "got {err}");
    }
}
