// Configuration loading and parsing (huddle.toml, credentials.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub sleeper: SleeperConfig,
    pub stats: StatsConfig,
    pub client: ClientConfig,
    pub session: SessionConfig,
    pub schedule: ScheduleConfig,
    pub credentials: CredentialsConfig,
}

// ---------------------------------------------------------------------------
// huddle.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire huddle.toml file.
#[derive(Debug, Clone, Deserialize)]
struct HuddleFile {
    server: ServerConfig,
    sleeper: SleeperConfig,
    stats: StatsConfig,
    client: ClientConfig,
    #[serde(default)]
    session: SessionConfig,
    schedule: ScheduleConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SleeperConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatsConfig {
    pub base_url: String,
    /// Fixed season for stat lookups. `None` follows the NFL calendar.
    #[serde(default)]
    pub season: Option<u16>,
    pub search_limit: usize,
}

/// How the terminal client reaches the upstream APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientMode {
    /// Call Sleeper and SportsData directly.
    Direct,
    /// Route every request through huddle-server.
    Proxy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    pub mode: ClientMode,
    pub proxy_url: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub db_path: Option<String>,
}

impl SessionConfig {
    /// Resolve the session database path. An explicit `db_path` wins;
    /// otherwise the file lives in the platform data directory.
    pub fn resolved_db_path(&self) -> PathBuf {
        if let Some(path) = self.db_path.as_deref().filter(|p| !p.trim().is_empty()) {
            return PathBuf::from(path);
        }
        match directories::ProjectDirs::from("", "", "huddle") {
            Some(dirs) => dirs.data_dir().join("huddle.db"),
            None => PathBuf::from("huddle.db"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// Minimum number of weeks shown on the schedule, even before the
    /// season reaches them.
    pub min_weeks: u32,
}

// ---------------------------------------------------------------------------
// credentials.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CredentialsConfig {
    pub sportsdata_api_key: Option<String>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/huddle.toml` and
/// (optionally) `config/credentials.toml`, relative to `base_dir`.
///
/// Does not copy defaults and ignores the environment. Prefer
/// `load_config()` for normal startup.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    // --- huddle.toml (required) ---
    let huddle_path = config_dir.join("huddle.toml");
    let huddle_text = read_file(&huddle_path)?;
    let file: HuddleFile = toml::from_str(&huddle_text).map_err(|e| ConfigError::ParseError {
        path: huddle_path.clone(),
        source: e,
    })?;

    // --- credentials.toml (optional) ---
    let credentials_path = config_dir.join("credentials.toml");
    let credentials = if credentials_path.exists() {
        let cred_text = read_file(&credentials_path)?;
        toml::from_str(&cred_text).map_err(|e| ConfigError::ParseError {
            path: credentials_path.clone(),
            source: e,
        })?
    } else {
        CredentialsConfig::default()
    };

    let config = Config {
        server: file.server,
        sleeper: file.sleeper,
        stats: file.stats,
        client: file.client,
        session: file.session,
        schedule: file.schedule,
        credentials,
    };

    validate(&config)?;

    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    let mut copied = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                debug!("copied default config to {}", target.display());
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Load config relative to the current working directory, copying defaults
/// first and applying `PORT` / `SPORTSDATA_API_KEY` from the environment.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    let mut config = load_config_from(&cwd)?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate(&config)?;
    Ok(config)
}

/// Apply environment overrides through `lookup` so tests can supply their
/// own variables.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup("PORT") {
        config.server.port = port
            .trim()
            .parse()
            .map_err(|_| ConfigError::ValidationError {
                field: "PORT".into(),
                message: format!("not a valid port number: {port:?}"),
            })?;
    }
    if let Some(key) = lookup("SPORTSDATA_API_KEY").filter(|k| !k.trim().is_empty()) {
        config.credentials.sportsdata_api_key = Some(key.trim().to_string());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn require_http(field: &str, url: &str) -> Result<(), ConfigError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            field: field.into(),
            message: format!("must be an http(s) URL, got {url:?}"),
        })
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError {
            field: "server.port".into(),
            message: "must be greater than 0".into(),
        });
    }

    require_http("sleeper.base_url", &config.sleeper.base_url)?;
    require_http("stats.base_url", &config.stats.base_url)?;
    require_http("client.proxy_url", &config.client.proxy_url)?;

    if config.stats.search_limit == 0 {
        return Err(ConfigError::ValidationError {
            field: "stats.search_limit".into(),
            message: "must be > 0".into(),
        });
    }

    if let Some(season) = config.stats.season {
        if season < 2000 {
            return Err(ConfigError::ValidationError {
                field: "stats.season".into(),
                message: format!("must be 2000 or later, got {season}"),
            });
        }
    }

    if config.client.request_timeout_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "client.request_timeout_secs".into(),
            message: "must be > 0".into(),
        });
    }

    let weeks = config.schedule.min_weeks;
    if !(1..=25).contains(&weeks) {
        return Err(ConfigError::ValidationError {
            field: "schedule.min_weeks".into(),
            message: format!("must be between 1 and 25 inclusive, got {weeks}"),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;

    /// Helper: returns the workspace root holding `defaults/`
    /// (works whether `cargo test` runs from the crate or the workspace).
    fn project_root() -> PathBuf {
        let cwd = std::env::current_dir().unwrap();
        if cwd.join("defaults").exists() {
            cwd
        } else if cwd.join("../../defaults").exists() {
            cwd.join("../..")
        } else {
            panic!("Cannot locate defaults/ directory from CWD {:?}", cwd);
        }
    }

    /// Helper: fresh temp dir containing `config/huddle.toml` taken from
    /// the shipped defaults, with `edit` applied to its text.
    fn temp_config(name: &str, edit: impl Fn(String) -> String) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let config_dir = tmp.join("config");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&config_dir).unwrap();

        let text = fs::read_to_string(project_root().join("defaults/huddle.toml")).unwrap();
        fs::write(config_dir.join("huddle.toml"), edit(text)).unwrap();
        tmp
    }

    fn expect_validation_field(tmp: &Path, expected: &str) {
        match load_config_from(tmp).unwrap_err() {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, expected),
            other => panic!("expected ValidationError, got: {other}"),
        }
    }

    #[test]
    fn load_shipped_defaults() {
        let tmp = temp_config("huddle_config_defaults", |t| t);
        let config = load_config_from(&tmp).expect("defaults should load");

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.sleeper.base_url, "https://api.sleeper.app/v1");
        assert!(config.stats.base_url.starts_with("https://api.sportsdata.io"));
        assert_eq!(config.stats.season, None);
        assert_eq!(config.stats.search_limit, 10);
        assert_eq!(config.client.mode, ClientMode::Direct);
        assert_eq!(config.client.proxy_url, "http://localhost:4000/api");
        assert_eq!(config.client.request_timeout_secs, 20);
        assert_eq!(config.session.db_path.as_deref(), Some("huddle.db"));
        assert_eq!(config.schedule.min_weeks, 18);
        assert!(config.credentials.sportsdata_api_key.is_none());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn credentials_toml_with_api_key() {
        let tmp = temp_config("huddle_config_creds", |t| t);
        fs::write(
            tmp.join("config/credentials.toml"),
            "sportsdata_api_key = \"sd-test-key\"\n",
        )
        .unwrap();

        let config = load_config_from(&tmp).expect("should load with credentials.toml");
        assert_eq!(
            config.credentials.sportsdata_api_key.as_deref(),
            Some("sd-test-key")
        );

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn proxy_mode_and_fixed_season_parse() {
        let tmp = temp_config("huddle_config_proxy", |t| {
            t.replace("mode = \"direct\"", "mode = \"proxy\"")
                .replace("# season = 2024", "season = 2023")
        });
        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.client.mode, ClientMode::Proxy);
        assert_eq!(config.stats.season, Some(2023));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_port() {
        let tmp = temp_config("huddle_config_zero_port", |t| {
            t.replace("port = 4000", "port = 0")
        });
        expect_validation_field(&tmp, "server.port");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_non_http_sleeper_url() {
        let tmp = temp_config("huddle_config_bad_url", |t| {
            t.replace("https://api.sleeper.app/v1", "api.sleeper.app/v1")
        });
        expect_validation_field(&tmp, "sleeper.base_url");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_search_limit() {
        let tmp = temp_config("huddle_config_zero_limit", |t| {
            t.replace("search_limit = 10", "search_limit = 0")
        });
        expect_validation_field(&tmp, "stats.search_limit");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_out_of_range_min_weeks() {
        let tmp = temp_config("huddle_config_weeks", |t| {
            t.replace("min_weeks = 18", "min_weeks = 40")
        });
        expect_validation_field(&tmp, "schedule.min_weeks");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_timeout() {
        let tmp = temp_config("huddle_config_timeout", |t| {
            t.replace("request_timeout_secs = 20", "request_timeout_secs = 0")
        });
        expect_validation_field(&tmp, "client.request_timeout_secs");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn file_not_found_for_missing_huddle_toml() {
        let tmp = std::env::temp_dir().join("huddle_config_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();

        match load_config_from(&tmp).unwrap_err() {
            ConfigError::FileNotFound { path } => assert!(path.ends_with("huddle.toml")),
            other => panic!("expected FileNotFound, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = temp_config("huddle_config_invalid", |_| "this is not valid [[[ toml".into());
        match load_config_from(&tmp).unwrap_err() {
            ConfigError::ParseError { path, .. } => assert!(path.ends_with("huddle.toml")),
            other => panic!("expected ParseError, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn env_overrides_port_and_key() {
        let tmp = temp_config("huddle_config_env", |t| t);
        let mut config = load_config_from(&tmp).unwrap();

        let vars: HashMap<&str, &str> =
            [("PORT", "8080"), ("SPORTSDATA_API_KEY", " env-key ")].into();
        apply_env_overrides(&mut config, |k| vars.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.credentials.sportsdata_api_key.as_deref(), Some("env-key"));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn env_override_rejects_bad_port() {
        let tmp = temp_config("huddle_config_env_bad", |t| t);
        let mut config = load_config_from(&tmp).unwrap();

        let err = apply_env_overrides(&mut config, |k| {
            (k == "PORT").then(|| "not-a-port".to_string())
        })
        .unwrap_err();
        match err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "PORT"),
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn blank_env_key_is_ignored() {
        let tmp = temp_config("huddle_config_env_blank", |t| t);
        let mut config = load_config_from(&tmp).unwrap();
        apply_env_overrides(&mut config, |k| {
            (k == "SPORTSDATA_API_KEY").then(|| "   ".to_string())
        })
        .unwrap();
        assert!(config.credentials.sportsdata_api_key.is_none());
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn explicit_db_path_wins() {
        let session = SessionConfig {
            db_path: Some("custom.db".into()),
        };
        assert_eq!(session.resolved_db_path(), PathBuf::from("custom.db"));

        let blank = SessionConfig {
            db_path: Some("  ".into()),
        };
        assert!(blank.resolved_db_path().ends_with("huddle.db"));
    }

    #[test]
    fn ensure_config_files_copies_missing_files() {
        let tmp = std::env::temp_dir().join("huddle_config_ensure_copies");
        let _ = fs::remove_dir_all(&tmp);

        let defaults_dir = tmp.join("defaults");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::copy(
            project_root().join("defaults/huddle.toml"),
            defaults_dir.join("huddle.toml"),
        )
        .unwrap();
        fs::write(
            defaults_dir.join("credentials.toml.example"),
            "sportsdata_api_key = \"...\"\n",
        )
        .unwrap();

        assert!(!tmp.join("config").exists());

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert_eq!(copied.len(), 1);
        assert!(tmp.join("config/huddle.toml").exists());
        assert!(!tmp.join("config/credentials.toml.example").exists());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_skips_existing() {
        let tmp = std::env::temp_dir().join("huddle_config_ensure_skips");
        let _ = fs::remove_dir_all(&tmp);

        let defaults_dir = tmp.join("defaults");
        let config_dir = tmp.join("config");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::create_dir_all(&config_dir).unwrap();
        fs::copy(
            project_root().join("defaults/huddle.toml"),
            defaults_dir.join("huddle.toml"),
        )
        .unwrap();
        fs::write(config_dir.join("huddle.toml"), "# custom\n").unwrap();

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert!(copied.is_empty());
        let content = fs::read_to_string(config_dir.join("huddle.toml")).unwrap();
        assert_eq!(content, "# custom\n");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_errors_when_both_dirs_missing() {
        let tmp = std::env::temp_dir().join("huddle_config_both_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        match ensure_config_files(&tmp).unwrap_err() {
            ConfigError::DefaultsCopyError { message } => {
                assert!(message.contains("neither defaults/ nor config/"));
            }
            other => panic!("expected DefaultsCopyError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }
}
