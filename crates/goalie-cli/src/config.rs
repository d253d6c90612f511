//! Configuration file management for goalie.
//!
//! Provides a TOML-based config file at `~/.config/goalie/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use goalie_core::model::GeminiConfig;
use goalie_core::model::gemini::DEFAULT_MODEL;
use goalie_db::config::DbConfig;

/// Env var holding the Gemini API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigFile {
    pub database: DatabaseSection,
    pub model: ModelSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseSection {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModelSection {
    pub name: String,
    /// Prefer the `GEMINI_API_KEY` env var; this is a fallback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the goalie config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/goalie` or `~/.config/goalie`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("goalie");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("goalie")
}

/// Return the path to the goalie config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    load_config_from(&config_path())
}

pub fn load_config_from(path: &Path) -> Result<ConfigFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    save_config_to(&config_path(), config)
}

/// Write `config` to `path`. Sets file permissions to 0600 on Unix, since
/// the file may hold an API key.
pub fn save_config_to(path: &Path, config: &ConfigFile) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create config directory {}", dir.display()))?;
    }

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct GoalieConfig {
    pub db_config: DbConfig,
    pub model_name: String,
    api_key: Option<String>,
}

impl GoalieConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - DB URL: `cli_db_url` > `GOALIE_DATABASE_URL` > `database.url` > `DbConfig::DEFAULT_URL`
    /// - Model: `cli_model` > `GOALIE_MODEL` > `model.name` > `gemini-1.5-flash`
    /// - API key: `GEMINI_API_KEY` > `model.api_key` (checked lazily by [`Self::gemini_config`])
    pub fn resolve(cli_db_url: Option<&str>, cli_model: Option<&str>) -> Result<Self> {
        let file_config = load_config().ok();
        Ok(Self::from_sources(cli_db_url, cli_model, file_config))
    }

    fn from_sources(
        cli_db_url: Option<&str>,
        cli_model: Option<&str>,
        file_config: Option<ConfigFile>,
    ) -> Self {
        let db_url = if let Some(url) = cli_db_url {
            url.to_string()
        } else if let Ok(url) = std::env::var("GOALIE_DATABASE_URL") {
            url
        } else if let Some(ref cfg) = file_config {
            cfg.database.url.clone()
        } else {
            DbConfig::DEFAULT_URL.to_string()
        };

        let model_name = if let Some(m) = cli_model {
            m.to_string()
        } else if let Ok(m) = std::env::var("GOALIE_MODEL") {
            m
        } else if let Some(ref cfg) = file_config {
            cfg.model.name.clone()
        } else {
            DEFAULT_MODEL.to_string()
        };

        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| file_config.and_then(|cfg| cfg.model.api_key));

        Self {
            db_config: DbConfig::new(db_url),
            model_name,
            api_key,
        }
    }

    /// Gemini settings for commands that call the model.
    pub fn gemini_config(&self) -> Result<GeminiConfig> {
        let Some(key) = &self.api_key else {
            bail!(
                "Gemini API key not found; set {API_KEY_ENV} or add model.api_key to {}",
                config_path().display()
            );
        };
        Ok(GeminiConfig::new(key.clone()).with_model(self.model_name.clone()))
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
