//! Configuration primitives for the Skillax intake service.
//!
//! Stored in a machine-readable TOML file located at:
//!   $SKILLAX_HOME/config/config.toml when the variable is set
//!   %APPDATA%/Skillax/config/config.toml on Windows
//!   $XDG_DATA_HOME/Skillax/config/config.toml on Linux
//!   ~/Library/Application Support/Skillax/config/config.toml on macOS
//!
//! Secrets (LLM API key, admin token) never live in this file. The config
//! only names the environment variables they are read from.

use anyhow::{Context, Result};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration persisted per installation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Listener and public URL settings.
    #[serde(default)]
    pub server: ServerSettings,
    /// Where records, telemetry and content live.
    #[serde(default)]
    pub storage: StorageSettings,
    /// External text-generation service used for profile enrichment and chat.
    #[serde(default)]
    pub enrichment: EnrichmentSettings,
    /// Chat proxy session handling.
    #[serde(default)]
    pub chat: ChatSettings,
    /// Lead capture knobs.
    #[serde(default)]
    pub leads: LeadSettings,
    /// Admin surface access.
    #[serde(default)]
    pub admin: AdminSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Origin of the web front-end; share links are built against it.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            public_base_url: default_public_base_url(),
        }
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_addr
            .parse()
            .with_context(|| format!("Invalid server.bind_addr '{}'", self.bind_addr))
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0:8001".into()
}

fn default_public_base_url() -> String {
    "http://localhost:3000".into()
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageSettings {
    /// Overrides `<workspace_root>/data` when set.
    pub data_dir: Option<PathBuf>,
}

impl StorageSettings {
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(path) => Ok(path.clone()),
            None => Ok(workspace_root()?.join("data")),
        }
    }
}

/// Settings for the OpenAI-compatible chat-completions endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentSettings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Name of the environment variable holding the bearer key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Hard bound on one upstream call, connection included.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for EnrichmentSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_ms: default_timeout_ms(),
            temperature: default_temperature(),
        }
    }
}

impl EnrichmentSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Reads the API key from the configured variable; blank counts as unset.
    pub fn api_key(&self) -> Option<String> {
        env::var(&self.api_key_env)
            .ok()
            .filter(|value| !value.trim().is_empty())
    }
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".into()
}

fn default_model() -> String {
    "gpt-4o".into()
}

fn default_api_key_env() -> String {
    "SKILLAX_LLM_API_KEY".into()
}

const fn default_timeout_ms() -> u64 {
    30_000
}

const fn default_temperature() -> f32 {
    0.7
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSettings {
    /// Idle sessions older than this are dropped from the cache.
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
    /// Most recent turns replayed to the model per request.
    #[serde(default = "default_max_history_turns")]
    pub max_history_turns: usize,
    #[serde(default = "default_fallback_message")]
    pub fallback_message: String,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            session_ttl_secs: default_session_ttl_secs(),
            max_history_turns: default_max_history_turns(),
            fallback_message: default_fallback_message(),
        }
    }
}

impl ChatSettings {
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}

const fn default_session_ttl_secs() -> u64 {
    1_800
}

const fn default_max_history_turns() -> usize {
    12
}

fn default_fallback_message() -> String {
    "I'm having trouble connecting right now. Please reach us at contact@skillax.in and we'll be happy to help!".into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadSettings {
    /// Domain appended to phone digits when a lead arrives without an email.
    #[serde(default = "default_synthetic_email_domain")]
    pub synthetic_email_domain: String,
}

impl Default for LeadSettings {
    fn default() -> Self {
        Self {
            synthetic_email_domain: default_synthetic_email_domain(),
        }
    }
}

fn default_synthetic_email_domain() -> String {
    "leads.skillax.in".into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminSettings {
    /// Environment variable holding the bearer token for `/api/admin/*`.
    #[serde(default = "default_admin_token_env")]
    pub token_env: String,
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            token_env: default_admin_token_env(),
        }
    }
}

impl AdminSettings {
    pub fn token(&self) -> Option<String> {
        env::var(&self.token_env)
            .ok()
            .filter(|value| !value.trim().is_empty())
    }
}

fn default_admin_token_env() -> String {
    "SKILLAX_ADMIN_TOKEN".into()
}

/// Standard relative path to the config file (resolved per OS at runtime).
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Returns the root directory where Skillax keeps config and data.
///
/// Order of precedence:
/// 1. `SKILLAX_HOME` environment variable.
/// 2. OS-specific data directory via `directories::BaseDirs`.
pub fn workspace_root() -> Result<PathBuf> {
    if let Ok(path) = env::var("SKILLAX_HOME") {
        return Ok(PathBuf::from(path));
    }
    let base_dirs = BaseDirs::new().context("Unable to determine OS data directory")?;
    Ok(base_dirs.data_dir().join("Skillax"))
}

pub fn config_dir() -> Result<PathBuf> {
    Ok(workspace_root()?.join("config"))
}

pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Loads the configuration from disk or returns defaults.
pub fn load_or_default() -> Result<AppConfig> {
    let path = config_file_path()?;
    if path.exists() {
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let cfg: AppConfig = toml::from_str(&data)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        Ok(cfg)
    } else {
        Ok(AppConfig::default())
    }
}

/// Persists the configuration to disk.
pub fn save(config: &AppConfig) -> Result<()> {
    let dir = config_dir()?;
    fs::create_dir_all(&dir)?;
    let path = config_file_path()?;
    let data = toml::to_string_pretty(config)?;
    fs::write(&path, data)?;
    Ok(())
}

/// Ensures the data and content directories exist for the given config.
pub fn ensure_workspace_structure(config: &AppConfig) -> Result<WorkspacePaths> {
    let data_dir = config.storage.resolve_data_dir()?;
    let content_dir = data_dir.join("content");
    let telemetry_dir = data_dir.join("telemetry");
    fs::create_dir_all(&content_dir)
        .with_context(|| format!("Failed creating content directory {:?}", content_dir))?;
    fs::create_dir_all(&telemetry_dir)
        .with_context(|| format!("Failed creating telemetry directory {:?}", telemetry_dir))?;
    Ok(WorkspacePaths {
        data_dir,
        content_dir,
        telemetry_dir,
    })
}

/// Convenience struct exposing important workspace paths.
#[derive(Debug, Clone)]
pub struct WorkspacePaths {
    pub data_dir: PathBuf,
    pub content_dir: PathBuf,
    pub telemetry_dir: PathBuf,
}

impl WorkspacePaths {
    pub fn from_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            content_dir: data_dir.join("content"),
            telemetry_dir: data_dir.join("telemetry"),
            data_dir,
        }
    }

    pub fn blogs_file(&self) -> PathBuf {
        self.content_dir.join("blogs.json")
    }

    pub fn courses_file(&self) -> PathBuf {
        self.content_dir.join("courses.json")
    }

    pub fn page_views_file(&self) -> PathBuf {
        self.telemetry_dir.join("page_views.jsonl")
    }
}
