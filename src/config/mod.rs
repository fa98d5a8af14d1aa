//! Configuration: the server-side half of the system settings.
//!
//! The dashboard keeps its own copy of the settings in browser local
//! storage; the server reads `config.toml` plus environment overrides for
//! the vendor API keys. Malformed settings are tolerated with warnings,
//! never rejected.

pub mod schema;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Fallback stale window when `stale_after` fails to parse.
const DEFAULT_STALE_WINDOW: Duration = Duration::from_secs(24 * 3600);

/// How an alert reaches an emergency contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod {
    Email,
    Telegram,
    /// Accepted in settings but never dispatched; recorded as skipped.
    Sms,
}

impl DeliveryMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryMethod::Email => "email",
            DeliveryMethod::Telegram => "telegram",
            DeliveryMethod::Sms => "sms",
        }
    }
}

/// A person to notify when a welfare check raises the alarm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub name: String,
    pub method: DeliveryMethod,
    /// Email address, Telegram chat id, or phone number, per `method`.
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// The operator's preferred alarm wording, embedded into the
    /// generation prompt.
    pub message_template: String,
    /// Language the generated alert should be written in.
    pub language: String,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            message_template:
                "GuardianSwitch alert: an immediate welfare check is required.".to_string(),
            language: "English".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Shared secret for the scheduled trigger. When set, POST
    /// /api/check-welfare requires `Authorization: Bearer <secret>`.
    pub cron_secret: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            cron_secret: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// "gemini" or "mock".
    pub provider: String,
    pub model: String,
    /// Usually supplied via GEMINI_API_KEY.
    pub api_key: Option<String>,
    /// Override the API base URL (tests, proxies).
    pub endpoint: Option<String>,
    pub temperature: f64,
    pub max_output_tokens: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: crate::provider::text::DEFAULT_MODEL.to_string(),
            api_key: None,
            endpoint: None,
            temperature: 0.7,
            max_output_tokens: 200,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    /// Sender shown on outgoing alerts.
    pub from: String,
    /// Usually supplied via RESEND_API_KEY.
    pub api_key: Option<String>,
    /// Override the API URL (tests).
    pub endpoint: Option<String>,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            from: "GuardianSwitch <onboarding@resend.dev>".to_string(),
            api_key: None,
            endpoint: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Usually supplied via TELEGRAM_BOT_TOKEN. The channel is disabled
    /// when absent.
    pub bot_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Display name of the monitored person, used in generated alerts.
    pub user_name: String,
    /// Daily check-in time, "HH:MM" 24h clock. Informational: the check
    /// itself is fired by an external cron or the dashboard button.
    pub check_in_time: String,
    /// How long after the last heartbeat the status degrades, e.g. "24h".
    pub stale_after: String,
    /// Public base URL of this server, shown in the dashboard setup guide.
    pub cloud_url: String,
    /// Master switch for alarm dispatch.
    pub alarm_enabled: bool,
    pub contacts: Vec<EmergencyContact>,
    pub alert: AlertConfig,
    pub server: ServerConfig,
    pub generator: GeneratorConfig,
    pub email: EmailConfig,
    pub telegram: TelegramConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_name: "the monitored user".to_string(),
            check_in_time: "09:00".to_string(),
            stale_after: "24h".to_string(),
            cloud_url: String::new(),
            alarm_enabled: true,
            contacts: Vec::new(),
            alert: AlertConfig::default(),
            server: ServerConfig::default(),
            generator: GeneratorConfig::default(),
            email: EmailConfig::default(),
            telegram: TelegramConfig::default(),
        }
    }
}

impl Config {
    /// Default config file location (`~/.config/guardian-switch/config.toml`
    /// or the platform equivalent).
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("", "", "guardian-switch")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Load from `path` (or the default location). A missing file yields
    /// the defaults; environment overrides are applied either way.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            toml::from_str(&raw)
                .with_context(|| format!("failed to parse {}", path.display()))?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        for warning in config.validate() {
            warn!("{warning}");
        }
        Ok(config)
    }

    /// Pull vendor keys and the cron secret from the environment. Env
    /// values win over the file.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            self.generator.api_key = Some(key);
        }
        if let Ok(key) = std::env::var("RESEND_API_KEY") {
            self.email.api_key = Some(key);
        }
        if let Ok(token) = std::env::var("TELEGRAM_BOT_TOKEN") {
            self.telegram.bot_token = Some(token);
        }
        if let Ok(secret) = std::env::var("GUARDIAN_CRON_SECRET") {
            self.server.cron_secret = Some(secret);
        }
    }

    /// Lenient validation: problems are reported as warnings and the
    /// config stays usable. Duplicate contacts, odd times, and
    /// unsupported methods are all accepted.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.contacts.is_empty() {
            warnings.push("no emergency contacts configured; alarms will go nowhere".to_string());
        }
        if let Err(e) = schema::parse_time(&self.check_in_time) {
            warnings.push(format!("check_in_time ignored: {e}"));
        }
        if let Err(e) = schema::parse_duration(&self.stale_after) {
            warnings.push(format!("stale_after ignored ({e}); using 24h"));
        }

        let mut seen = std::collections::HashSet::new();
        for contact in &self.contacts {
            if !seen.insert((contact.method, contact.address.clone())) {
                warnings.push(format!(
                    "duplicate contact address {} ({})",
                    contact.address,
                    contact.method.as_str()
                ));
            }
            if contact.method == DeliveryMethod::Sms {
                warnings.push(format!(
                    "contact {} uses sms, which has no delivery channel; dispatches will be skipped",
                    contact.name
                ));
            }
        }

        warnings
    }

    /// The parsed stale window, falling back to 24h.
    pub fn stale_window(&self) -> Duration {
        schema::parse_duration(&self.stale_after).unwrap_or(DEFAULT_STALE_WINDOW)
    }

    /// Write a default config file for `guardian-switch init`.
    pub fn write_default(path: &Path, force: bool) -> Result<PathBuf> {
        if path.exists() && !force {
            anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let rendered = toml::to_string_pretty(&Self::default())
            .context("failed to render default config")?;
        std::fs::write(path, rendered)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path.to_path_buf())
    }
}
