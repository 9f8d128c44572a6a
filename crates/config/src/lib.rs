//! Configuration loading, validation, and management for GChat.
//!
//! Loads configuration from `~/.gchat/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use gchat_core::speech::SpeechBackendKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variables consulted for the API credential, in priority order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GCHAT_API_KEY", "GROQ_API_KEY"];

/// The root configuration structure.
///
/// Maps directly to `~/.gchat/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key (normally supplied through the environment)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Completion provider name
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Override the provider's base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature (provider default when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Max tokens per reply (provider default when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Upper bound on one completion request, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Speech synthesis configuration
    #[serde(default)]
    pub speech: SpeechConfig,
}

fn default_provider() -> String {
    "groq".into()
}
fn default_model() -> String {
    "llama3-8b-8192".into()
}
fn default_request_timeout() -> u64 {
    120
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("provider", &self.provider)
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("speech", &self.speech)
            .finish()
    }
}

/// Which speech backend to use and how each one is set up.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// "none", "file" or "playback"
    #[serde(default)]
    pub backend: SpeechBackendKind,

    #[serde(default)]
    pub file: FileSpeechConfig,

    #[serde(default)]
    pub playback: PlaybackSpeechConfig,
}

/// File-based speech: an OpenAI-compatible `/audio/speech` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSpeechConfig {
    /// Defaults to the completion provider's base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default = "default_speech_model")]
    pub model: String,

    #[serde(default = "default_voice")]
    pub voice: String,

    /// Audio encoding requested from the endpoint ("wav", "mp3", ...)
    #[serde(default = "default_audio_format")]
    pub format: String,

    /// Directory the audio file is written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Fixed file name, overwritten on every call
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

fn default_speech_model() -> String {
    "playai-tts".into()
}
fn default_voice() -> String {
    "Fritz-PlayAI".into()
}
fn default_audio_format() -> String {
    "wav".into()
}
fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_file_name() -> String {
    "reply.wav".into()
}

impl Default for FileSpeechConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            model: default_speech_model(),
            voice: default_voice(),
            format: default_audio_format(),
            output_dir: default_output_dir(),
            file_name: default_file_name(),
        }
    }
}

impl FileSpeechConfig {
    /// Where synthesized audio lands.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.file_name)
    }
}

/// Direct playback through the platform speech engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaybackSpeechConfig {
    /// Engine executable; the platform default is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Arguments for `command`; the text is written to the engine's stdin
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}

impl AppConfig {
    /// Load configuration from the default path (~/.gchat/config.toml).
    ///
    /// Also checks environment variables:
    /// - `GCHAT_API_KEY`, then `GROQ_API_KEY` (override the file's api_key)
    /// - `GCHAT_PROVIDER`, `GCHAT_MODEL`, `GCHAT_SPEECH_BACKEND`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup` (injectable for tests).
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .find(|v| !v.is_empty())
        {
            self.api_key = Some(key);
        }

        if let Some(provider) = lookup("GCHAT_PROVIDER") {
            self.provider = provider;
        }

        if let Some(model) = lookup("GCHAT_MODEL") {
            self.model = model;
        }

        if let Some(backend) = lookup("GCHAT_SPEECH_BACKEND") {
            self.speech.backend = backend.parse().map_err(ConfigError::ValidationError)?;
        }

        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".gchat")
    }

    /// Path of the default config file.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(t) = self.temperature
            && !(0.0..=2.0).contains(&t)
        {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "request_timeout_secs must be > 0".into(),
            ));
        }

        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationError("model must not be empty".into()));
        }

        let file_name = &self.speech.file.file_name;
        if file_name.is_empty() || file_name.contains(['/', '\\']) {
            return Err(ConfigError::ValidationError(
                "speech.file.file_name must be a bare file name".into(),
            ));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    /// The credential, or the fatal missing-credential error.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        match self.api_key.as_deref() {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(ConfigError::MissingCredential),
        }
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            provider: default_provider(),
            api_url: None,
            model: default_model(),
            temperature: None,
            max_tokens: None,
            request_timeout_secs: default_request_timeout(),
            speech: SpeechConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("GROQ_API_KEY environment variable not set. Please set it and restart the application.")]
    MissingCredential,
}

impl From<ConfigError> for gchat_core::Error {
    fn from(e: ConfigError) -> Self {
        gchat_core::Error::Config {
            message: e.to_string(),
        }
    }
}
