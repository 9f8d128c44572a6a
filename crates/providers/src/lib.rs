//! LLM Provider implementations for GChat.
//!
//! All providers implement the `gchat_core::Provider` trait.
//! [`build_from_config`] turns the loaded configuration into the provider
//! the completion client talks to.

pub mod openai_compat;

use std::sync::Arc;
use std::time::Duration;

use gchat_config::AppConfig;
use gchat_core::Provider;
use gchat_core::error::ProviderError;

pub use openai_compat::{GROQ_BASE_URL, OpenAiCompatProvider};

/// Build the configured completion provider.
///
/// The credential must already be present; the caller decides how a missing
/// key is reported.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn Provider>, ProviderError> {
    let api_key = config
        .api_key
        .clone()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| ProviderError::NotConfigured(format!("{}: no API key", config.provider)))?;

    let base_url = resolve_base_url(config)?;

    let provider = OpenAiCompatProvider::new(
        &config.provider,
        base_url,
        api_key,
        Duration::from_secs(config.request_timeout_secs),
    )?;

    Ok(Arc::new(provider))
}

/// The configured `api_url`, else the well-known URL for the provider.
///
/// An unknown provider without an explicit URL is not configured.
pub fn resolve_base_url(config: &AppConfig) -> Result<String, ProviderError> {
    match &config.api_url {
        Some(url) => Ok(url.clone()),
        None => default_base_url(&config.provider).map(String::from).ok_or_else(|| {
            ProviderError::NotConfigured(format!(
                "unknown provider `{}`; set api_url to its endpoint",
                config.provider
            ))
        }),
    }
}

/// Get the default base URL for well-known providers.
pub fn default_base_url(provider_name: &str) -> Option<&'static str> {
    let url = match provider_name {
        "groq" => GROQ_BASE_URL,
        "openai" => "https://api.openai.com/v1",
        "openrouter" => "https://openrouter.ai/api/v1",
        "together" => "https://api.together.xyz/v1",
        "fireworks" => "https://api.fireworks.ai/inference/v1",
        "deepseek" => "https://api.deepseek.com/v1",
        "ollama" => "http://localhost:11434/v1",
        "vllm" => "http://localhost:8000/v1",
        _ => return None,
    };
    Some(url)
}
