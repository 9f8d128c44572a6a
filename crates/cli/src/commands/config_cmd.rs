//! `gchat config`: Configuration management commands.

use gchat_config::AppConfig;
use gchat_core::speech::SpeechBackendKind;

/// Render a config as TOML with the credential masked.
fn redacted_toml(config: &AppConfig) -> Result<String, toml::ser::Error> {
    let mut shown = config.clone();
    if shown.has_api_key() {
        shown.api_key = Some("***".into());
    }
    toml::to_string_pretty(&shown)
}

pub async fn validate() -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Validating configuration...");

    match AppConfig::load() {
        Ok(config) => {
            println!("   ✅ Config parsed successfully");

            let mut warnings = Vec::new();

            if !config.has_api_key() {
                warnings.push("No API key set (set GROQ_API_KEY or GCHAT_API_KEY)");
            }

            if config.speech.backend == SpeechBackendKind::Playback
                && config.speech.playback.command.is_none()
            {
                warnings.push("Playback uses the platform speech engine; make sure it is installed");
            }

            if warnings.is_empty() {
                println!("   ✅ All checks passed");
            } else {
                println!();
                for w in &warnings {
                    println!("   ⚠️  {w}");
                }
            }

            println!();
            println!("   Provider:  {}", config.provider);
            println!("   Model:     {}", config.model);
            println!("   Timeout:   {}s", config.request_timeout_secs);
            println!("   Speech:    {}", config.speech.backend);
        }
        Err(e) => {
            println!("   ❌ Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    println!("{}", redacted_toml(&config)?);
    Ok(())
}

pub async fn path() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", AppConfig::config_path().display());
    Ok(())
}
