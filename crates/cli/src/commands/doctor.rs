//! `gchat doctor`: Diagnose configuration and connectivity.

use gchat_config::AppConfig;
use gchat_core::speech::SpeechBackendKind;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 GChat Doctor — System Diagnostics");
    println!("===================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_path();
    if config_path.exists() {
        println!("  ✅ Config file found: {}", config_path.display());
    } else {
        println!("  ⚠️  No config file — using defaults (run `gchat onboard` to create one)");
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Configuration valid");
            config
        }
        Err(e) => {
            println!("  ❌ Configuration invalid: {e}");
            println!("\n  ⚠️  1 issue found. Fix the configuration and re-run.");
            return Ok(());
        }
    };

    println!("  ℹ️  Provider {} / model {}", config.provider, config.model);

    if config.has_api_key() {
        println!("  ✅ API key configured");

        match gchat_providers::build_from_config(&config) {
            Ok(provider) => match provider.health_check().await {
                Ok(true) => println!("  ✅ Service reachable"),
                Ok(false) => {
                    println!("  ❌ Service responded but rejected the health check");
                    issues += 1;
                }
                Err(e) => {
                    println!("  ❌ Service unreachable: {e}");
                    issues += 1;
                }
            },
            Err(e) => {
                println!("  ❌ Provider setup failed: {e}");
                issues += 1;
            }
        }
    } else {
        println!("  ❌ No API key — set GROQ_API_KEY (or GCHAT_API_KEY)");
        issues += 1;
    }

    match config.speech.backend {
        SpeechBackendKind::None => println!("  ℹ️  Speech disabled"),
        backend => match gchat_speech::build_from_config(&config) {
            Ok(_) => println!("  ✅ Speech backend: {backend}"),
            Err(e) => {
                println!("  ⚠️  Speech backend {backend} unavailable: {e}");
                issues += 1;
            }
        },
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
