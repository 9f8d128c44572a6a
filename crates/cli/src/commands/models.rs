//! `gchat models`: List models offered by the configured service.

use super::load_config;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let provider = gchat_providers::build_from_config(&config)?;

    let models = provider.list_models().await?;

    println!("🤖 Models available from {}", provider.name());
    println!();
    if models.is_empty() {
        println!("  (the service returned no models)");
    }
    for model in &models {
        let marker = if *model == config.model { "*" } else { " " };
        println!("  {marker} {model}");
    }
    println!();
    println!("  * = configured model ({})", config.model);

    Ok(())
}
