//! Subcommand implementations and the wiring they share.

pub mod ask;
pub mod chat;
pub mod config_cmd;
pub mod doctor;
pub mod models;
pub mod onboard;

use gchat_chat::{ChatService, CompletionClient, SubmitOutcome};
use gchat_config::AppConfig;
use gchat_core::speech::SpeechOutput;

/// Load the configuration and insist on a credential.
///
/// A missing credential is reported once and ends the command.
pub fn load_config() -> Result<AppConfig, Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Err(e) = config.require_api_key() {
        eprintln!();
        eprintln!("  ERROR: {e}");
        eprintln!();
        eprintln!("  Or add `api_key` to your config file:");
        eprintln!("    {}", AppConfig::config_path().display());
        eprintln!();
        return Err(e.into());
    }

    tracing::debug!(
        provider = %config.provider,
        model = %config.model,
        speech = %config.speech.backend,
        "Configuration loaded"
    );
    Ok(config)
}

/// Build the chat service (provider, client and optional speech backend).
pub fn build_service(config: &AppConfig) -> Result<ChatService, Box<dyn std::error::Error>> {
    let provider = gchat_providers::build_from_config(config)?;
    let mut service = ChatService::new(CompletionClient::from_config(provider, config));

    if let Some(speech) = gchat_speech::build_from_config(config)? {
        service = service.with_speech(speech);
    }

    Ok(service)
}

/// Print a submission outcome: the status line, then the reply if there is one.
pub fn print_outcome(outcome: &SubmitOutcome) {
    match outcome {
        SubmitOutcome::Reply(text) => {
            eprintln!("  {}", outcome.status_message());
            println!();
            println!("{text}");
            println!();
        }
        SubmitOutcome::NothingToSend | SubmitOutcome::EmptyReply => {
            eprintln!("  ⚠️  {}", outcome.status_message());
        }
        SubmitOutcome::Failed(_) => {
            eprintln!("  [Error] {}", outcome.status_message());
        }
    }
}

/// Process exit status for a submission that has already been printed.
///
/// Only a failed request is an error; the warning and the empty reply are not.
pub fn exit_code(outcome: &SubmitOutcome) -> i32 {
    if outcome.is_failure() { 1 } else { 0 }
}

pub fn describe_speech(output: &SpeechOutput) -> String {
    match output {
        SpeechOutput::File(path) => format!("Audio saved to {}", path.display()),
        SpeechOutput::Played => "Playback finished".into(),
    }
}
