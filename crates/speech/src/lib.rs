//! Speech synthesis backends for GChat.
//!
//! Both backends implement `gchat_core::SpeechSynthesizer`:
//!
//! - [`FileSpeech`] asks an OpenAI-compatible `/audio/speech` endpoint for
//!   audio and writes it to a fixed file, overwritten on every call.
//! - [`SystemVoice`] feeds the text to the platform speech engine and waits
//!   until it has finished speaking.

pub mod file;
pub mod playback;

use std::sync::Arc;
use std::time::Duration;

use gchat_config::AppConfig;
use gchat_core::error::SpeechError;
use gchat_core::speech::{SpeechBackendKind, SpeechSynthesizer};

pub use file::FileSpeech;
pub use playback::SystemVoice;

/// Build the speech backend selected by `speech.backend`, if any.
pub fn build_from_config(
    config: &AppConfig,
) -> Result<Option<Arc<dyn SpeechSynthesizer>>, SpeechError> {
    match config.speech.backend {
        SpeechBackendKind::None => Ok(None),
        SpeechBackendKind::File => {
            let api_key = config
                .api_key
                .clone()
                .filter(|k| !k.is_empty())
                .ok_or_else(|| SpeechError::Synthesis("no API key for the speech endpoint".into()))?;
            let base_url = match &config.speech.file.api_url {
                Some(url) => url.clone(),
                None => gchat_providers::resolve_base_url(config)
                    .map_err(|e| SpeechError::Synthesis(e.to_string()))?,
            };

            let backend = FileSpeech::new(
                base_url,
                api_key,
                &config.speech.file,
                Duration::from_secs(config.request_timeout_secs),
            )?;
            Ok(Some(Arc::new(backend)))
        }
        SpeechBackendKind::Playback => {
            Ok(Some(Arc::new(SystemVoice::from_config(&config.speech.playback))))
        }
    }
}
