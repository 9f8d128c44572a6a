//! Shared test doubles for the chat crate.

use std::sync::Mutex;

use gchat_core::error::{ProviderError, SpeechError};
use gchat_core::message::Message;
use gchat_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use gchat_core::speech::{SpeechOutput, SpeechSynthesizer};

/// A provider that answers from a script and records every request.
///
/// Panics if more calls are made than results provided.
pub struct ScriptedProvider {
    script: Mutex<Vec<Result<String, ProviderError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new(script: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            script: Mutex::new(script),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn replies(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(t.to_string())).collect())
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let model = request.model.clone();
        self.requests.lock().unwrap().push(request);

        let mut script = self.script.lock().unwrap();
        assert!(!script.is_empty(), "ScriptedProvider: no more results");
        let text = script.remove(0)?;

        Ok(ProviderResponse {
            message: Message::assistant(text),
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
            model,
        })
    }
}

/// A speech backend that remembers what it was asked to say.
#[derive(Default)]
pub struct RecordingSpeech {
    spoken: Mutex<Vec<String>>,
}

impl RecordingSpeech {
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl SpeechSynthesizer for RecordingSpeech {
    fn name(&self) -> &str {
        "recording"
    }

    async fn synthesize(&self, text: &str) -> Result<SpeechOutput, SpeechError> {
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(SpeechOutput::Played)
    }
}
