//! The completion client: one assembled prompt in, one reply text out.

use std::sync::Arc;

use gchat_config::AppConfig;
use gchat_core::error::ProviderError;
use gchat_core::prompt::AssembledPrompt;
use gchat_core::provider::{Provider, ProviderRequest};
use tracing::{debug, info};

/// Issues completion requests against a fixed model.
pub struct CompletionClient {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl CompletionClient {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: None,
            max_tokens: None,
        }
    }

    /// Client for the configured model and sampling settings.
    pub fn from_config(provider: Arc<dyn Provider>, config: &AppConfig) -> Self {
        let mut client = Self::new(provider, &config.model);
        client.temperature = config.temperature;
        client.max_tokens = config.max_tokens;
        client
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn build_request(&self, prompt: &AssembledPrompt) -> ProviderRequest {
        let mut request = ProviderRequest::new(&self.model, prompt.to_messages());
        request.temperature = self.temperature;
        request.max_tokens = self.max_tokens;
        request
    }

    /// Send the prompt and return the text of the first reply.
    ///
    /// Exactly one request is made; failures are returned as-is.
    pub async fn complete(&self, prompt: &AssembledPrompt) -> Result<String, ProviderError> {
        let request = self.build_request(prompt);

        debug!(
            provider = self.provider.name(),
            model = %self.model,
            messages = request.messages.len(),
            prompt_chars = prompt.combined.len(),
            "Sending completion request"
        );

        let response = self.provider.complete(request).await?;

        if let Some(usage) = &response.usage {
            info!(
                model = %response.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Completion received"
            );
        }

        Ok(response.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::ScriptedProvider;
    use gchat_core::message::Role;
    use gchat_core::prompt::RequestBundle;

    fn assembled(bundle: RequestBundle) -> AssembledPrompt {
        bundle.assemble().unwrap()
    }

    #[test]
    fn request_carries_model_and_messages() {
        let client = CompletionClient::new(Arc::new(ScriptedProvider::replies(&[])), "llama3-8b-8192");
        let prompt = assembled(RequestBundle::new("hello").with_system_instructions("be brief"));

        let request = client.build_request(&prompt);
        assert_eq!(request.model, "llama3-8b-8192");
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.messages[1].role, Role::User);
        assert_eq!(request.messages[1].content, "\n\nhello");
        assert!(request.temperature.is_none());
        assert!(request.max_tokens.is_none());
    }

    #[test]
    fn sampling_settings_are_forwarded() {
        let client = CompletionClient::new(Arc::new(ScriptedProvider::replies(&[])), "m")
            .with_temperature(0.2)
            .with_max_tokens(64);
        let request = client.build_request(&assembled(RequestBundle::new("q")));
        assert_eq!(request.temperature, Some(0.2));
        assert_eq!(request.max_tokens, Some(64));
    }

    #[test]
    fn from_config_uses_configured_model() {
        let config = AppConfig {
            model: "mixtral-8x7b-32768".into(),
            temperature: Some(1.0),
            ..AppConfig::default()
        };
        let client = CompletionClient::from_config(Arc::new(ScriptedProvider::replies(&[])), &config);
        assert_eq!(client.model(), "mixtral-8x7b-32768");
        assert_eq!(client.build_request(&assembled(RequestBundle::new("q"))).temperature, Some(1.0));
    }

    #[tokio::test]
    async fn returns_reply_text() {
        let provider = Arc::new(ScriptedProvider::replies(&["Hi there"]));
        let client = CompletionClient::new(provider.clone(), "m");

        let reply = client.complete(&assembled(RequestBundle::new("hello"))).await.unwrap();
        assert_eq!(reply, "Hi there");
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn failure_is_not_retried() {
        let provider = Arc::new(ScriptedProvider::new(vec![Err(ProviderError::Network(
            "connection reset".into(),
        ))]));
        let client = CompletionClient::new(provider.clone(), "m");

        let err = client.complete(&assembled(RequestBundle::new("hello"))).await.unwrap_err();
        assert!(matches!(err, ProviderError::Network(_)));
        assert_eq!(provider.call_count(), 1);
    }
}
