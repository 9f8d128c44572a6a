//! The submission flow: assemble, complete, store the reply, speak on demand.

use std::sync::Arc;

use gchat_core::error::{ProviderError, SpeechError};
use gchat_core::prompt::{AssemblyError, RequestBundle};
use gchat_core::session::SessionContext;
use gchat_core::speech::{SpeechOutput, SpeechSynthesizer};
use tracing::{info, warn};

use crate::client::CompletionClient;

/// Shown after a reply was stored.
pub const MSG_COMPLETED: &str = "Query completed!";
/// Shown when the service answered with no text.
pub const MSG_NO_RESPONSE: &str = "No response found.";

/// What became of one submission.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// The service answered; the text is now the session's last reply.
    Reply(String),
    /// Neither a prompt nor a document was supplied. No request was made.
    NothingToSend,
    /// The service answered with empty text.
    EmptyReply,
    /// The request failed.
    Failed(ProviderError),
}

impl SubmitOutcome {
    /// The status line to render for this outcome.
    pub fn status_message(&self) -> String {
        match self {
            Self::Reply(_) => MSG_COMPLETED.into(),
            Self::NothingToSend => AssemblyError::NothingToSend.to_string(),
            Self::EmptyReply => MSG_NO_RESPONSE.into(),
            Self::Failed(e) => format!("An error occurred: {e}"),
        }
    }

    pub fn reply(&self) -> Option<&str> {
        match self {
            Self::Reply(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Drives submissions against a session.
pub struct ChatService {
    client: CompletionClient,
    speech: Option<Arc<dyn SpeechSynthesizer>>,
}

impl ChatService {
    pub fn new(client: CompletionClient) -> Self {
        Self { client, speech: None }
    }

    /// Attach a speech backend for [`ChatService::speak`].
    pub fn with_speech(mut self, speech: Arc<dyn SpeechSynthesizer>) -> Self {
        self.speech = Some(speech);
        self
    }

    pub fn client(&self) -> &CompletionClient {
        &self.client
    }

    pub fn speech_backend(&self) -> Option<&str> {
        self.speech.as_ref().map(|s| s.name())
    }

    /// Submit one bundle.
    ///
    /// The session's last reply is overwritten only by a non-empty reply;
    /// every other outcome leaves it as it was.
    pub async fn submit(&self, session: &mut SessionContext, bundle: &RequestBundle) -> SubmitOutcome {
        let prompt = match bundle.assemble() {
            Ok(prompt) => prompt,
            Err(AssemblyError::NothingToSend) => {
                warn!(session_id = %session.id, "Submission has neither prompt nor document");
                return SubmitOutcome::NothingToSend;
            }
        };

        match self.client.complete(&prompt).await {
            Ok(reply) if reply.is_empty() => {
                warn!(session_id = %session.id, "Service returned an empty reply");
                SubmitOutcome::EmptyReply
            }
            Ok(reply) => {
                session.store_reply(reply.clone());
                info!(session_id = %session.id, chars = reply.len(), "Reply stored");
                SubmitOutcome::Reply(reply)
            }
            Err(e) => {
                warn!(session_id = %session.id, error = %e, "Completion request failed");
                SubmitOutcome::Failed(e)
            }
        }
    }

    /// Speak the session's last reply with the configured backend.
    pub async fn speak(&self, session: &SessionContext) -> Result<SpeechOutput, SpeechError> {
        let speech = self.speech.as_ref().ok_or(SpeechError::NotConfigured)?;
        let text = session
            .last_reply()
            .ok_or_else(|| SpeechError::Synthesis("No reply to speak".into()))?;

        info!(session_id = %session.id, backend = speech.name(), "Speaking last reply");
        speech.synthesize(text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{RecordingSpeech, ScriptedProvider};
    use gchat_core::message::Role;

    fn service(provider: Arc<ScriptedProvider>) -> ChatService {
        ChatService::new(CompletionClient::new(provider, "llama3-8b-8192"))
    }

    #[tokio::test]
    async fn reply_is_stored_in_session() {
        let provider = Arc::new(ScriptedProvider::replies(&["Paris"]));
        let svc = service(provider.clone());
        let mut session = SessionContext::new();

        let outcome = svc.submit(&mut session, &RequestBundle::new("capital of France?")).await;
        assert_eq!(outcome.reply(), Some("Paris"));
        assert_eq!(outcome.status_message(), "Query completed!");
        assert_eq!(session.last_reply(), Some("Paris"));
    }

    #[tokio::test]
    async fn memory_only_scenario_sends_one_user_message() {
        let provider = Arc::new(ScriptedProvider::replies(&["ok"]));
        let svc = service(provider.clone());
        let mut session = SessionContext::new();

        let bundle = RequestBundle::new("hello")
            .with_system_instructions("")
            .with_memory("notes")
            .with_document("");
        svc.submit(&mut session, &bundle).await;

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].messages.len(), 1);
        assert_eq!(requests[0].messages[0].role, Role::User);
        assert_eq!(requests[0].messages[0].content, "notes\n\nhello");
    }

    #[tokio::test]
    async fn nothing_to_send_makes_no_request() {
        let provider = Arc::new(ScriptedProvider::replies(&["unused"]));
        let svc = service(provider.clone());
        let mut session = SessionContext::new();

        let bundle = RequestBundle::new("").with_memory("only memory");
        let outcome = svc.submit(&mut session, &bundle).await;

        assert!(matches!(outcome, SubmitOutcome::NothingToSend));
        assert_eq!(outcome.status_message(), "Please enter a prompt or upload a file.");
        assert_eq!(provider.call_count(), 0);
        assert!(session.last_reply().is_none());
    }

    #[tokio::test]
    async fn empty_reply_is_soft_failure() {
        let provider = Arc::new(ScriptedProvider::replies(&["first", ""]));
        let svc = service(provider);
        let mut session = SessionContext::new();

        svc.submit(&mut session, &RequestBundle::new("one")).await;
        let outcome = svc.submit(&mut session, &RequestBundle::new("two")).await;

        assert!(matches!(outcome, SubmitOutcome::EmptyReply));
        assert_eq!(outcome.status_message(), "No response found.");
        assert!(!outcome.is_failure());
        assert_eq!(session.last_reply(), Some("first"));
    }

    #[tokio::test]
    async fn failure_keeps_prior_reply_until_reset() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok("earlier answer".into()),
            Err(ProviderError::Network("connection refused".into())),
        ]));
        let svc = service(provider);
        let mut session = SessionContext::new();

        svc.submit(&mut session, &RequestBundle::new("one")).await;
        let outcome = svc.submit(&mut session, &RequestBundle::new("two")).await;

        assert!(outcome.is_failure());
        assert!(outcome.status_message().contains("connection refused"));
        assert_eq!(session.last_reply(), Some("earlier answer"));

        session.reset();
        assert!(session.last_reply().is_none());
    }

    #[tokio::test]
    async fn speak_uses_last_reply() {
        let provider = Arc::new(ScriptedProvider::replies(&["say this"]));
        let speech = Arc::new(RecordingSpeech::default());
        let svc = service(provider).with_speech(speech.clone());
        let mut session = SessionContext::new();

        svc.submit(&mut session, &RequestBundle::new("q")).await;
        let output = svc.speak(&session).await.unwrap();

        assert_eq!(output, SpeechOutput::Played);
        assert_eq!(speech.spoken(), vec!["say this".to_string()]);
        assert_eq!(svc.speech_backend(), Some("recording"));
    }

    #[tokio::test]
    async fn speak_without_backend_is_not_configured() {
        let svc = service(Arc::new(ScriptedProvider::replies(&[])));
        let mut session = SessionContext::new();
        session.store_reply("text");

        assert!(matches!(svc.speak(&session).await, Err(SpeechError::NotConfigured)));
    }

    #[tokio::test]
    async fn speak_without_reply_is_synthesis_error() {
        let speech = Arc::new(RecordingSpeech::default());
        let svc = service(Arc::new(ScriptedProvider::replies(&[]))).with_speech(speech.clone());
        let session = SessionContext::new();

        assert!(matches!(svc.speak(&session).await, Err(SpeechError::Synthesis(_))));
        assert!(speech.spoken().is_empty());
    }
}
