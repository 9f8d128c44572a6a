//! Prompt assembly: turns a request bundle into the messages sent upstream.
//!
//! The combined prompt is always laid out in the same three slots:
//!
//! 1. **Short-term memory** (optional)
//! 2. **Document text** (optional, extracted from an upload)
//! 3. **User prompt**
//!
//! separated by single line breaks. Empty slots still contribute their line
//! break, so the position of the user prompt never moves.
//!
//! # Determinism
//!
//! Assembly is a pure function of the bundle: no trimming, truncation or
//! sanitizing is applied, and identical bundles yield identical prompts.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::message::Message;

/// Everything the user supplied for one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestBundle {
    /// Leading instructions establishing assistant behavior.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_instructions: Option<String>,

    /// Free-form short-term memory pasted by the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_text: Option<String>,

    /// Text extracted from the uploaded document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_text: Option<String>,

    /// The question or instruction itself.
    #[serde(default)]
    pub user_prompt: String,
}

impl RequestBundle {
    /// Start a bundle from the user prompt alone.
    pub fn new(user_prompt: impl Into<String>) -> Self {
        Self {
            user_prompt: user_prompt.into(),
            ..Self::default()
        }
    }

    pub fn with_system_instructions(mut self, text: impl Into<String>) -> Self {
        self.system_instructions = Some(text.into());
        self
    }

    pub fn with_memory(mut self, text: impl Into<String>) -> Self {
        self.memory_text = Some(text.into());
        self
    }

    pub fn with_document(mut self, text: impl Into<String>) -> Self {
        self.document_text = Some(text.into());
        self
    }

    /// A request may only be issued when the prompt or the document carries text.
    pub fn is_submittable(&self) -> bool {
        !self.user_prompt.is_empty() || self.document_text.as_deref().is_some_and(|d| !d.is_empty())
    }

    /// The memory, document and prompt slots joined by line breaks.
    pub fn combined_prompt(&self) -> String {
        format!(
            "{}\n{}\n{}",
            self.memory_text.as_deref().unwrap_or_default(),
            self.document_text.as_deref().unwrap_or_default(),
            self.user_prompt,
        )
    }

    /// Assemble the bundle into the prompt sent to the completion service.
    pub fn assemble(&self) -> Result<AssembledPrompt, AssemblyError> {
        if !self.is_submittable() {
            return Err(AssemblyError::NothingToSend);
        }

        let system = self
            .system_instructions
            .as_ref()
            .filter(|s| !s.is_empty())
            .cloned();

        Ok(AssembledPrompt {
            system,
            combined: self.combined_prompt(),
        })
    }
}

/// The assembled prompt, ready for a completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledPrompt {
    /// System instructions, present only when non-empty.
    pub system: Option<String>,
    /// Memory, document and prompt in their fixed order.
    pub combined: String,
}

impl AssembledPrompt {
    /// Ordered message list: the system message (if any), then exactly one user message.
    pub fn to_messages(&self) -> Vec<Message> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &self.system {
            messages.push(Message::system(system.clone()));
        }
        messages.push(Message::user(self.combined.clone()));
        messages
    }
}

/// Errors raised while assembling a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblyError {
    /// Neither a prompt nor document text was provided.
    #[error("Please enter a prompt or upload a file.")]
    NothingToSend,
}
