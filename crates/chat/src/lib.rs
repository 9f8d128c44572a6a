//! The request/response flow of GChat.
//!
//! A submission goes through four steps:
//!
//! 1. **Assemble** the request bundle into a system message and combined prompt
//! 2. **Complete** it with one call to the configured provider
//! 3. **Store** a non-empty reply in the session's last-reply slot
//! 4. **Speak** the last reply on demand, when a speech backend is attached
//!
//! Nothing is retried and nothing is cached between submissions.

pub mod client;
pub mod service;

#[cfg(test)]
mod test_helpers;

pub use client::CompletionClient;
pub use service::{ChatService, MSG_COMPLETED, MSG_NO_RESPONSE, SubmitOutcome};
